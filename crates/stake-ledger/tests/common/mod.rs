/*
[INPUT]:  Test configuration and wallet stand-in requirements
[OUTPUT]: Shared test utilities, fixtures, and wallet helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for stake-ledger tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use stake_ledger::{LedgerConfig, Orchestrator, Result, WalletProvider};

pub const CONNECT_LATENCY: Duration = Duration::from_secs(2);
pub const COMPLETION_LATENCY: Duration = Duration::from_secs(3);
pub const TEST_ADDRESS: &str = "0x1234567890abcdef1234567890abcdef12345678";

/// Empty ledger with the default latencies
pub fn test_config() -> LedgerConfig {
    let mut config = LedgerConfig::default();
    config.ledger.seed_demo_tasks = false;
    config.session.connect_latency_ms = CONNECT_LATENCY.as_millis() as u64;
    config.ledger.completion_latency_ms = COMPLETION_LATENCY.as_millis() as u64;
    config
}

/// Wallet that answers with a fixed address and counts requests
#[derive(Debug, Default)]
pub struct CountingWallet {
    pub requests: AtomicUsize,
}

impl CountingWallet {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for CountingWallet {
    fn name(&self) -> &str {
        "counting"
    }

    async fn request_account(&self) -> Result<String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(CONNECT_LATENCY).await;
        Ok(TEST_ADDRESS.to_string())
    }
}

#[allow(dead_code)]
pub fn orchestrator_with_counting_wallet() -> (Orchestrator, Arc<CountingWallet>) {
    let wallet = Arc::new(CountingWallet::default());
    let orchestrator = Orchestrator::new(&test_config(), wallet.clone());
    (orchestrator, wallet)
}

/// Orchestrator whose session is already connected
#[allow(dead_code)]
pub async fn connected_orchestrator() -> Orchestrator {
    let orchestrator = Orchestrator::from_config(&test_config());
    orchestrator
        .connect()
        .await
        .expect("simulated wallet always connects");
    orchestrator
}

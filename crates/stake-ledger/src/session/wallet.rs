/*
[INPUT]:  Connect requests from the session gate
[OUTPUT]: Wallet account identifier (address) or a connection failure
[POS]:    Session layer - wallet integration abstraction
[UPDATE]: When adding new wallet providers or changing the simulated latency model
*/

use std::time::Duration;

use async_trait::async_trait;

use crate::config::SessionConfig;
use crate::error::{LedgerError, Result};

/// Address returned by the simulated wallet unless configured otherwise
pub const DEFAULT_WALLET_ADDRESS: &str = "0x742d35Cc6634C0532925a3b8D4C9db96590e4CAF";

/// Trait for wallets that can hand out an account identifier
///
/// The trait is async so a provider can wait on user approval or an external signer.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Human-readable provider name for logs
    fn name(&self) -> &str;

    /// Ask the wallet for the account to connect with
    async fn request_account(&self) -> Result<String>;
}

/// Local wallet stand-in that waits a fixed latency before answering
#[derive(Debug, Clone)]
pub struct SimulatedWallet {
    address: String,
    latency: Duration,
    failure: Option<String>,
}

impl SimulatedWallet {
    /// Create a wallet that connects with `address` after `latency`
    pub fn new(address: &str, latency: Duration) -> Self {
        Self {
            address: address.to_string(),
            latency,
            failure: None,
        }
    }

    /// Create a wallet that rejects every connect after `latency`
    pub fn failing(latency: Duration, reason: &str) -> Self {
        Self {
            address: String::new(),
            latency,
            failure: Some(reason.to_string()),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        let latency = config.connect_latency();
        if config.fail_connect {
            Self::failing(latency, "user rejected the connection request")
        } else {
            Self::new(&config.wallet_address, latency)
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait]
impl WalletProvider for SimulatedWallet {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn request_account(&self) -> Result<String> {
        tokio::time::sleep(self.latency).await;
        match &self.failure {
            Some(reason) => Err(LedgerError::ConnectionFailed(reason.clone())),
            None => Ok(self.address.clone()),
        }
    }
}

/// Shorten an address for display: `0x742d...4CAF`
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/*
[INPUT]:  YAML configuration file or programmatic overrides
[OUTPUT]: Parsed ledger configuration (latencies, wallet identity, seed data, display)
[POS]:    Configuration layer - orchestrator setup
[UPDATE]: When adding new configuration options
*/

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::session::DEFAULT_WALLET_ADDRESS;

/// Top-level configuration for the stake ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// Wallet session settings
    #[serde(default)]
    pub session: SessionConfig,
    /// Task ledger settings
    #[serde(default)]
    pub ledger: LedgerSettings,
}

/// Wallet session configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Simulated wallet approval delay
    #[serde(default = "default_connect_latency_ms")]
    pub connect_latency_ms: u64,
    /// Address handed out by the simulated wallet
    #[serde(default = "default_wallet_address")]
    pub wallet_address: String,
    /// Make every connect fail after the latency (for exercising error paths)
    #[serde(default)]
    pub fail_connect: bool,
}

/// Task ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LedgerSettings {
    /// Simulated confirmation delay for task completion
    #[serde(default = "default_completion_latency_ms")]
    pub completion_latency_ms: u64,
    /// Start with the example tasks
    #[serde(default = "default_seed_demo_tasks")]
    pub seed_demo_tasks: bool,
    /// Symbol appended to displayed stakes
    #[serde(default = "default_token_symbol")]
    pub token_symbol: String,
}

impl SessionConfig {
    pub fn connect_latency(&self) -> Duration {
        Duration::from_millis(self.connect_latency_ms)
    }
}

impl LedgerSettings {
    pub fn completion_latency(&self) -> Duration {
        Duration::from_millis(self.completion_latency_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connect_latency_ms: default_connect_latency_ms(),
            wallet_address: default_wallet_address(),
            fail_connect: false,
        }
    }
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            completion_latency_ms: default_completion_latency_ms(),
            seed_demo_tasks: default_seed_demo_tasks(),
            token_symbol: default_token_symbol(),
        }
    }
}

fn default_connect_latency_ms() -> u64 {
    2_000
}

fn default_completion_latency_ms() -> u64 {
    3_000
}

fn default_wallet_address() -> String {
    DEFAULT_WALLET_ADDRESS.to_string()
}

fn default_seed_demo_tasks() -> bool {
    true
}

fn default_token_symbol() -> String {
    "ETH".to_string()
}

impl LedgerConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|err| LedgerError::Config(format!("read {}: {err}", path.display())))?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|err| LedgerError::Config(format!("parse yaml: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|err| LedgerError::Config(format!("serialize yaml: {err}")))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.session.fail_connect && self.session.wallet_address.trim().is_empty() {
            return Err(LedgerError::Config(
                "session.wallet_address cannot be empty".to_string(),
            ));
        }
        if self.ledger.token_symbol.trim().is_empty() {
            return Err(LedgerError::Config(
                "ledger.token_symbol cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

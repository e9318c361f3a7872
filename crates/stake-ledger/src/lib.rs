/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public stake ledger crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod config;
pub mod error;
pub mod metrics;
pub mod orchestrator;
pub mod session;
pub mod task;
pub mod units;

pub use config::{LedgerConfig, LedgerSettings, SessionConfig};
pub use error::{LedgerError, Result};
pub use metrics::LedgerMetrics;
pub use orchestrator::{LedgerSnapshot, Orchestrator};

// Re-export commonly used types from session
pub use session::{
    ConnectAttempt,
    DEFAULT_WALLET_ADDRESS,
    Session,
    SessionGate,
    SimulatedWallet,
    WalletProvider,
    short_address,
};

// Re-export commonly used types from task
pub use task::{Task, TaskDraft, TaskId, TaskStatus, TaskStore};

pub use units::{WEI_PER_TOKEN, format_stake, to_base_units, to_display_units};

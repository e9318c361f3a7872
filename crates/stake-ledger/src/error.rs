/*
[INPUT]:  Failure sources (draft validation, stake parsing, task lookup, session lifecycle, config)
[OUTPUT]: Structured error type with recovery hints for the presentation layer
[POS]:    Error handling layer - unified error type for the whole crate
[UPDATE]: When adding new failure sources or changing error messages
*/

use thiserror::Error;

use crate::task::TaskId;

/// Main error type for the stake ledger
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Draft rejected before reaching the store
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Stake input is not a non-negative decimal expressible in base units
    #[error("Invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    /// No task with this id
    #[error("Task {0} not found")]
    NotFound(TaskId),

    /// Transition not allowed from the task's current state
    #[error("Task {id} is in an invalid state: {reason}")]
    InvalidState { id: TaskId, reason: String },

    /// Mutating action attempted without a connected session
    #[error("Wallet not connected")]
    Unauthorized,

    /// A connect attempt is already pending
    #[error("Wallet connection already in progress")]
    ConnectInProgress,

    /// Session is already connected
    #[error("Wallet already connected")]
    AlreadyConnected,

    /// Pending connect was superseded by a disconnect
    #[error("Wallet connection cancelled")]
    ConnectionCancelled,

    /// Wallet refused or failed to provide an account
    #[error("Wallet connection failed: {0}")]
    ConnectionFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    pub(crate) fn invalid_amount(input: &str, reason: impl Into<String>) -> Self {
        LedgerError::InvalidAmount {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_state(id: TaskId, reason: impl Into<String>) -> Self {
        LedgerError::InvalidState {
            id,
            reason: reason.into(),
        }
    }

    /// Check if the caller can fix the problem by editing its input and retrying
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            LedgerError::Validation(_) | LedgerError::InvalidAmount { .. }
        )
    }

    /// Check if error should be answered with a prompt to connect the wallet
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            LedgerError::Unauthorized
                | LedgerError::ConnectionCancelled
                | LedgerError::ConnectionFailed(_)
        )
    }

    /// Check if the request was a harmless duplicate that can be shown as a no-op
    pub fn is_noop(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidState { .. }
                | LedgerError::ConnectInProgress
                | LedgerError::AlreadyConnected
        )
    }
}

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/*
[INPUT]:  Connect/disconnect requests and wallet identifiers
[OUTPUT]: Session state and authorization decisions for ledger mutations
[POS]:    Session layer - owns the connected/disconnected state
[UPDATE]: When session phases or cancellation rules change
*/

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{LedgerError, Result};

/// Observable session state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub connected: bool,
    /// Wallet address, only set while connected
    pub identifier: Option<String>,
}

impl Session {
    pub fn disconnected() -> Self {
        Self::default()
    }

    fn connected(identifier: &str) -> Self {
        Self {
            connected: true,
            identifier: Some(identifier.to_string()),
        }
    }
}

/// Handle for one pending connect.
///
/// The token is cancelled when the attempt is superseded by a disconnect.
#[derive(Debug, Clone)]
pub struct ConnectAttempt {
    id: u64,
    cancel: CancellationToken,
}

impl ConnectAttempt {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[derive(Debug)]
enum Phase {
    Disconnected,
    Connecting { attempt: u64, cancel: CancellationToken },
    Connected { identifier: String },
}

/// Connected/disconnected gate consulted before every user-facing mutation
#[derive(Debug)]
pub struct SessionGate {
    phase: Phase,
    next_attempt: u64,
    version: u64,
}

impl SessionGate {
    pub fn new() -> Self {
        Self {
            phase: Phase::Disconnected,
            next_attempt: 1,
            version: 0,
        }
    }

    /// Enter the connecting phase.
    ///
    /// Rejected while another connect is pending or the session is already connected.
    pub fn begin_connect(&mut self) -> Result<ConnectAttempt> {
        match self.phase {
            Phase::Connecting { .. } => return Err(LedgerError::ConnectInProgress),
            Phase::Connected { .. } => return Err(LedgerError::AlreadyConnected),
            Phase::Disconnected => {}
        }

        let attempt = ConnectAttempt {
            id: self.next_attempt,
            cancel: CancellationToken::new(),
        };
        self.next_attempt += 1;
        self.set_phase(Phase::Connecting {
            attempt: attempt.id,
            cancel: attempt.cancel.clone(),
        });
        tracing::debug!(attempt = attempt.id, "wallet connect started");
        Ok(attempt)
    }

    /// Settle a pending connect with the wallet's identifier.
    ///
    /// Only the current attempt can settle; a stale one was cancelled by a disconnect
    /// and assigns nothing.
    pub fn finish_connect(&mut self, attempt: &ConnectAttempt, identifier: &str) -> Result<Session> {
        if !self.is_current(attempt) {
            return Err(LedgerError::ConnectionCancelled);
        }

        let identifier = identifier.trim();
        if identifier.is_empty() {
            self.set_phase(Phase::Disconnected);
            return Err(LedgerError::ConnectionFailed(
                "wallet returned an empty address".to_string(),
            ));
        }

        self.set_phase(Phase::Connected {
            identifier: identifier.to_string(),
        });
        tracing::info!(attempt = attempt.id, address = %identifier, "wallet connected");
        Ok(Session::connected(identifier))
    }

    /// Drop a pending connect that failed; no-op for stale attempts
    pub fn fail_connect(&mut self, attempt: &ConnectAttempt) {
        if self.is_current(attempt) {
            self.set_phase(Phase::Disconnected);
        }
    }

    /// Disconnect immediately, cancelling any pending connect. Idempotent.
    pub fn disconnect(&mut self) {
        if matches!(self.phase, Phase::Disconnected) {
            return;
        }
        match self.set_phase(Phase::Disconnected) {
            Phase::Connecting { attempt, cancel } => {
                cancel.cancel();
                tracing::info!(attempt, "pending wallet connect cancelled");
            }
            Phase::Connected { identifier } => {
                tracing::info!(address = %identifier, "wallet disconnected");
            }
            Phase::Disconnected => {}
        }
    }

    pub fn is_authorized(&self) -> bool {
        matches!(self.phase, Phase::Connected { .. })
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self.phase, Phase::Connecting { .. })
    }

    pub fn session(&self) -> Session {
        match &self.phase {
            Phase::Connected { identifier } => Session::connected(identifier),
            _ => Session::disconnected(),
        }
    }

    /// Bumped on every phase change
    pub fn version(&self) -> u64 {
        self.version
    }

    fn set_phase(&mut self, phase: Phase) -> Phase {
        self.version += 1;
        std::mem::replace(&mut self.phase, phase)
    }

    fn is_current(&self, attempt: &ConnectAttempt) -> bool {
        matches!(self.phase, Phase::Connecting { attempt: current, .. } if current == attempt.id)
    }
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}

/*
[INPUT]:  User actions (connect, disconnect, create, complete), LedgerConfig, WalletProvider
[OUTPUT]: Settled actions, watch channel of LedgerSnapshot for the presentation layer
[POS]:    Action layer - single writer sequencing session and task mutations
[UPDATE]: When adding actions or changing latency/cancellation semantics
*/

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::metrics::LedgerMetrics;
use crate::session::{Session, SessionGate, SimulatedWallet, WalletProvider};
use crate::task::{Task, TaskDraft, TaskId, TaskStore};
use crate::units;

/// Everything the presentation layer needs to render one frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Bumped by every task or session change
    pub version: u64,
    pub tasks: Vec<Task>,
    /// Tasks whose completion is in flight; their affordances should be disabled
    pub in_progress: BTreeSet<TaskId>,
    pub session: Session,
    /// A connect is pending; the connect affordance should be disabled
    pub connecting: bool,
    pub metrics: LedgerMetrics,
}

struct LedgerState {
    store: TaskStore,
    gate: SessionGate,
}

struct Inner {
    state: Mutex<LedgerState>,
    wallet: Arc<dyn WalletProvider>,
    completion_latency: Duration,
    token_symbol: String,
    snapshots: watch::Sender<LedgerSnapshot>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self) -> LedgerSnapshot {
        Self::capture(&self.lock())
    }

    fn capture(state: &LedgerState) -> LedgerSnapshot {
        let tasks = state.store.list_tasks();
        LedgerSnapshot {
            version: state.store.version() + state.gate.version(),
            metrics: LedgerMetrics::from_tasks(&tasks),
            tasks,
            in_progress: state.store.in_progress().clone(),
            session: state.gate.session(),
            connecting: state.gate.is_connecting(),
        }
    }

    /// Sends while the state lock is held so publishers cannot reorder snapshots.
    fn publish(&self) {
        let state = self.lock();
        self.snapshots.send_replace(Self::capture(&state));
    }
}

/// Sequences connect, create and complete actions against the session gate and
/// the task store.
///
/// Cloning is cheap and every clone drives the same ledger. State is only locked for
/// the synchronous part of an action; latency windows are plain `.await` points, so
/// completions on different tasks overlap freely.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

impl Orchestrator {
    /// Create an orchestrator with an explicit wallet provider
    pub fn new(config: &LedgerConfig, wallet: Arc<dyn WalletProvider>) -> Self {
        let store = if config.ledger.seed_demo_tasks {
            TaskStore::with_demo_tasks()
        } else {
            TaskStore::new()
        };
        let state = LedgerState {
            store,
            gate: SessionGate::new(),
        };
        let (snapshots, _) = watch::channel(LedgerSnapshot::default());

        let orchestrator = Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                wallet,
                completion_latency: config.ledger.completion_latency(),
                token_symbol: config.ledger.token_symbol.clone(),
                snapshots,
            }),
        };
        orchestrator.inner.publish();
        orchestrator
    }

    /// Create an orchestrator backed by the simulated wallet described in `config`
    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(config, Arc::new(SimulatedWallet::from_config(&config.session)))
    }

    /// Connect the wallet session.
    ///
    /// The session is `connecting` until the wallet answers. A `disconnect()` in the
    /// meantime cancels the attempt and this returns `ConnectionCancelled`.
    pub async fn connect(&self) -> Result<Session> {
        let attempt = self.inner.lock().gate.begin_connect()?;
        self.inner.publish();
        tracing::info!(
            attempt = attempt.id(),
            wallet = self.inner.wallet.name(),
            "connecting wallet"
        );

        let outcome = tokio::select! {
            _ = attempt.cancellation().cancelled() => Err(LedgerError::ConnectionCancelled),
            res = self.inner.wallet.request_account() => res,
        };

        let result = {
            let mut state = self.inner.lock();
            match outcome {
                Ok(identifier) => state.gate.finish_connect(&attempt, &identifier),
                Err(err) => {
                    state.gate.fail_connect(&attempt);
                    Err(err)
                }
            }
        };
        self.inner.publish();

        if let Err(err) = &result {
            tracing::warn!(attempt = attempt.id(), error = %err, "wallet connect did not settle");
        }
        result
    }

    /// Disconnect immediately. Idempotent; cancels a pending connect.
    pub fn disconnect(&self) {
        self.inner.lock().gate.disconnect();
        self.inner.publish();
    }

    /// Validate the inputs, convert the stake and append a pending task.
    ///
    /// Input errors are reported before authorization so they can be shown inline.
    pub fn create_task(&self, name: &str, description: &str, stake_input: &str) -> Result<Task> {
        self.create_from_draft(&TaskDraft::new(name, description, stake_input))
    }

    /// Same as [`Orchestrator::create_task`], clearing the draft on success and
    /// leaving it untouched on failure.
    pub fn submit_draft(&self, draft: &mut TaskDraft) -> Result<Task> {
        let task = self.create_from_draft(draft)?;
        draft.clear();
        Ok(task)
    }

    fn create_from_draft(&self, draft: &TaskDraft) -> Result<Task> {
        let valid = draft.validate()?;

        let task = {
            let mut state = self.inner.lock();
            if !state.gate.is_authorized() {
                return Err(LedgerError::Unauthorized);
            }
            state
                .store
                .create_task(&valid.name, &valid.description, valid.stake_amount)?
        };
        self.inner.publish();

        tracing::info!(
            task_id = %task.id,
            stake = %units::format_stake(task.stake_amount, &self.inner.token_symbol),
            "task created"
        );
        Ok(task)
    }

    /// Complete a task after the confirmation latency.
    ///
    /// Rejected with `Unauthorized` while disconnected and with `InvalidState` if the
    /// task is already completed or completing. Once begun, the completion runs on its
    /// own tokio task and finalizes even if this future is dropped.
    pub async fn complete_task(&self, id: TaskId) -> Result<Task> {
        let task = {
            let mut state = self.inner.lock();
            if !state.gate.is_authorized() {
                return Err(LedgerError::Unauthorized);
            }
            state.store.begin_completion(id)?
        };
        self.inner.publish();
        tracing::info!(
            task_id = %task.id,
            latency_ms = self.inner.completion_latency.as_millis() as u64,
            "completion submitted"
        );

        let inner = Arc::clone(&self.inner);
        let settle = tokio::spawn(async move {
            tokio::time::sleep(inner.completion_latency).await;
            let result = inner.lock().store.finalize_completion(id);
            inner.publish();
            result
        });

        match settle.await {
            Ok(Ok(task)) => {
                tracing::info!(task_id = %task.id, "task completed");
                Ok(task)
            }
            Ok(Err(err)) => {
                tracing::warn!(task_id = %id, error = %err, "completion did not finalize");
                Err(err)
            }
            Err(join_err) => {
                tracing::error!(task_id = %id, error = %join_err, "completion task aborted");
                Err(LedgerError::invalid_state(
                    id,
                    format!("completion task aborted: {join_err}"),
                ))
            }
        }
    }

    pub fn list_tasks(&self) -> Vec<Task> {
        self.inner.lock().store.list_tasks()
    }

    pub fn get_task(&self, id: TaskId) -> Option<Task> {
        self.inner.lock().store.get(id).cloned()
    }

    pub fn is_authorized(&self) -> bool {
        self.inner.lock().gate.is_authorized()
    }

    pub fn is_connecting(&self) -> bool {
        self.inner.lock().gate.is_connecting()
    }

    pub fn session(&self) -> Session {
        self.inner.lock().gate.session()
    }

    pub fn is_completing(&self, id: TaskId) -> bool {
        self.inner.lock().store.is_in_progress(id)
    }

    pub fn metrics(&self) -> LedgerMetrics {
        LedgerMetrics::from_tasks(self.inner.lock().store.tasks())
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.inner.snapshot()
    }

    /// Receiver updated after every state change
    pub fn subscribe(&self) -> watch::Receiver<LedgerSnapshot> {
        self.inner.snapshots.subscribe()
    }

    pub fn token_symbol(&self) -> &str {
        &self.inner.token_symbol
    }

    /// Stake label in the configured token symbol, e.g. `0.750 ETH`
    pub fn format_stake(&self, wei: u128) -> String {
        units::format_stake(wei, &self.inner.token_symbol)
    }
}

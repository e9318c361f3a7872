/*
[INPUT]:  Task snapshot from the store
[OUTPUT]: Counts and stake sums for UI display
[POS]:    Derived figures - pure function of the current ledger state
[UPDATE]: When adding/removing ledger-level figures
*/

use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerMetrics {
    pub total_count: usize,
    pub completed_count: usize,
    /// Includes tasks with a completion in flight
    pub pending_count: usize,
    /// Sum over every task regardless of status, in base units
    #[serde(with = "crate::units::wei_string")]
    pub total_stake: u128,
    #[serde(with = "crate::units::wei_string")]
    pub completed_stake: u128,
    #[serde(with = "crate::units::wei_string")]
    pub pending_stake: u128,
}

impl LedgerMetrics {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut metrics, task| {
            metrics.total_count += 1;
            metrics.total_stake = metrics.total_stake.saturating_add(task.stake_amount);
            match task.status {
                TaskStatus::Completed => {
                    metrics.completed_count += 1;
                    metrics.completed_stake =
                        metrics.completed_stake.saturating_add(task.stake_amount);
                }
                TaskStatus::Pending => {
                    metrics.pending_count += 1;
                    metrics.pending_stake = metrics.pending_stake.saturating_add(task.stake_amount);
                }
            }
            metrics
        })
    }
}

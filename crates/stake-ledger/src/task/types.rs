/*
[INPUT]:  Ledger schema (identity, display text, status, timestamps, stake)
[OUTPUT]: Task records and identifiers with serde support
[POS]:    Data layer - task model shared by store, metrics and presentation
[UPDATE]: When task fields or status values change
*/

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the store from a monotonic counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    /// Accepts both `7` and `#7`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        digits.parse().map(TaskId)
    }
}

/// Persisted status of a task.
///
/// Transitions:
/// - Pending -> Completed (after the completion latency elapses)
///
/// Completed is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => f.write_str("pending"),
            TaskStatus::Completed => f.write_str("completed"),
        }
    }
}

/// A tracked task with its stake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Stake in base units (wei)
    #[serde(with = "crate::units::wei_string")]
    pub stake_amount: u128,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }
}

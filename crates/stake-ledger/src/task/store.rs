/*
[INPUT]:  Validated task fields (name, description, stake in base units), task ids
[OUTPUT]: Ordered task collection, in-progress markers, versioned snapshots
[POS]:    Ledger layer - sole writer of task state
[UPDATE]: When task lifecycle rules or seed data change
*/

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};

use super::state_machine::{TaskAction, TaskPhase, TaskStateMachine};
use super::types::{Task, TaskId, TaskStatus};
use crate::error::{LedgerError, Result};

/// In-memory task ledger.
///
/// Tasks are kept in creation order. Ids come from a per-store counter, so they are
/// strictly increasing and the collection stays sorted by id.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    in_progress: BTreeSet<TaskId>,
    next_id: u64,
    version: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            in_progress: BTreeSet::new(),
            next_id: 1,
            version: 0,
        }
    }

    /// Store pre-filled with the three example tasks shown on first launch
    pub fn with_demo_tasks() -> Self {
        let mut store = Self::new();
        store.seed_demo();
        store
    }

    /// Append a new pending task.
    ///
    /// Name and description are trimmed and must not be empty.
    pub fn create_task(&mut self, name: &str, description: &str, stake_amount: u128) -> Result<Task> {
        let name = require_text("name", name)?;
        let description = require_text("description", description)?;

        let task = self.push(name, description, stake_amount, Utc::now(), None);
        tracing::debug!(
            task_id = %task.id,
            stake_amount = %task.stake_amount,
            "task created"
        );
        Ok(task)
    }

    /// Mark a pending task as having a completion in flight.
    ///
    /// Status stays `Pending` until [`TaskStore::finalize_completion`].
    pub fn begin_completion(&mut self, id: TaskId) -> Result<Task> {
        let index = self.index_of(id)?;
        self.apply(index, TaskAction::BeginCompletion)?;

        self.in_progress.insert(id);
        self.version += 1;
        Ok(self.tasks[index].clone())
    }

    /// Settle an in-flight completion: status becomes `Completed` and `completed_at`
    /// is stamped (never earlier than `created_at`).
    pub fn finalize_completion(&mut self, id: TaskId) -> Result<Task> {
        let index = self.index_of(id)?;
        self.apply(index, TaskAction::FinalizeCompletion)?;

        self.in_progress.remove(&id);
        let task = &mut self.tasks[index];
        task.status = TaskStatus::Completed;
        task.completed_at = Some(Utc::now().max(task.created_at));
        self.version += 1;
        Ok(task.clone())
    }

    /// Snapshot of all tasks in creation order
    pub fn list_tasks(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.index_of(id).ok().map(|index| &self.tasks[index])
    }

    pub fn is_in_progress(&self, id: TaskId) -> bool {
        self.in_progress.contains(&id)
    }

    pub fn in_progress(&self) -> &BTreeSet<TaskId> {
        &self.in_progress
    }

    /// Bumped on every mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Append the example tasks: one completed 1-token task and two pending ones.
    pub fn seed_demo(&mut self) {
        self.push(
            "Study smart contracts".to_string(),
            "Finish the Solidity course and write a first contract".to_string(),
            1_000_000_000_000_000_000,
            seed_date(2024, 1, 15),
            Some(seed_date(2024, 1, 20)),
        );
        self.push(
            "Deploy to testnet".to_string(),
            "Deploy the TODO contract to the Sepolia test network".to_string(),
            500_000_000_000_000_000,
            seed_date(2024, 1, 18),
            None,
        );
        self.push(
            "Integrate frontend".to_string(),
            "Wire the React interface to the smart contract with ethers.js".to_string(),
            750_000_000_000_000_000,
            seed_date(2024, 1, 20),
            None,
        );
    }

    fn push(
        &mut self,
        name: String,
        description: String,
        stake_amount: u128,
        created_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Task {
        let id = TaskId(self.next_id);
        self.next_id += 1;

        let status = if completed_at.is_some() {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        };
        let task = Task {
            id,
            name,
            description,
            status,
            created_at,
            completed_at,
            stake_amount,
        };
        self.tasks.push(task.clone());
        self.version += 1;
        task
    }

    fn apply(&self, index: usize, action: TaskAction) -> Result<TaskPhase> {
        let task = &self.tasks[index];
        let phase = TaskPhase::of(task.status, self.in_progress.contains(&task.id));
        TaskStateMachine::new(phase)
            .transition(action)
            .map_err(|err| LedgerError::invalid_state(task.id, err.to_string()))
    }

    fn index_of(&self, id: TaskId) -> Result<usize> {
        self.tasks
            .binary_search_by_key(&id, |task| task.id)
            .map_err(|_| LedgerError::NotFound(id))
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn seed_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_else(Utc::now)
}

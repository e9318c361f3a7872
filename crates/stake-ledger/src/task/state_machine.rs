/*
[INPUT]:  Task phase (status + in-progress marker), TaskAction enum
[OUTPUT]: Validated completion transitions for tasks
[POS]:    Task domain logic - state machine for the completion lifecycle
[UPDATE]: When task phases or transition rules change
*/

use std::fmt;

use thiserror::Error;

use super::types::TaskStatus;

/// Lifecycle phase of a task, including the transient in-progress window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    Pending,
    Completing,
    Completed,
}

impl TaskPhase {
    /// Derive the phase from the stored status and the in-progress marker
    pub fn of(status: TaskStatus, in_progress: bool) -> Self {
        match (status, in_progress) {
            (TaskStatus::Completed, _) => TaskPhase::Completed,
            (TaskStatus::Pending, true) => TaskPhase::Completing,
            (TaskStatus::Pending, false) => TaskPhase::Pending,
        }
    }
}

impl fmt::Display for TaskPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskPhase::Pending => f.write_str("pending"),
            TaskPhase::Completing => f.write_str("already completing"),
            TaskPhase::Completed => f.write_str("already completed"),
        }
    }
}

/// Actions that can trigger task phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    BeginCompletion,
    FinalizeCompletion,
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskAction::BeginCompletion => f.write_str("begin completion"),
            TaskAction::FinalizeCompletion => f.write_str("finalize completion"),
        }
    }
}

/// Errors occurring during phase transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("cannot {action}: task is {from}")]
    InvalidTransition { from: TaskPhase, action: TaskAction },
}

/// State machine guarding a single task's completion lifecycle
pub struct TaskStateMachine {
    current_phase: TaskPhase,
}

impl TaskStateMachine {
    pub fn new(initial: TaskPhase) -> Self {
        Self {
            current_phase: initial,
        }
    }

    pub fn can_transition(&self, action: TaskAction) -> bool {
        matches!(
            (self.current_phase, action),
            (TaskPhase::Pending, TaskAction::BeginCompletion)
                | (TaskPhase::Completing, TaskAction::FinalizeCompletion)
        )
    }

    /// Perform a transition and return the new phase
    pub fn transition(&mut self, action: TaskAction) -> Result<TaskPhase, StateError> {
        let next_phase = match (self.current_phase, action) {
            (TaskPhase::Pending, TaskAction::BeginCompletion) => TaskPhase::Completing,
            (TaskPhase::Completing, TaskAction::FinalizeCompletion) => TaskPhase::Completed,
            (from, action) => return Err(StateError::InvalidTransition { from, action }),
        };

        self.current_phase = next_phase;
        Ok(next_phase)
    }

    pub fn phase(&self) -> TaskPhase {
        self.current_phase
    }
}

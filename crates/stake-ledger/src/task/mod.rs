/*
[INPUT]:  Individual task components
[OUTPUT]: Unified task module for the ledger crate
[POS]:    Task domain layer - aggregates model, state machine and store
[UPDATE]: When adding new task-related modules or functionality
*/

pub mod draft;
pub mod state_machine;
pub mod store;
pub mod types;

pub use draft::{TaskDraft, ValidDraft};
pub use state_machine::{StateError, TaskAction, TaskPhase, TaskStateMachine};
pub use store::TaskStore;
pub use types::{Task, TaskId, TaskStatus};

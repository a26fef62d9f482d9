//! Port contracts for the task board.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod repository;
pub mod transition_log;

pub use repository::{AppliedChange, TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use transition_log::TransitionLog;

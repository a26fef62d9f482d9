//! Read port for the append-only transition log.
//!
//! Appends happen only inside [`TaskRepository`] writes so that a column
//! change and its record commit together. The log offers no update or
//! delete surface; records disappear only when their task is deleted.
//!
//! [`TaskRepository`]: super::TaskRepository

use super::TaskRepositoryResult;
use crate::task::domain::{TaskId, TransitionRecord};
use async_trait::async_trait;

/// Transition history lookup contract.
#[async_trait]
pub trait TransitionLog: Send + Sync {
    /// Returns the records for one task, oldest first.
    ///
    /// An unknown task yields an empty list.
    async fn transitions_for(&self, id: &TaskId) -> TaskRepositoryResult<Vec<TransitionRecord>>;

    /// Returns every record across all tasks, oldest first.
    async fn all_transitions(&self) -> TaskRepositoryResult<Vec<TransitionRecord>>;
}

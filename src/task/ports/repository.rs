//! Repository port for task persistence, lookup, and dependency edges.

use crate::task::domain::{
    ColumnCounts, DependencyEdge, PendingTransition, Task, TaskChange, TaskDetails, TaskFilter,
    TaskId, TransitionRecord,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Stored state after a [`TaskChange`] has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChange {
    /// The task and its dependencies as written.
    pub details: TaskDetails,
    /// Transition appended when the stored column differed from the target.
    pub transition: Option<TransitionRecord>,
}

/// Task persistence contract.
///
/// Every method is one atomic unit: a column change is never visible without
/// its transition record, and a failed call leaves nothing behind.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task with its creation transition and dependency edges.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the identifier is
    /// taken or [`TaskRepositoryError::DependencyNotFound`] when a listed
    /// dependency does not exist. The new task may list itself.
    async fn insert(
        &self,
        task: &Task,
        transition: &PendingTransition,
        dependencies: &BTreeSet<TaskId>,
    ) -> TaskRepositoryResult<TransitionRecord>;

    /// Applies `change` to the stored task, stamping any move with `at`.
    ///
    /// The current row is read, changed, and written in the same atomic
    /// unit, so the transition's origin is always the column the task held
    /// when the write began. A move into the stored column appends nothing.
    /// The transition, when present, is appended before the row is updated.
    /// A dependency set, when present, replaces every outgoing edge. Nothing
    /// is written when the change leaves the task as it was.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// or [`TaskRepositoryError::DependencyNotFound`] when a replacement
    /// dependency does not exist.
    async fn update(
        &self,
        id: &TaskId,
        change: &TaskChange,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<AppliedChange>;

    /// Deletes a task with its edges in both directions and its transitions.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: &TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task and its dependencies by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: &TaskId) -> TaskRepositoryResult<Option<TaskDetails>>;

    /// Returns every task matching `filter`, ordered by identifier.
    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<TaskDetails>>;

    /// Adds one dependency edge after checking both endpoints exist.
    ///
    /// Returns `false` when the edge was already present.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the dependent task is
    /// missing or [`TaskRepositoryError::DependencyNotFound`] when the
    /// depended-on task is missing.
    async fn add_dependency(&self, edge: &DependencyEdge) -> TaskRepositoryResult<bool>;

    /// Removes one dependency edge.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::EdgeNotFound`] when the edge did not
    /// exist.
    async fn remove_dependency(&self, edge: &DependencyEdge) -> TaskRepositoryResult<()>;

    /// Counts tasks per column.
    async fn column_counts(&self) -> TaskRepositoryResult<ColumnCounts>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A task named as a dependency was not found.
    #[error("dependency task not found: {0}")]
    DependencyNotFound(TaskId),

    /// The dependency edge was not found.
    #[error("dependency not found: task {} does not depend on {}", .0.task_id, .0.depends_on)]
    EdgeNotFound(DependencyEdge),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

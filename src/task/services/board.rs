//! Service layer for task board operations.

use crate::task::{
    domain::{
        Column, ColumnCounts, DependencyEdge, ParseColumnError, Task, TaskChange, TaskDetails,
        TaskDomainError, TaskFilter, TaskId, TaskPatch, TaskTitle, TransitionRecord,
    },
    ports::{AppliedChange, TaskRepository, TaskRepositoryError, TransitionLog},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

use super::analytics::{DwellStats, compute_dwell_stats};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    id: String,
    title: String,
    column: Column,
    description: Option<String>,
    assignee: Option<String>,
    dependencies: Vec<TaskId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, column: Column) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            column,
            description: None,
            assignee: None,
            dependencies: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Sets the tasks the new task depends on.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies = dependencies.into_iter().collect();
        self
    }
}

/// Result of a move request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The task changed column and the transition was recorded.
    Moved(TransitionRecord),
    /// The task already occupied the requested column; nothing was written.
    Unchanged,
}

/// Coarse classification of service failures for collaborators that map
/// errors onto exit codes or status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A task, dependency, or edge does not exist.
    NotFound,
    /// A task with the same identifier already exists.
    DuplicateIdentity,
    /// A column value is outside the workflow.
    InvalidColumn,
    /// A required field is missing or blank.
    ValidationFailure,
    /// The store failed.
    Persistence,
}

/// Service-level errors for task board operations.
#[derive(Debug, Error)]
pub enum TaskBoardError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// A column value could not be parsed.
    #[error(transparent)]
    InvalidColumn(#[from] ParseColumnError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

impl TaskBoardError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::ValidationFailure,
            Self::InvalidColumn(_) => ErrorKind::InvalidColumn,
            Self::Repository(
                TaskRepositoryError::NotFound(_)
                | TaskRepositoryError::DependencyNotFound(_)
                | TaskRepositoryError::EdgeNotFound(_),
            ) => ErrorKind::NotFound,
            Self::Repository(TaskRepositoryError::DuplicateTask(_)) => {
                ErrorKind::DuplicateIdentity
            }
            Self::Repository(TaskRepositoryError::Persistence(_)) => ErrorKind::Persistence,
        }
    }
}

/// Result type for task board service operations.
pub type TaskBoardResult<T> = Result<T, TaskBoardError>;

/// Task board orchestration service.
#[derive(Clone)]
pub struct TaskBoardService<R, C>
where
    R: TaskRepository + TransitionLog,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskBoardService<R, C>
where
    R: TaskRepository + TransitionLog,
    C: Clock + Send + Sync,
{
    /// Creates a new task board service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a task and records its initial placement.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Domain`] for a blank id or title, and
    /// [`TaskBoardError::Repository`] when the id is taken, a dependency
    /// does not exist, or persistence fails.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskBoardResult<TaskDetails> {
        let id = TaskId::new(request.id)?;
        let title = TaskTitle::new(request.title)?;
        let (task, transition) = Task::new(id, title, request.column, &*self.clock);
        let task = task
            .with_description(request.description.unwrap_or_default())
            .with_assignee(request.assignee);
        let dependencies: BTreeSet<TaskId> = request.dependencies.into_iter().collect();

        self.repository
            .insert(&task, &transition, &dependencies)
            .await?;
        tracing::info!(
            task_id = %task.id(),
            column = %task.column(),
            dependencies = dependencies.len(),
            "task created"
        );
        Ok(TaskDetails::new(task, dependencies))
    }

    /// Retrieves a task and its dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] (wrapped) when the task does
    /// not exist.
    pub async fn get(&self, id: &TaskId) -> TaskBoardResult<TaskDetails> {
        let found = self.repository.find_by_id(id).await?;
        found.ok_or_else(|| TaskRepositoryError::NotFound(id.clone()).into())
    }

    /// Lists tasks matching `filter`, ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when the lookup fails.
    pub async fn list(&self, filter: &TaskFilter) -> TaskBoardResult<Vec<TaskDetails>> {
        Ok(self.repository.list(filter).await?)
    }

    /// Lists tasks assigned to `assignee`, optionally in one column, newest
    /// identifier first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when the lookup fails.
    pub async fn assigned_to(
        &self,
        assignee: &str,
        column: Option<Column>,
    ) -> TaskBoardResult<Vec<TaskDetails>> {
        let mut filter = TaskFilter::new().with_assignee(assignee);
        if let Some(selected) = column {
            filter = filter.with_column(selected);
        }
        let mut tasks = self.repository.list(&filter).await?;
        tasks.sort_by(|left, right| right.task.id().cmp(left.task.id()));
        Ok(tasks)
    }

    /// Applies a partial update.
    ///
    /// A column change appends a transition in the same write as the row
    /// update; a dependency list replaces every existing edge.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Domain`] for a blank title and
    /// [`TaskBoardError::Repository`] when the task or a dependency does not
    /// exist.
    pub async fn update(&self, id: &TaskId, patch: TaskPatch) -> TaskBoardResult<TaskDetails> {
        let change = TaskChange::try_from(patch)?;
        let applied = self.apply(id, &change).await?;
        tracing::info!(task_id = %id, "task updated");
        Ok(applied.details)
    }

    /// Moves a task into `column`.
    ///
    /// Moving a task into the column it already occupies succeeds with
    /// [`MoveOutcome::Unchanged`] and appends nothing. The comparison uses
    /// the column stored when the write begins.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when the task does not exist.
    pub async fn move_task(&self, id: &TaskId, column: Column) -> TaskBoardResult<MoveOutcome> {
        let applied = self.apply(id, &TaskChange::move_to(column)).await?;
        let Some(record) = applied.transition else {
            tracing::debug!(task_id = %id, %column, "task already in column");
            return Ok(MoveOutcome::Unchanged);
        };
        Ok(MoveOutcome::Moved(record))
    }

    /// Moves a task into the column named by `column`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::InvalidColumn`] before touching the store
    /// when `column` is not a workflow column, otherwise as
    /// [`Self::move_task`].
    pub async fn move_task_named(&self, id: &TaskId, column: &str) -> TaskBoardResult<MoveOutcome> {
        let parsed = Column::try_from(column)?;
        self.move_task(id, parsed).await
    }

    /// Deletes a task with its edges and transition history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when the task does not exist.
    pub async fn delete(&self, id: &TaskId) -> TaskBoardResult<()> {
        self.repository.delete(id).await?;
        tracing::info!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Assigns a task to `assignee`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when the task does not exist.
    pub async fn assign(&self, id: &TaskId, assignee: impl Into<String>) -> TaskBoardResult<Task> {
        self.set_assignee(id, Some(assignee.into())).await
    }

    /// Clears a task's assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when the task does not exist.
    pub async fn unassign(&self, id: &TaskId) -> TaskBoardResult<Task> {
        self.set_assignee(id, None).await
    }

    async fn set_assignee(&self, id: &TaskId, assignee: Option<String>) -> TaskBoardResult<Task> {
        let applied = self.apply(id, &TaskChange::assign(assignee)).await?;
        let task = applied.details.task;
        tracing::info!(task_id = %id, assignee = ?task.assignee(), "assignee changed");
        Ok(task)
    }

    /// Makes `id` depend on `depends_on`.
    ///
    /// Returns `false` when the edge already existed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] naming whichever task is
    /// missing.
    pub async fn add_dependency(&self, id: &TaskId, depends_on: &TaskId) -> TaskBoardResult<bool> {
        let edge = DependencyEdge::new(id.clone(), depends_on.clone());
        let inserted = self.repository.add_dependency(&edge).await?;
        tracing::info!(task_id = %id, depends_on = %depends_on, inserted, "dependency added");
        Ok(inserted)
    }

    /// Removes the edge making `id` depend on `depends_on`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when the edge does not exist.
    pub async fn remove_dependency(&self, id: &TaskId, depends_on: &TaskId) -> TaskBoardResult<()> {
        let edge = DependencyEdge::new(id.clone(), depends_on.clone());
        self.repository.remove_dependency(&edge).await?;
        tracing::info!(task_id = %id, depends_on = %depends_on, "dependency removed");
        Ok(())
    }

    /// Returns the transition history of one task, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when the task does not exist.
    pub async fn history(&self, id: &TaskId) -> TaskBoardResult<Vec<TransitionRecord>> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(TaskRepositoryError::NotFound(id.clone()).into());
        }
        Ok(self.repository.transitions_for(id).await?)
    }

    /// Returns every transition on the board, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when the lookup fails.
    pub async fn all_history(&self) -> TaskBoardResult<Vec<TransitionRecord>> {
        Ok(self.repository.all_transitions().await?)
    }

    /// Counts tasks per column.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when the lookup fails.
    pub async fn column_counts(&self) -> TaskBoardResult<ColumnCounts> {
        Ok(self.repository.column_counts().await?)
    }

    /// Computes average dwell time per column as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when the snapshot cannot be
    /// read.
    pub async fn dwell_stats(&self, now: DateTime<Utc>) -> TaskBoardResult<DwellStats> {
        let tasks = self.repository.list(&TaskFilter::new()).await?;
        let transitions = self.repository.all_transitions().await?;
        tracing::debug!(
            tasks = tasks.len(),
            transitions = transitions.len(),
            "computing dwell statistics"
        );
        Ok(compute_dwell_stats(
            tasks.iter().map(|details| &details.task),
            &transitions,
            now,
        ))
    }

    async fn apply(&self, id: &TaskId, change: &TaskChange) -> TaskBoardResult<AppliedChange> {
        let applied = self.repository.update(id, change, self.clock.utc()).await?;
        if let Some(moved) = &applied.transition {
            log_transition(moved);
        }
        Ok(applied)
    }
}

fn log_transition(record: &TransitionRecord) {
    tracing::info!(
        task_id = %record.task_id,
        from = ?record.from_column.map(Column::as_str),
        to = %record.to_column,
        "task moved"
    );
}

//! Task aggregate root and its dependency-resolved view.

use super::{Column, PendingTransition, TaskChange, TaskId, TaskTitle};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Task aggregate root.
///
/// The column is only changed through [`Task::move_to`] and
/// [`Task::apply`], both of which hand back the transition that must be
/// appended alongside the row update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: String,
    assignee: Option<String>,
    column: Column,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: String,
    /// Persisted assignee, if any.
    pub assignee: Option<String>,
    /// Persisted column.
    pub column: Column,
}

impl Task {
    /// Creates a new task placed in `column`.
    ///
    /// Returns the task together with its creation transition.
    #[must_use]
    pub fn new(
        id: TaskId,
        title: TaskTitle,
        column: Column,
        clock: &impl Clock,
    ) -> (Self, PendingTransition) {
        let transition = PendingTransition::creation(id.clone(), column, clock.utc());
        let task = Self {
            id,
            title,
            description: String::new(),
            assignee: None,
            column,
        };
        (task, transition)
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            assignee: data.assignee,
            column: data.column,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: Option<String>) -> Self {
        self.assignee = assignee;
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, empty when never set.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    /// Returns the column the task currently occupies.
    #[must_use]
    pub const fn column(&self) -> Column {
        self.column
    }

    /// Moves the task into `column` at instant `at`.
    ///
    /// Returns `None` without touching the task when it already occupies
    /// `column`.
    pub fn move_to(&mut self, column: Column, at: DateTime<Utc>) -> Option<PendingTransition> {
        if self.column == column {
            return None;
        }
        let transition = PendingTransition::movement(self.id.clone(), self.column, column, at);
        self.column = column;
        Some(transition)
    }

    /// Applies the scalar fields of `change` at instant `at`.
    ///
    /// Dependencies are not part of the aggregate and are ignored here. The
    /// transition, when returned, starts from the column the task occupied
    /// just before this call.
    pub fn apply(&mut self, change: &TaskChange, at: DateTime<Utc>) -> Option<PendingTransition> {
        if let Some(title) = change.title.as_set() {
            self.title.clone_from(title);
        }
        if let Some(description) = change.description.as_set() {
            self.description.clone_from(description);
        }
        if let Some(assignee) = change.assignee.as_set() {
            self.assignee.clone_from(assignee);
        }
        change
            .column
            .as_set()
            .and_then(|column| self.move_to(*column, at))
    }
}

/// Task together with the identities it depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDetails {
    /// The task itself.
    #[serde(flatten)]
    pub task: Task,
    /// Tasks this one depends on.
    pub dependencies: BTreeSet<TaskId>,
}

impl TaskDetails {
    /// Pairs a task with its dependency set.
    #[must_use]
    pub const fn new(task: Task, dependencies: BTreeSet<TaskId>) -> Self {
        Self { task, dependencies }
    }

    /// Returns `true` when the task depends on `id`.
    #[must_use]
    pub fn depends_on(&self, id: &TaskId) -> bool {
        self.dependencies.contains(id)
    }
}

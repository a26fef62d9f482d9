//! Task list filters and dependency edges.

use super::{Column, Task, TaskId};
use serde::{Deserialize, Serialize};

/// Conjunction of optional criteria used to narrow a task listing.
///
/// An empty filter matches every task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskFilter {
    title_prefix: Option<String>,
    column: Option<Column>,
    assignee: Option<String>,
}

impl TaskFilter {
    /// Creates a filter that matches every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to titles starting with `prefix` (case-sensitive).
    #[must_use]
    pub fn with_title_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.title_prefix = Some(prefix.into());
        self
    }

    /// Restricts to tasks in `column`.
    #[must_use]
    pub const fn with_column(mut self, column: Column) -> Self {
        self.column = Some(column);
        self
    }

    /// Restricts to tasks assigned to exactly `assignee`.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Returns the title prefix criterion.
    #[must_use]
    pub fn title_prefix(&self) -> Option<&str> {
        self.title_prefix.as_deref()
    }

    /// Returns the column criterion.
    #[must_use]
    pub const fn column(&self) -> Option<Column> {
        self.column
    }

    /// Returns the assignee criterion.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    /// Returns `true` when `task` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let title_matches = self
            .title_prefix()
            .is_none_or(|prefix| task.title().as_str().starts_with(prefix));
        let column_matches = self.column.is_none_or(|column| task.column() == column);
        let assignee_matches = self
            .assignee()
            .is_none_or(|assignee| task.assignee() == Some(assignee));
        title_matches && column_matches && assignee_matches
    }
}

/// Directed edge asserting that `task_id` depends on `depends_on`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Dependent task.
    pub task_id: TaskId,
    /// Task that must be finished first.
    pub depends_on: TaskId,
}

impl DependencyEdge {
    /// Creates an edge.
    #[must_use]
    pub const fn new(task_id: TaskId, depends_on: TaskId) -> Self {
        Self {
            task_id,
            depends_on,
        }
    }

    /// Returns `true` when either endpoint is `id`.
    #[must_use]
    pub fn touches(&self, id: &TaskId) -> bool {
        &self.task_id == id || &self.depends_on == id
    }
}

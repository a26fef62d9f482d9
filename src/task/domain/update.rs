//! Partial updates for existing tasks.

use super::{Column, TaskDomainError, TaskId, TaskTitle};
use std::collections::BTreeSet;

/// Requested change for a single field.
///
/// `Unchanged` leaves the stored value alone. `Set` replaces it, even when
/// the replacement is an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    /// Keep the current value.
    #[default]
    Unchanged,
    /// Replace the current value.
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// Returns the replacement value, if one was requested.
    #[must_use]
    pub const fn as_set(&self) -> Option<&T> {
        match self {
            Self::Unchanged => None,
            Self::Set(value) => Some(value),
        }
    }

    fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldUpdate<U> {
        match self {
            Self::Unchanged => FieldUpdate::Unchanged,
            Self::Set(value) => FieldUpdate::Set(f(value)),
        }
    }

    fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<FieldUpdate<U>, E> {
        match self {
            Self::Unchanged => Ok(FieldUpdate::Unchanged),
            Self::Set(value) => f(value).map(FieldUpdate::Set),
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unchanged, Self::Set)
    }
}

/// Set of field changes applied to one task in a single update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskPatch {
    /// New title.
    pub title: FieldUpdate<String>,
    /// New description.
    pub description: FieldUpdate<String>,
    /// New assignee, `Set(None)` clears it.
    pub assignee: FieldUpdate<Option<String>>,
    /// New column; a change appends a transition.
    pub column: FieldUpdate<Column>,
    /// Replacement dependency list; replaces every existing edge.
    pub dependencies: FieldUpdate<Vec<TaskId>>,
}

impl TaskPatch {
    /// Creates a patch that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = FieldUpdate::Set(title.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = FieldUpdate::Set(description.into());
        self
    }

    /// Sets or clears the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: Option<String>) -> Self {
        self.assignee = FieldUpdate::Set(assignee);
        self
    }

    /// Sets the column.
    #[must_use]
    pub const fn with_column(mut self, column: Column) -> Self {
        self.column = FieldUpdate::Set(column);
        self
    }

    /// Replaces the dependency list.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies = FieldUpdate::Set(dependencies.into_iter().collect());
        self
    }
}

/// Validated field changes, applied to the stored task inside the write
/// that persists them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskChange {
    /// New title.
    pub title: FieldUpdate<TaskTitle>,
    /// New description.
    pub description: FieldUpdate<String>,
    /// New assignee, `Set(None)` clears it.
    pub assignee: FieldUpdate<Option<String>>,
    /// Target column; compared with the stored column when applied.
    pub column: FieldUpdate<Column>,
    /// Replacement dependency set.
    pub dependencies: FieldUpdate<BTreeSet<TaskId>>,
}

impl TaskChange {
    /// Changes only the column.
    #[must_use]
    pub fn move_to(column: Column) -> Self {
        Self {
            column: FieldUpdate::Set(column),
            ..Self::default()
        }
    }

    /// Changes only the assignee.
    #[must_use]
    pub fn assign(assignee: Option<String>) -> Self {
        Self {
            assignee: FieldUpdate::Set(assignee),
            ..Self::default()
        }
    }
}

impl TryFrom<TaskPatch> for TaskChange {
    type Error = TaskDomainError;

    fn try_from(patch: TaskPatch) -> Result<Self, Self::Error> {
        Ok(Self {
            title: patch.title.try_map(TaskTitle::new)?,
            description: patch.description,
            assignee: patch.assignee,
            column: patch.column,
            dependencies: patch.dependencies.map(|ids| ids.into_iter().collect()),
        })
    }
}

//! Diesel row models for task board persistence.

use super::schema::{task_dependencies, task_transitions, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TaskRow {
    /// Task identifier.
    pub id: String,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Optional assignee.
    pub assignee: Option<String>,
    /// Workflow column display name.
    pub column_name: String,
}

/// Insert and update model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: String,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Optional assignee.
    pub assignee: Option<String>,
    /// Workflow column display name.
    pub column_name: String,
}

/// Dependency edge row, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_dependencies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DependencyRow {
    /// Dependent task identifier.
    pub task_id: String,
    /// Depended-on task identifier.
    pub depends_on_id: String,
}

/// Query result row for transition records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_transitions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransitionRow {
    /// Sequence number.
    pub id: i64,
    /// Task whose column changed.
    pub task_id: String,
    /// Column left behind.
    pub from_column: Option<String>,
    /// Column entered.
    pub to_column: String,
    /// Instant of the change.
    pub timestamp: DateTime<Utc>,
}

/// Insert model for transition records; the sequence number is assigned by
/// `SQLite`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_transitions)]
pub struct NewTransitionRow {
    /// Task whose column changed.
    pub task_id: String,
    /// Column left behind.
    pub from_column: Option<String>,
    /// Column entered.
    pub to_column: String,
    /// Instant of the change.
    pub timestamp: DateTime<Utc>,
}

//! Error types for task domain validation and parsing.

use super::Column;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is empty after trimming.
    #[error("task id must not be empty")]
    EmptyTaskId,

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,
}

/// Error returned when a value does not name a workflow column.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid column '{0}', valid columns: {valid}", valid = Column::valid_names())]
pub struct ParseColumnError(pub String);

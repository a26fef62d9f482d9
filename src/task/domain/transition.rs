//! Column transitions recorded in the append-only log.

use super::{Column, TaskId, TransitionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A column change that has been decided but not yet appended to the log.
///
/// Adapters turn a pending transition into a [`TransitionRecord`] by
/// assigning the next sequence number in the same atomic unit that writes
/// the task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransition {
    task_id: TaskId,
    from: Option<Column>,
    to: Column,
    at: DateTime<Utc>,
}

impl PendingTransition {
    /// Initial placement of a newly created task.
    #[must_use]
    pub const fn creation(task_id: TaskId, column: Column, at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            from: None,
            to: column,
            at,
        }
    }

    /// Move of an existing task between two columns.
    #[must_use]
    pub const fn movement(task_id: TaskId, from: Column, to: Column, at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            from: Some(from),
            to,
            at,
        }
    }

    /// Returns the task being moved.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the column being left, absent for creation.
    #[must_use]
    pub const fn from(&self) -> Option<Column> {
        self.from
    }

    /// Returns the column being entered.
    #[must_use]
    pub const fn to(&self) -> Column {
        self.to
    }

    /// Returns the instant of the change.
    #[must_use]
    pub const fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// Stamps the transition with its assigned sequence number.
    #[must_use]
    pub fn into_record(self, id: TransitionId) -> TransitionRecord {
        TransitionRecord {
            id,
            task_id: self.task_id,
            from_column: self.from,
            to_column: self.to,
            timestamp: self.at,
        }
    }
}

/// Immutable entry in the transition log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Sequence number, increasing in append order.
    pub id: TransitionId,
    /// Task whose column changed.
    pub task_id: TaskId,
    /// Column left behind, absent for the creation record.
    pub from_column: Option<Column>,
    /// Column entered.
    pub to_column: Column,
    /// Instant of the change.
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    /// Returns `true` for the record written when the task was created.
    #[must_use]
    pub const fn is_creation(&self) -> bool {
        self.from_column.is_none()
    }
}

/// Sorts records into analytics order: timestamp, then sequence number.
pub fn sort_chronologically(records: &mut [TransitionRecord]) {
    records.sort_by(|left, right| {
        left.timestamp
            .cmp(&right.timestamp)
            .then_with(|| left.id.cmp(&right.id))
    });
}

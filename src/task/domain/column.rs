//! Workflow columns and per-column task counts.

use super::ParseColumnError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Workflow column a task occupies.
///
/// Columns are listed in board order. Any column may follow any other; only
/// a move into the column a task already occupies is treated as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    /// A raw idea that nobody has reviewed yet.
    #[serde(rename = "idea")]
    Idea,
    /// An idea accepted for implementation.
    #[serde(rename = "approved idea")]
    ApprovedIdea,
    /// Work is in progress.
    #[serde(rename = "working on")]
    WorkingOn,
    /// Work cannot continue until something else happens.
    #[serde(rename = "blocked")]
    Blocked,
    /// Work is finished and awaiting review.
    #[serde(rename = "ready for review")]
    ReadyForReview,
    /// Work is complete.
    #[serde(rename = "done")]
    Done,
}

impl Column {
    /// Every column in board order.
    pub const ALL: [Self; 6] = [
        Self::Idea,
        Self::ApprovedIdea,
        Self::WorkingOn,
        Self::Blocked,
        Self::ReadyForReview,
        Self::Done,
    ];

    /// Returns the canonical display and storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::ApprovedIdea => "approved idea",
            Self::WorkingOn => "working on",
            Self::Blocked => "blocked",
            Self::ReadyForReview => "ready for review",
            Self::Done => "done",
        }
    }

    /// Returns `true` for the column that closes a task's lifecycle.
    ///
    /// Time spent in a terminal column is never counted as an open dwell
    /// interval.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Comma-separated list of valid column names, for error messages.
    #[must_use]
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|column| column.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl TryFrom<&str> for Column {
    type Error = ParseColumnError;

    /// Accepts exactly the canonical display names.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "idea" => Ok(Self::Idea),
            "approved idea" => Ok(Self::ApprovedIdea),
            "working on" => Ok(Self::WorkingOn),
            "blocked" => Ok(Self::Blocked),
            "ready for review" => Ok(Self::ReadyForReview),
            "done" => Ok(Self::Done),
            _ => Err(ParseColumnError(value.to_owned())),
        }
    }
}

impl FromStr for Column {
    type Err = ParseColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of tasks currently sitting in each column.
///
/// Every column is always present, with zero for empty columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnCounts(BTreeMap<Column, usize>);

impl ColumnCounts {
    /// Builds counts from an iterator of occupied columns.
    #[must_use]
    pub fn tally(columns: impl IntoIterator<Item = Column>) -> Self {
        let mut counts = Self::default();
        for column in columns {
            counts.0.entry(column).and_modify(|count| *count += 1);
        }
        counts
    }

    /// Builds counts from pre-aggregated `(column, count)` pairs.
    ///
    /// Columns absent from the input report zero.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Column, usize)>) -> Self {
        let mut counts = Self::default();
        counts.0.extend(pairs);
        counts
    }

    /// Returns the count for one column.
    #[must_use]
    pub fn get(&self, column: Column) -> usize {
        self.0.get(&column).copied().unwrap_or_default()
    }

    /// Total number of tasks on the board.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Iterates over `(column, count)` pairs in board order.
    pub fn iter(&self) -> impl Iterator<Item = (Column, usize)> + '_ {
        self.0.iter().map(|(column, count)| (*column, *count))
    }
}

impl Default for ColumnCounts {
    fn default() -> Self {
        Self(Column::ALL.into_iter().map(|column| (column, 0)).collect())
    }
}

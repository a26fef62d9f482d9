//! Per-column dwell-time statistics derived from the transition log.
//!
//! The computation is a pure function of the current tasks, the full
//! transition history, and an injected instant. It is recomputed from
//! scratch on every call and never mutates state.

use crate::task::domain::{Column, Task, TaskId, TransitionRecord, sort_chronologically};
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::{BTreeMap, HashMap};

/// Average dwell time for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDwell {
    /// No task has spent measurable time in the column.
    NoData,
    /// At least one dwell interval was observed.
    Measured {
        /// Mean interval length, rounded to the nearest millisecond.
        average: TimeDelta,
        /// Number of intervals averaged.
        samples: usize,
    },
}

impl ColumnDwell {
    /// Returns the average in whole milliseconds, if measured.
    #[must_use]
    pub const fn average_millis(self) -> Option<i64> {
        match self {
            Self::NoData => None,
            Self::Measured { average, .. } => Some(average.num_milliseconds()),
        }
    }

    /// Returns the number of samples, zero for [`ColumnDwell::NoData`].
    #[must_use]
    pub const fn samples(self) -> usize {
        match self {
            Self::NoData => 0,
            Self::Measured { samples, .. } => samples,
        }
    }
}

/// Snapshot of dwell statistics for every column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DwellStats {
    columns: BTreeMap<Column, ColumnDwell>,
}

impl DwellStats {
    /// Returns the statistics for one column.
    #[must_use]
    pub fn get(&self, column: Column) -> ColumnDwell {
        self.columns
            .get(&column)
            .copied()
            .unwrap_or(ColumnDwell::NoData)
    }

    /// Iterates over every column in board order.
    pub fn iter(&self) -> impl Iterator<Item = (Column, ColumnDwell)> + '_ {
        self.columns.iter().map(|(column, dwell)| (*column, *dwell))
    }
}

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_MILLI: i128 = 1_000_000;

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    total_nanos: i128,
    samples: i64,
}

impl Accumulator {
    fn record(&mut self, elapsed: TimeDelta) {
        let nanos = i128::from(elapsed.num_seconds()) * NANOS_PER_SECOND
            + i128::from(elapsed.subsec_nanos());
        self.total_nanos = self.total_nanos.saturating_add(nanos);
        self.samples += 1;
    }

    fn finish(self) -> ColumnDwell {
        if self.samples == 0 {
            return ColumnDwell::NoData;
        }
        let average = rounded_mean_millis(self.total_nanos, self.samples);
        ColumnDwell::Measured {
            average: TimeDelta::try_milliseconds(average).unwrap_or(TimeDelta::MAX),
            samples: usize::try_from(self.samples).unwrap_or(usize::MAX),
        }
    }
}

/// Mean of `total_nanos / count` in milliseconds, rounding halves toward
/// positive infinity.
fn rounded_mean_millis(total_nanos: i128, count: i64) -> i64 {
    let divisor = i128::from(count) * NANOS_PER_MILLI;
    let mean = total_nanos
        .saturating_mul(2)
        .saturating_add(divisor)
        .div_euclid(divisor * 2);
    i64::try_from(mean).unwrap_or(if mean < 0 { i64::MIN } else { i64::MAX })
}

/// Computes average dwell time per column as of `now`.
///
/// For each task the records are walked oldest first. Each record closes
/// the interval opened by the previous one and attributes it to the column
/// that was being occupied. A task whose current column is not terminal
/// contributes one more, still-open interval from its last record to `now`.
/// Tasks without records are skipped, as are records whose task is not in
/// `tasks`.
#[must_use]
pub fn compute_dwell_stats<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    transitions: &[TransitionRecord],
    now: DateTime<Utc>,
) -> DwellStats {
    let mut by_task: HashMap<&TaskId, Vec<TransitionRecord>> = HashMap::new();
    for record in transitions {
        by_task
            .entry(&record.task_id)
            .or_default()
            .push(record.clone());
    }

    let mut accumulators: BTreeMap<Column, Accumulator> = Column::ALL
        .into_iter()
        .map(|column| (column, Accumulator::default()))
        .collect();

    for task in tasks {
        let Some(records) = by_task.get_mut(task.id()) else {
            continue;
        };
        sort_chronologically(records);
        let Some((first, rest)) = records.split_first() else {
            continue;
        };

        let mut interval_start = first.timestamp;
        let mut occupied = first.to_column;
        for record in rest {
            accumulators
                .entry(occupied)
                .or_default()
                .record(record.timestamp - interval_start);
            interval_start = record.timestamp;
            occupied = record.to_column;
        }

        if !task.column().is_terminal() {
            accumulators
                .entry(task.column())
                .or_default()
                .record(now - interval_start);
        }
    }

    DwellStats {
        columns: accumulators
            .into_iter()
            .map(|(column, accumulator)| (column, accumulator.finish()))
            .collect(),
    }
}

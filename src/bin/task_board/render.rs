//! Plain-text and JSON rendering of service results.

use serde::Serialize;
use serde_json::{Map, Value, json};
use std::io::{self, Write};
use taskboard::task::{
    domain::{Column, ColumnCounts, TaskDetails, TransitionRecord},
    services::{ColumnDwell, DwellStats, MoveOutcome},
};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    Text,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum RenderError {
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) type RenderResult = Result<(), RenderError>;

pub(crate) struct Renderer<W: Write> {
    out: W,
    format: Format,
}

impl<W: Write> Renderer<W> {
    pub(crate) const fn new(out: W, format: Format) -> Self {
        Self { out, format }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn json(&mut self, value: &impl Serialize) -> RenderResult {
        serde_json::to_writer_pretty(&mut self.out, value)?;
        writeln!(self.out)?;
        Ok(())
    }

    /// Writes a confirmation line, or `{"message": ...}` in JSON mode.
    pub(crate) fn message(&mut self, text: &str) -> RenderResult {
        match self.format {
            Format::Json => self.json(&json!({ "message": text })),
            Format::Text => Ok(writeln!(self.out, "{text}")?),
        }
    }

    pub(crate) fn task(&mut self, details: &TaskDetails) -> RenderResult {
        if self.format == Format::Json {
            return self.json(details);
        }
        let task = &details.task;
        writeln!(self.out, "ID:           {}", task.id())?;
        writeln!(self.out, "Title:        {}", task.title())?;
        writeln!(self.out, "Column:       {}", task.column())?;
        writeln!(self.out, "Assignee:     {}", task.assignee().unwrap_or("-"))?;
        writeln!(self.out, "Dependencies: {}", dependency_list(details))?;
        if !task.description().is_empty() {
            writeln!(self.out, "Description:")?;
            writeln!(self.out, "{}", task.description())?;
        }
        Ok(())
    }

    /// Writes one line per task, or `empty` when there are none.
    pub(crate) fn tasks(&mut self, tasks: &[TaskDetails], empty: &str) -> RenderResult {
        if self.format == Format::Json {
            return self.json(&tasks);
        }
        if tasks.is_empty() {
            writeln!(self.out, "{empty}")?;
            return Ok(());
        }
        for details in tasks {
            let task = &details.task;
            writeln!(
                self.out,
                "{}\t[{}]\t{}\tassignee: {}\tdepends on: {}",
                task.id(),
                task.column(),
                task.title(),
                task.assignee().unwrap_or("-"),
                dependency_list(details),
            )?;
        }
        Ok(())
    }

    pub(crate) fn counts(&mut self, counts: &ColumnCounts) -> RenderResult {
        if self.format == Format::Json {
            return self.json(counts);
        }
        writeln!(self.out, "Task Statistics:")?;
        for (column, count) in counts.iter() {
            writeln!(self.out, "{column}: {count}")?;
        }
        Ok(())
    }

    pub(crate) fn history(&mut self, records: &[TransitionRecord]) -> RenderResult {
        if self.format == Format::Json {
            return self.json(&records);
        }
        for record in records {
            let from = record.from_column.map_or("(created)", Column::as_str);
            writeln!(
                self.out,
                "#{}\t{}\t{} -> {}",
                record.id,
                record.timestamp.to_rfc3339(),
                from,
                record.to_column,
            )?;
        }
        Ok(())
    }

    pub(crate) fn dwell(&mut self, stats: &DwellStats) -> RenderResult {
        if self.format == Format::Json {
            let columns: Map<String, Value> = stats
                .iter()
                .map(|(column, dwell)| (column.as_str().to_owned(), dwell_json(dwell)))
                .collect();
            return self.json(&columns);
        }
        writeln!(self.out, "Transition Statistics (Average time in ms):")?;
        for (column, dwell) in stats.iter() {
            match dwell {
                ColumnDwell::NoData => writeln!(self.out, "{column}: No data")?,
                ColumnDwell::Measured { average, samples } => writeln!(
                    self.out,
                    "{column}: {} ms ({samples} instances)",
                    average.num_milliseconds()
                )?,
            }
        }
        Ok(())
    }

    pub(crate) fn moved(&mut self, id: &str, outcome: &MoveOutcome) -> RenderResult {
        match (self.format, outcome) {
            (Format::Json, MoveOutcome::Moved(record)) => {
                self.json(&json!({ "moved": true, "transition": record }))
            }
            (Format::Json, MoveOutcome::Unchanged) => self.json(&json!({ "moved": false })),
            (Format::Text, MoveOutcome::Moved(record)) => Ok(writeln!(
                self.out,
                "Task {id} moved to \"{}\"",
                record.to_column
            )?),
            (Format::Text, MoveOutcome::Unchanged) => {
                Ok(writeln!(self.out, "Task is already in that column")?)
            }
        }
    }
}

fn dependency_list(details: &TaskDetails) -> String {
    if details.dependencies.is_empty() {
        return "-".to_owned();
    }
    details
        .dependencies
        .iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn dwell_json(dwell: ColumnDwell) -> Value {
    match dwell {
        ColumnDwell::NoData => Value::Null,
        ColumnDwell::Measured { average, samples } => json!({
            "average_ms": average.num_milliseconds(),
            "samples": samples,
        }),
    }
}

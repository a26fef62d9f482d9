//! Command-line front end for the task board.
//!
//! Usage:
//!
//! ```text
//! task-board [--database <path>] [--json] [--verbose] <command> [args]
//! ```
//!
//! The database defaults to `TASK_BOARD_DB`, then `simple-task-board.db` in
//! the working directory. Exit codes: `0` success, `1` storage or output
//! failure, `2` invalid input or column, `3` missing task or dependency,
//! `4` duplicate task identifier.

#[path = "task_board/cli.rs"]
mod cli;
#[path = "task_board/render.rs"]
mod render;

use clap::Parser;
use cli::{Cli, Command, DependencyCommand, SearchArgs};
use mockable::{Clock, DefaultClock};
use render::{Format, RenderError, Renderer};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use taskboard::config::{BoardConfig, ConfigError};
use taskboard::task::{
    adapters::sqlite::SqliteTaskRepository,
    domain::{Column, TaskDomainError, TaskFilter, TaskId, TaskPatch},
    services::{CreateTaskRequest, ErrorKind, TaskBoardError, TaskBoardService},
};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

type Board = TaskBoardService<SqliteTaskRepository, DefaultClock>;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Board(#[from] TaskBoardError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl From<TaskDomainError> for CliError {
    fn from(err: TaskDomainError) -> Self {
        Self::Board(err.into())
    }
}

impl CliError {
    const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Render(_) => 1,
            Self::Board(err) => match err.kind() {
                ErrorKind::Persistence => 1,
                ErrorKind::ValidationFailure | ErrorKind::InvalidColumn => 2,
                ErrorKind::NotFound => 3,
                ErrorKind::DuplicateIdentity => 4,
            },
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            // Nothing more can be reported if stderr is closed.
            let _ignored = writeln!(io::stderr().lock(), "Error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn open_board(database: Option<std::path::PathBuf>) -> Result<Board, CliError> {
    let mut config = BoardConfig::from_env()?;
    if let Some(path) = database {
        config = config.with_database_path(path);
    }
    let repository = SqliteTaskRepository::open(&config).map_err(TaskBoardError::from)?;
    Ok(TaskBoardService::new(
        Arc::new(repository),
        Arc::new(DefaultClock),
    ))
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let format = if cli.json { Format::Json } else { Format::Text };
    let board = open_board(cli.database)?;
    let mut out = Renderer::new(io::stdout().lock(), format);
    execute(&board, cli.command, &mut out).await
}

async fn execute<W: Write>(
    board: &Board,
    command: Command,
    out: &mut Renderer<W>,
) -> Result<(), CliError> {
    match command {
        Command::Add {
            id,
            title,
            description,
            assignee,
            column,
            dependencies,
        } => {
            let mut request = CreateTaskRequest::new(id, title, column)
                .with_dependencies(parse_ids(&dependencies)?);
            if let Some(text) = description {
                request = request.with_description(text);
            }
            if let Some(name) = assignee.filter(|name| !name.trim().is_empty()) {
                request = request.with_assignee(name);
            }
            let created = board.create(request).await?;
            out.message(&format!("Task added with ID: {}", created.task.id()))?;
        }
        Command::List => {
            let tasks = board.list(&TaskFilter::new()).await?;
            out.tasks(&tasks, "No tasks on the board.")?;
        }
        Command::Show { id } => out.task(&board.get(&TaskId::new(id)?).await?)?,
        Command::Update {
            id,
            title,
            description,
            assignee,
            column,
            dependencies,
        } => {
            let patch = TaskPatch {
                title: title.into(),
                description: description.into(),
                assignee: assignee
                    .map(|name| Some(name).filter(|value| !value.trim().is_empty()))
                    .into(),
                column: column.into(),
                dependencies: dependencies
                    .map(|raw| parse_ids(&raw))
                    .transpose()?
                    .into(),
            };
            board.update(&TaskId::new(id)?, patch).await?;
            out.message("Task updated")?;
        }
        Command::Delete { id } => {
            board.delete(&TaskId::new(id)?).await?;
            out.message("Task deleted")?;
        }
        Command::Search(args) => {
            let tasks = board.list(&search_filter(args)).await?;
            out.tasks(&tasks, "No tasks found matching the criteria.")?;
        }
        Command::Assign { id, assignee } => {
            let task = board.assign(&TaskId::new(id)?, assignee).await?;
            out.message(&format!(
                "Task {} assigned to {}",
                task.id(),
                task.assignee().unwrap_or_default()
            ))?;
        }
        Command::Unassign { id } => {
            let task = board.unassign(&TaskId::new(id)?).await?;
            out.message(&format!("Task {} unassigned", task.id()))?;
        }
        Command::Stats => out.counts(&board.column_counts().await?)?,
        Command::History { id } => out.history(&board.history(&TaskId::new(id)?).await?)?,
        Command::TransitionStats => {
            out.dwell(&board.dwell_stats(DefaultClock.utc()).await?)?;
        }
        Command::Move { id, column } => {
            let task_id = TaskId::new(id)?;
            let outcome = board.move_task_named(&task_id, &column).await?;
            out.moved(task_id.as_str(), &outcome)?;
        }
        Command::Dependency(DependencyCommand::Add {
            task_id,
            depends_on,
        }) => {
            let (dependent, target) = (TaskId::new(task_id)?, TaskId::new(depends_on)?);
            let inserted = board.add_dependency(&dependent, &target).await?;
            let verb = if inserted { "added" } else { "already present" };
            out.message(&format!(
                "Dependency {verb}: Task {dependent} depends on {target}"
            ))?;
        }
        Command::Dependency(DependencyCommand::Remove {
            task_id,
            depends_on,
        }) => {
            let (dependent, target) = (TaskId::new(task_id)?, TaskId::new(depends_on)?);
            board.remove_dependency(&dependent, &target).await?;
            out.message(&format!(
                "Dependency removed: Task {dependent} no longer depends on {target}"
            ))?;
        }
        Command::MyTasks { assignee, column } => {
            let selected = column
                .as_deref()
                .map(Column::try_from)
                .transpose()
                .map_err(TaskBoardError::from)?;
            let tasks = board.assigned_to(&assignee, selected).await?;
            let empty = selected.map_or_else(
                || "No tasks found for this assignee".to_owned(),
                |col| format!("No tasks found for this assignee in column \"{col}\""),
            );
            out.tasks(&tasks, &empty)?;
        }
    }
    Ok(())
}

fn search_filter(args: SearchArgs) -> TaskFilter {
    let SearchArgs {
        title,
        column,
        assignee,
    } = args;
    let mut filter = TaskFilter::new();
    if let Some(prefix) = title {
        filter = filter.with_title_prefix(prefix);
    }
    if let Some(selected) = column {
        filter = filter.with_column(selected);
    }
    if let Some(name) = assignee {
        filter = filter.with_assignee(name);
    }
    filter
}

/// Parses a comma-separated identifier list, ignoring blank entries.
fn parse_ids(raw: &[String]) -> Result<Vec<TaskId>, TaskDomainError> {
    raw.iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(TaskId::new)
        .collect()
}

//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use taskboard::task::domain::Column;

/// Manage a task board with workflow columns, dependencies, and transition
/// tracking.
#[derive(Parser, Debug)]
#[command(name = "task-board")]
#[command(version)]
#[command(about = "Manage a task board with columns, dependencies, and transition tracking")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,

    /// Database file.
    #[arg(long, global = true, env = "TASK_BOARD_DB")]
    pub(crate) database: Option<PathBuf>,

    /// Emit JSON instead of plain text.
    #[arg(long, global = true)]
    pub(crate) json: bool,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Create a task and record its initial column.
    Add {
        /// Task identifier.
        #[arg(short, long)]
        id: String,
        /// Task title.
        #[arg(short, long)]
        title: String,
        /// Markdown description.
        #[arg(short, long)]
        description: Option<String>,
        /// Assignee name.
        #[arg(short, long)]
        assignee: Option<String>,
        /// Initial column.
        #[arg(short, long)]
        column: Column,
        /// Comma-separated identifiers this task depends on.
        #[arg(long, value_delimiter = ',')]
        dependencies: Vec<String>,
    },

    /// List every task with its dependencies.
    List,

    /// Show one task.
    Show {
        /// Task identifier.
        id: String,
    },

    /// Change selected fields of a task.
    Update {
        /// Task identifier.
        id: String,
        /// New title.
        #[arg(short, long)]
        title: Option<String>,
        /// New description.
        #[arg(short, long)]
        description: Option<String>,
        /// New assignee; an empty value clears it.
        #[arg(short, long)]
        assignee: Option<String>,
        /// New column; records a transition when it differs.
        #[arg(short, long)]
        column: Option<Column>,
        /// Comma-separated identifiers replacing the current dependencies.
        #[arg(long, value_delimiter = ',')]
        dependencies: Option<Vec<String>>,
    },

    /// Delete a task with its dependencies and history.
    Delete {
        /// Task identifier.
        id: String,
    },

    /// Find tasks matching every given criterion.
    Search(SearchArgs),

    /// Assign a task.
    Assign {
        /// Task identifier.
        id: String,
        /// Assignee name.
        assignee: String,
    },

    /// Clear a task's assignee.
    Unassign {
        /// Task identifier.
        id: String,
    },

    /// Count tasks per column.
    Stats,

    /// Show the transition history of a task.
    History {
        /// Task identifier.
        id: String,
    },

    /// Average time spent in each column.
    TransitionStats,

    /// Move a task to another column.
    Move {
        /// Task identifier.
        id: String,
        /// Destination column.
        column: String,
    },

    /// Add or remove a single dependency.
    #[command(subcommand)]
    Dependency(DependencyCommand),

    /// Tasks assigned to someone, newest identifier first.
    MyTasks {
        /// Assignee name.
        assignee: String,
        /// Restrict to one column.
        column: Option<String>,
    },
}

/// Search criteria; omitted criteria match everything.
#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Case-sensitive title prefix.
    #[arg(short, long)]
    pub(crate) title: Option<String>,
    /// Exact column.
    #[arg(short, long)]
    pub(crate) column: Option<Column>,
    /// Exact assignee.
    #[arg(short, long)]
    pub(crate) assignee: Option<String>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum DependencyCommand {
    /// Make `task_id` depend on `depends_on`.
    Add {
        /// Dependent task.
        task_id: String,
        /// Task depended upon.
        depends_on: String,
    },
    /// Remove the dependency of `task_id` on `depends_on`.
    Remove {
        /// Dependent task.
        task_id: String,
        /// Task depended upon.
        depends_on: String,
    },
}

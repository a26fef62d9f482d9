//! Application services for task board orchestration.

mod analytics;
mod board;

pub use analytics::{ColumnDwell, DwellStats, compute_dwell_stats};
pub use board::{
    CreateTaskRequest, ErrorKind, MoveOutcome, TaskBoardError, TaskBoardResult, TaskBoardService,
};

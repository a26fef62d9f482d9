//! Domain model for the task board.
//!
//! The domain covers the closed set of workflow columns, the task aggregate,
//! transition records, dependency edges, and partial updates, while keeping
//! all infrastructure concerns outside of the domain boundary.

mod column;
mod error;
mod filter;
mod ids;
mod task;
mod transition;
mod update;

pub use column::{Column, ColumnCounts};
pub use error::{ParseColumnError, TaskDomainError};
pub use filter::{DependencyEdge, TaskFilter};
pub use ids::{TaskId, TaskTitle, TransitionId};
pub use task::{PersistedTaskData, Task, TaskDetails};
pub use transition::{PendingTransition, TransitionRecord, sort_chronologically};
pub use update::{FieldUpdate, TaskChange, TaskPatch};

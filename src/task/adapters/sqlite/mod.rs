//! Embedded `SQLite` adapters for task board persistence.

mod migrations;
mod models;
mod repository;
mod schema;

pub use repository::{SqliteTaskRepository, TaskSqlitePool};

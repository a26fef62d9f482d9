//! Persistence adapters for the task board.
//!
//! This module provides concrete implementations of the [`TaskRepository`]
//! and [`TransitionLog`] ports. Adapters handle all infrastructure concerns
//! while the domain remains pure.
//!
//! # Available Adapters
//!
//! - [`memory::InMemoryTaskRepository`]: Thread-safe in-memory storage for
//!   unit testing
//! - [`sqlite::SqliteTaskRepository`]: Embedded `SQLite` persistence using
//!   Diesel ORM
//!
//! [`TaskRepository`]: crate::task::ports::TaskRepository
//! [`TransitionLog`]: crate::task::ports::TransitionLog

pub mod memory;
pub mod sqlite;

//! Task board: workflow columns, transition history, and dwell analytics.
//!
//! This crate tracks tasks moving through a fixed set of workflow columns,
//! records every column change in an append-only transition log, maintains
//! dependency links between tasks, and derives per-column dwell-time
//! statistics from the log.
//!
//! # Architecture
//!
//! The board follows hexagonal architecture principles:
//!
//! - **Domain**: Columns, tasks, transitions, and partial updates with no
//!   infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for task storage and the
//!   transition log
//! - **Adapters**: In-memory and embedded `SQLite` implementations of the
//!   ports
//! - **Services**: The task board service and the pure dwell-time analytics
//!
//! # Modules
//!
//! - [`task`]: Task state model, storage, and transition analytics
//! - [`config`]: Runtime configuration for the embedded store

pub mod config;
pub mod task;

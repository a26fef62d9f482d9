//! Task board management.
//!
//! Tasks move through a fixed six-column workflow. Every placement is
//! appended to an immutable transition log, from which per-column dwell
//! statistics are derived. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

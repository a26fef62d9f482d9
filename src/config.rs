//! Runtime configuration for the embedded task board store.
//!
//! Configuration is read from the environment with built-in defaults, and
//! the command-line collaborator may override individual values.

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the database file.
pub const DATABASE_ENV: &str = "TASK_BOARD_DB";

/// Environment variable holding the connection pool size.
pub const POOL_SIZE_ENV: &str = "TASK_BOARD_POOL_SIZE";

/// Errors returned while resolving configuration values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The pool size is not a number.
    #[error("invalid TASK_BOARD_POOL_SIZE value '{0}', expected a positive integer")]
    InvalidPoolSize(String),

    /// The pool size is zero.
    #[error("pool size must be at least 1")]
    ZeroPoolSize,
}

/// Settings for opening the task board database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    database_path: PathBuf,
    pool_size: u32,
    busy_timeout: Duration,
}

impl BoardConfig {
    /// Database file used when nothing else is configured.
    pub const DEFAULT_DATABASE_PATH: &str = "simple-task-board.db";

    /// Connection pool size used when nothing else is configured.
    pub const DEFAULT_POOL_SIZE: u32 = 4;

    /// How long a connection waits on a locked database before failing.
    pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a configuration for the database at `database_path`.
    #[must_use]
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            pool_size: Self::DEFAULT_POOL_SIZE,
            busy_timeout: Self::DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Resolves configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `TASK_BOARD_POOL_SIZE` is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the pool size is malformed or zero.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_path = lookup(DATABASE_ENV)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_DATABASE_PATH.to_owned());
        let config = Self::new(database_path);
        let Some(raw) = lookup(POOL_SIZE_ENV) else {
            return Ok(config);
        };
        let size = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidPoolSize(raw.clone()))?;
        config.with_pool_size(size)
    }

    /// Replaces the database path.
    #[must_use]
    pub fn with_database_path(mut self, database_path: impl Into<PathBuf>) -> Self {
        self.database_path = database_path.into();
        self
    }

    /// Replaces the pool size.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroPoolSize`] when `pool_size` is zero.
    pub fn with_pool_size(mut self, pool_size: u32) -> Result<Self, ConfigError> {
        if pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        self.pool_size = pool_size;
        Ok(self)
    }

    /// Returns the database path.
    #[must_use]
    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    /// Returns the connection pool size.
    #[must_use]
    pub const fn pool_size(&self) -> u32 {
        self.pool_size
    }

    /// Returns the busy timeout.
    #[must_use]
    pub const fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DATABASE_PATH)
    }
}

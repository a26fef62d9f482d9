//! Tests for opening the store from environment configuration.

use super::helpers::{DatabaseDir, EnvVarGuard};
use rstest::rstest;
use std::ffi::OsString;
use taskboard::config::{BoardConfig, ConfigError, DATABASE_ENV, POOL_SIZE_ENV};
use taskboard::task::adapters::sqlite::SqliteTaskRepository;

#[rstest]
fn environment_selects_database_file() -> eyre::Result<()> {
    let dir = DatabaseDir::new()?;
    let config = {
        let _guard = EnvVarGuard::set_many(&[
            (DATABASE_ENV, Some(dir.database_path().into_os_string())),
            (POOL_SIZE_ENV, Some(OsString::from("2"))),
        ]);
        BoardConfig::from_env()?
    };

    eyre::ensure!(config.database_path() == dir.database_path(), "path ignored");
    eyre::ensure!(config.pool_size() == 2, "pool size ignored");
    SqliteTaskRepository::open(&config)?;
    eyre::ensure!(dir.database_path().exists(), "database not created");
    Ok(())
}

#[rstest]
fn malformed_pool_size_is_reported() -> eyre::Result<()> {
    let _guard = EnvVarGuard::set_many(&[
        (DATABASE_ENV, None),
        (POOL_SIZE_ENV, Some(OsString::from("lots"))),
    ]);

    let result = BoardConfig::from_env();

    eyre::ensure!(
        result == Err(ConfigError::InvalidPoolSize("lots".to_owned())),
        "unexpected result: {result:?}"
    );
    Ok(())
}

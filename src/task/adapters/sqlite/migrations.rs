//! Schema bootstrap for the embedded task board database.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::sqlite::SqliteConnection;
use thiserror::Error;

/// Latest schema version known to this build.
pub(super) const CURRENT_VERSION: i64 = 1;

const SCHEMA_MIGRATIONS: &str = "
    CREATE TABLE IF NOT EXISTS schema_migrations (
        version INTEGER PRIMARY KEY,
        applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );
";

const MIGRATION_1: &str = "
    CREATE TABLE IF NOT EXISTS tasks (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        assignee TEXT,
        column_name TEXT NOT NULL CHECK (column_name IN (
            'idea', 'approved idea', 'working on', 'blocked', 'ready for review', 'done'
        ))
    );

    CREATE TABLE IF NOT EXISTS task_dependencies (
        task_id TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
        depends_on_id TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
        PRIMARY KEY (task_id, depends_on_id)
    );

    CREATE TABLE IF NOT EXISTS task_transitions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        task_id TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
        from_column TEXT,
        to_column TEXT NOT NULL,
        timestamp TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_task_transitions_task_timestamp
        ON task_transitions (task_id, timestamp, id);
    CREATE INDEX IF NOT EXISTS idx_task_dependencies_depends_on
        ON task_dependencies (depends_on_id);

    INSERT OR IGNORE INTO schema_migrations (version) VALUES (1);
";

/// The database was migrated by a newer build.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("database schema version {found} is newer than supported version {supported}")]
pub(super) struct UnsupportedSchemaVersion {
    pub(super) found: i64,
    pub(super) supported: i64,
}

#[derive(QueryableByName)]
struct VersionRow {
    #[diesel(sql_type = diesel::sql_types::Nullable<BigInt>)]
    version: Option<i64>,
}

/// Applies every pending migration inside one transaction.
///
/// Running against an up-to-date database is a no-op.
pub(super) fn migrate(connection: &mut SqliteConnection) -> QueryResult<i64> {
    connection.immediate_transaction(|conn| {
        conn.batch_execute(SCHEMA_MIGRATIONS)?;
        let current = current_version(conn)?;
        if current < 1 {
            conn.batch_execute(MIGRATION_1)?;
            tracing::info!(version = 1, "applied task board schema migration");
        }
        current_version(conn)
    })
}

fn current_version(connection: &mut SqliteConnection) -> QueryResult<i64> {
    let row = diesel::sql_query("SELECT MAX(version) AS version FROM schema_migrations")
        .get_result::<VersionRow>(connection)?;
    Ok(row.version.unwrap_or_default())
}

//! `SQLite` repository implementation for task board storage.

use super::{
    migrations::{self, UnsupportedSchemaVersion},
    models::{DependencyRow, NewTaskRow, NewTransitionRow, TaskRow, TransitionRow},
    schema::{task_dependencies, task_transitions, tasks},
};
use crate::config::BoardConfig;
use crate::task::{
    domain::{
        Column, ColumnCounts, DependencyEdge, PendingTransition, PersistedTaskData, Task,
        TaskChange, TaskDetails, TaskFilter, TaskId, TaskTitle, TransitionId, TransitionRecord,
    },
    ports::{
        AppliedChange, TaskRepository, TaskRepositoryError, TaskRepositoryResult, TransitionLog,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// `SQLite` connection pool type used by task adapters.
pub type TaskSqlitePool = Pool<ConnectionManager<SqliteConnection>>;

const IN_MEMORY_DATABASE: &str = ":memory:";

/// Task ids bound per dependency lookup, well under `SQLite`'s bound
/// parameter limit.
const LOOKUP_CHUNK: usize = 500;

/// Per-connection settings applied whenever the pool hands out a connection.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, connection: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        let pragmas = format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        );
        connection
            .batch_execute(&pragmas)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// `SQLite`-backed task repository and transition log.
///
/// All database operations run on the blocking thread pool via
/// [`tokio::task::spawn_blocking`], and every write runs inside one
/// `BEGIN IMMEDIATE` transaction.
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    pool: TaskSqlitePool,
}

impl SqliteTaskRepository {
    /// Creates a new repository from an already migrated connection pool.
    #[must_use]
    pub const fn new(pool: TaskSqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the database described by `config`, creating and migrating it
    /// when needed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the pool cannot be
    /// built or the schema cannot be applied.
    pub fn open(config: &BoardConfig) -> TaskRepositoryResult<Self> {
        let url = config.database_path().to_string_lossy().into_owned();
        let manager = ConnectionManager::<SqliteConnection>::new(url);
        let pool = Pool::builder()
            .max_size(config.pool_size())
            .connection_customizer(Box::new(ConnectionOptions {
                busy_timeout: config.busy_timeout(),
            }))
            .build(manager)
            .map_err(TaskRepositoryError::persistence)?;
        tracing::debug!(
            path = %config.database_path().display(),
            pool_size = config.pool_size(),
            "opened task board database"
        );
        Self::initialize(pool)
    }

    /// Opens a private in-memory database.
    ///
    /// The pool holds exactly one connection that is never recycled, since
    /// each `SQLite` memory connection is its own database.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the connection or
    /// schema cannot be created.
    pub fn in_memory() -> TaskRepositoryResult<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(IN_MEMORY_DATABASE);
        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_customizer(Box::new(ConnectionOptions {
                busy_timeout: BoardConfig::DEFAULT_BUSY_TIMEOUT,
            }))
            .build(manager)
            .map_err(TaskRepositoryError::persistence)?;
        Self::initialize(pool)
    }

    fn initialize(pool: TaskSqlitePool) -> TaskRepositoryResult<Self> {
        let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
        // Persistent for file databases; `:memory:` keeps its own mode.
        connection.batch_execute("PRAGMA journal_mode = WAL;")?;
        let version = migrations::migrate(&mut connection)?;
        if version != migrations::CURRENT_VERSION {
            return Err(TaskRepositoryError::persistence(UnsupportedSchemaVersion {
                found: version,
                supported: migrations::CURRENT_VERSION,
            }));
        }
        drop(connection);
        Ok(Self::new(pool))
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn insert(
        &self,
        task: &Task,
        transition: &PendingTransition,
        dependencies: &BTreeSet<TaskId>,
    ) -> TaskRepositoryResult<TransitionRecord> {
        let task_id = task.id().clone();
        let new_row = to_new_row(task);
        let transition = transition.clone();
        let dependencies = dependencies.clone();

        self.run_blocking(move |connection| {
            connection.immediate_transaction(|conn| {
                // The primary key still guards the insert; the pre-check only
                // gives a semantic error before dependency validation runs.
                if task_exists(conn, &task_id)? {
                    return Err(TaskRepositoryError::DuplicateTask(task_id.clone()));
                }
                ensure_dependencies_exist(conn, &task_id, &dependencies)?;

                diesel::insert_into(tasks::table)
                    .values(&new_row)
                    .execute(conn)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            TaskRepositoryError::DuplicateTask(task_id.clone())
                        }
                        _ => TaskRepositoryError::persistence(err),
                    })?;
                let record = append_transition(conn, transition)?;
                insert_dependencies(conn, &task_id, &dependencies)?;
                Ok(record)
            })
        })
        .await
    }

    async fn update(
        &self,
        id: &TaskId,
        change: &TaskChange,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<AppliedChange> {
        let task_id = id.clone();
        let change = change.clone();

        self.run_blocking(move |connection| {
            connection.immediate_transaction(|conn| {
                let row = tasks::table
                    .find(task_id.as_str())
                    .select(TaskRow::as_select())
                    .first::<TaskRow>(conn)
                    .optional()?;
                let Some(stored) = row else {
                    return Err(TaskRepositoryError::NotFound(task_id.clone()));
                };
                let current = row_to_task(stored)?;
                if let Some(replacement) = change.dependencies.as_set() {
                    ensure_dependencies_exist(conn, &task_id, replacement)?;
                }

                let mut task = current.clone();
                let transition = task
                    .apply(&change, at)
                    .map(|pending| append_transition(conn, pending))
                    .transpose()?;
                if task != current {
                    diesel::update(tasks::table.find(task_id.as_str()))
                        .set(&to_new_row(&task))
                        .execute(conn)?;
                }
                if let Some(replacement) = change.dependencies.as_set() {
                    diesel::delete(
                        task_dependencies::table
                            .filter(task_dependencies::task_id.eq(task_id.as_str())),
                    )
                    .execute(conn)?;
                    insert_dependencies(conn, &task_id, replacement)?;
                }
                let dependencies = load_dependencies(conn, std::slice::from_ref(&task_id))?
                    .remove(&task_id)
                    .unwrap_or_default();
                Ok(AppliedChange {
                    details: TaskDetails::new(task, dependencies),
                    transition,
                })
            })
        })
        .await
    }

    async fn delete(&self, id: &TaskId) -> TaskRepositoryResult<()> {
        let task_id = id.clone();
        self.run_blocking(move |connection| {
            connection.immediate_transaction(|conn| {
                let key = task_id.as_str();
                diesel::delete(
                    task_dependencies::table.filter(
                        task_dependencies::task_id
                            .eq(key)
                            .or(task_dependencies::depends_on_id.eq(key)),
                    ),
                )
                .execute(conn)?;
                diesel::delete(task_transitions::table.filter(task_transitions::task_id.eq(key)))
                    .execute(conn)?;
                let removed = diesel::delete(tasks::table.find(key)).execute(conn)?;
                if removed == 0 {
                    return Err(TaskRepositoryError::NotFound(task_id.clone()));
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: &TaskId) -> TaskRepositoryResult<Option<TaskDetails>> {
        let task_id = id.clone();
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(task_id.as_str())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            let Some(found) = row else {
                return Ok(None);
            };
            let mut details = load_details(connection, vec![found])?;
            Ok(details.pop())
        })
        .await
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<TaskDetails>> {
        let filter = filter.clone();
        self.run_blocking(move |connection| {
            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let Some(column) = filter.column() {
                query = query.filter(tasks::column_name.eq(column.as_str()));
            }
            if let Some(assignee) = filter.assignee() {
                query = query.filter(tasks::assignee.eq(assignee));
            }
            let rows = query.order(tasks::id.asc()).load::<TaskRow>(connection)?;
            let details = load_details(connection, rows)?;
            // `LIKE` folds ASCII case in SQLite, so the prefix is checked here.
            Ok(details
                .into_iter()
                .filter(|detail| filter.matches(&detail.task))
                .collect())
        })
        .await
    }

    async fn add_dependency(&self, edge: &DependencyEdge) -> TaskRepositoryResult<bool> {
        let edge = edge.clone();
        self.run_blocking(move |connection| {
            connection.immediate_transaction(|conn| {
                if !task_exists(conn, &edge.task_id)? {
                    return Err(TaskRepositoryError::NotFound(edge.task_id.clone()));
                }
                if !task_exists(conn, &edge.depends_on)? {
                    return Err(TaskRepositoryError::DependencyNotFound(
                        edge.depends_on.clone(),
                    ));
                }
                let inserted = diesel::insert_or_ignore_into(task_dependencies::table)
                    .values(DependencyRow {
                        task_id: edge.task_id.as_str().to_owned(),
                        depends_on_id: edge.depends_on.as_str().to_owned(),
                    })
                    .execute(conn)?;
                Ok(inserted > 0)
            })
        })
        .await
    }

    async fn remove_dependency(&self, edge: &DependencyEdge) -> TaskRepositoryResult<()> {
        let edge = edge.clone();
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                task_dependencies::table
                    .filter(task_dependencies::task_id.eq(edge.task_id.as_str()))
                    .filter(task_dependencies::depends_on_id.eq(edge.depends_on.as_str())),
            )
            .execute(connection)?;
            if removed == 0 {
                return Err(TaskRepositoryError::EdgeNotFound(edge));
            }
            Ok(())
        })
        .await
    }

    async fn column_counts(&self) -> TaskRepositoryResult<ColumnCounts> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .group_by(tasks::column_name)
                .select((tasks::column_name, diesel::dsl::count_star()))
                .load::<(String, i64)>(connection)?;
            let pairs = rows
                .into_iter()
                .map(|(name, count)| {
                    let column = parse_column(&name)?;
                    let tally = usize::try_from(count).map_err(TaskRepositoryError::persistence)?;
                    Ok((column, tally))
                })
                .collect::<TaskRepositoryResult<Vec<_>>>()?;
            Ok(ColumnCounts::from_pairs(pairs))
        })
        .await
    }
}

#[async_trait]
impl TransitionLog for SqliteTaskRepository {
    async fn transitions_for(&self, id: &TaskId) -> TaskRepositoryResult<Vec<TransitionRecord>> {
        let task_id = id.clone();
        self.run_blocking(move |connection| {
            task_transitions::table
                .filter(task_transitions::task_id.eq(task_id.as_str()))
                .order((task_transitions::timestamp.asc(), task_transitions::id.asc()))
                .select(TransitionRow::as_select())
                .load::<TransitionRow>(connection)?
                .into_iter()
                .map(row_to_transition)
                .collect()
        })
        .await
    }

    async fn all_transitions(&self) -> TaskRepositoryResult<Vec<TransitionRecord>> {
        self.run_blocking(move |connection| {
            task_transitions::table
                .order((task_transitions::timestamp.asc(), task_transitions::id.asc()))
                .select(TransitionRow::as_select())
                .load::<TransitionRow>(connection)?
                .into_iter()
                .map(row_to_transition)
                .collect()
        })
        .await
    }
}

fn task_exists(connection: &mut SqliteConnection, id: &TaskId) -> TaskRepositoryResult<bool> {
    let found = diesel::select(diesel::dsl::exists(tasks::table.find(id.as_str())))
        .get_result::<bool>(connection)?;
    Ok(found)
}

/// Checks every dependency of `owner` names a stored task or `owner` itself.
fn ensure_dependencies_exist(
    connection: &mut SqliteConnection,
    owner: &TaskId,
    dependencies: &BTreeSet<TaskId>,
) -> TaskRepositoryResult<()> {
    for dependency in dependencies.iter().filter(|id| *id != owner) {
        if !task_exists(connection, dependency)? {
            return Err(TaskRepositoryError::DependencyNotFound(dependency.clone()));
        }
    }
    Ok(())
}

fn insert_dependencies(
    connection: &mut SqliteConnection,
    task_id: &TaskId,
    dependencies: &BTreeSet<TaskId>,
) -> TaskRepositoryResult<()> {
    for dependency in dependencies {
        diesel::insert_or_ignore_into(task_dependencies::table)
            .values(DependencyRow {
                task_id: task_id.as_str().to_owned(),
                depends_on_id: dependency.as_str().to_owned(),
            })
            .execute(connection)?;
    }
    Ok(())
}

fn append_transition(
    connection: &mut SqliteConnection,
    transition: PendingTransition,
) -> TaskRepositoryResult<TransitionRecord> {
    let new_row = NewTransitionRow {
        task_id: transition.task_id().as_str().to_owned(),
        from_column: transition.from().map(|column| column.as_str().to_owned()),
        to_column: transition.to().as_str().to_owned(),
        timestamp: transition.at(),
    };
    let row = diesel::insert_into(task_transitions::table)
        .values(&new_row)
        .returning(TransitionRow::as_returning())
        .get_result::<TransitionRow>(connection)?;
    row_to_transition(row)
}

fn load_details(
    connection: &mut SqliteConnection,
    rows: Vec<TaskRow>,
) -> TaskRepositoryResult<Vec<TaskDetails>> {
    let ids = rows
        .iter()
        .map(|row| TaskId::new(row.id.as_str()).map_err(TaskRepositoryError::persistence))
        .collect::<TaskRepositoryResult<Vec<_>>>()?;
    let mut dependencies = load_dependencies(connection, &ids)?;

    rows.into_iter()
        .map(|row| {
            let task = row_to_task(row)?;
            let deps = dependencies.remove(task.id()).unwrap_or_default();
            Ok(TaskDetails::new(task, deps))
        })
        .collect()
}

fn load_dependencies(
    connection: &mut SqliteConnection,
    ids: &[TaskId],
) -> TaskRepositoryResult<BTreeMap<TaskId, BTreeSet<TaskId>>> {
    let mut dependencies: BTreeMap<TaskId, BTreeSet<TaskId>> = BTreeMap::new();
    for chunk in ids.chunks(LOOKUP_CHUNK) {
        let keys: Vec<&str> = chunk.iter().map(TaskId::as_str).collect();
        let edges = task_dependencies::table
            .filter(task_dependencies::task_id.eq_any(keys))
            .select(DependencyRow::as_select())
            .load::<DependencyRow>(connection)?;
        for edge in edges {
            let task_id = TaskId::new(edge.task_id).map_err(TaskRepositoryError::persistence)?;
            let depends_on =
                TaskId::new(edge.depends_on_id).map_err(TaskRepositoryError::persistence)?;
            dependencies.entry(task_id).or_default().insert(depends_on);
        }
    }
    Ok(dependencies)
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().as_str().to_owned(),
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        assignee: task.assignee().map(str::to_owned),
        column_name: task.column().as_str().to_owned(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        assignee,
        column_name,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::new(id).map_err(TaskRepositoryError::persistence)?,
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description,
        assignee,
        column: parse_column(&column_name)?,
    };
    Ok(Task::from_persisted(data))
}

fn row_to_transition(row: TransitionRow) -> TaskRepositoryResult<TransitionRecord> {
    let TransitionRow {
        id,
        task_id,
        from_column,
        to_column,
        timestamp,
    } = row;

    Ok(TransitionRecord {
        id: TransitionId::new(id),
        task_id: TaskId::new(task_id).map_err(TaskRepositoryError::persistence)?,
        from_column: from_column.as_deref().map(parse_column).transpose()?,
        to_column: parse_column(&to_column)?,
        timestamp,
    })
}

fn parse_column(value: &str) -> TaskRepositoryResult<Column> {
    Column::try_from(value).map_err(TaskRepositoryError::persistence)
}

//! Durability and schema tests for the on-disk `SQLite` store.

use super::helpers::DatabaseDir;
use crate::test_helpers::{Board, epoch, scenarios, task_id};
use chrono::TimeDelta;
use diesel::connection::SimpleConnection;
use diesel::{Connection, SqliteConnection};
use rstest::rstest;
use std::collections::BTreeSet;
use std::sync::Arc;
use taskboard::task::{
    adapters::sqlite::SqliteTaskRepository,
    domain::{Column, TaskFilter},
    services::{CreateTaskRequest, ErrorKind, MoveOutcome, TaskBoardError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn state_survives_reopening() -> eyre::Result<()> {
    let dir = DatabaseDir::new()?;
    {
        let board = Board::new(dir.open()?);
        scenarios::seed(&board, "A", Column::Idea).await?;
        board
            .service
            .create(
                CreateTaskRequest::new("B", "persist me", Column::Idea)
                    .with_assignee("alice")
                    .with_dependencies([task_id("A")?]),
            )
            .await?;
        board.clock.advance(TimeDelta::nanoseconds(1_234_567_891));
        let outcome = board.service.move_task(&task_id("B")?, Column::WorkingOn).await?;
        eyre::ensure!(matches!(outcome, MoveOutcome::Moved(_)), "move not recorded");
    }

    let reopened = Board::new(dir.open()?);
    let b = reopened.service.get(&task_id("B")?).await?;
    let history = reopened.service.history(&task_id("B")?).await?;

    eyre::ensure!(b.task.column() == Column::WorkingOn, "column lost");
    eyre::ensure!(b.task.assignee() == Some("alice"), "assignee lost");
    eyre::ensure!(b.dependencies == BTreeSet::from([task_id("A")?]), "edge lost");
    eyre::ensure!(history.len() == 2, "history lost");
    let last = history.last().ok_or_else(|| eyre::eyre!("empty history"))?;
    eyre::ensure!(
        last.timestamp == epoch() + TimeDelta::nanoseconds(1_234_567_891),
        "timestamp precision lost: {}",
        last.timestamp
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn opening_twice_keeps_existing_schema() -> eyre::Result<()> {
    let dir = DatabaseDir::new()?;
    let first = Board::new(dir.open()?);
    scenarios::seed(&first, "A", Column::Done).await?;

    let second = Board::new(dir.open()?);
    let counts = second.service.column_counts().await?;

    eyre::ensure!(counts.get(Column::Done) == 1, "existing rows lost on reopen");
    eyre::ensure!(dir.database_path().exists(), "database file missing");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_are_serialized() -> eyre::Result<()> {
    let dir = DatabaseDir::new()?;
    let board = Arc::new(Board::new(SqliteTaskRepository::open(
        &dir.config().with_pool_size(4)?,
    )?));

    let mut handles = Vec::new();
    for index in 0..16 {
        let shared = Arc::clone(&board);
        handles.push(tokio::spawn(async move {
            let id = format!("task-{index:02}");
            shared
                .service
                .create(CreateTaskRequest::new(id, "parallel", Column::Idea))
                .await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let listed = board.service.list(&TaskFilter::new()).await?;
    eyre::ensure!(listed.len() == 16, "expected 16 tasks, found {}", listed.len());
    eyre::ensure!(board.service.all_history().await?.len() == 16, "history mismatch");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_moves_chain_transitions() -> eyre::Result<()> {
    let dir = DatabaseDir::new()?;
    let board = Board::new(SqliteTaskRepository::open(&dir.config().with_pool_size(4)?)?);
    scenarios::concurrent_moves_chain_transitions(Arc::new(board)).await
}

#[rstest]
fn newer_schema_is_refused() -> eyre::Result<()> {
    let dir = DatabaseDir::new()?;
    drop(dir.open()?);
    let path = dir.database_path().to_string_lossy().into_owned();
    let mut connection = SqliteConnection::establish(&path)?;
    connection.batch_execute("INSERT INTO schema_migrations (version) VALUES (99);")?;
    drop(connection);

    let err = SqliteTaskRepository::open(&dir.config())
        .err()
        .ok_or_else(|| eyre::eyre!("newer schema accepted"))?;
    let message = err.to_string();
    let kind = TaskBoardError::from(err).kind();
    eyre::ensure!(kind == ErrorKind::Persistence, "wrong kind: {kind:?}");
    eyre::ensure!(message.contains("version 99"), "unexpected error: {message}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_spans_several_dependency_lookups() -> eyre::Result<()> {
    let dir = DatabaseDir::new()?;
    let board = Board::new(dir.open()?);
    let anchor = task_id("anchor")?;
    scenarios::seed(&board, "anchor", Column::Idea).await?;
    for index in 0..750 {
        board
            .service
            .create(
                CreateTaskRequest::new(format!("t-{index:04}"), "bulk", Column::Idea)
                    .with_dependencies([anchor.clone()]),
            )
            .await?;
    }

    let listed = board.service.list(&TaskFilter::new()).await?;
    let linked = listed
        .iter()
        .filter(|details| details.depends_on(&anchor))
        .count();
    eyre::ensure!(listed.len() == 751, "expected 751 tasks, found {}", listed.len());
    eyre::ensure!(linked == 750, "expected 750 linked tasks, found {linked}");
    Ok(())
}

//! In-memory integration tests for dwell statistics.

use crate::test_helpers::{Board, epoch, scenarios, task_id};
use chrono::TimeDelta;
use rstest::{fixture, rstest};
use taskboard::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::Column,
    services::ColumnDwell,
};

#[fixture]
fn board() -> Board<InMemoryTaskRepository> {
    Board::new(InMemoryTaskRepository::new())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dwell_stats_from_history(board: Board<InMemoryTaskRepository>) -> eyre::Result<()> {
    scenarios::dwell_stats_from_history(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_board_reports_no_data(board: Board<InMemoryTaskRepository>) -> eyre::Result<()> {
    let stats = board.service.dwell_stats(epoch()).await?;
    eyre::ensure!(
        stats.iter().all(|(_, dwell)| dwell == ColumnDwell::NoData),
        "empty board produced samples"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_tasks_stop_contributing(board: Board<InMemoryTaskRepository>) -> eyre::Result<()> {
    scenarios::seed(&board, "gone", Column::Blocked).await?;
    scenarios::seed(&board, "kept", Column::Blocked).await?;
    board.service.delete(&task_id("gone")?).await?;

    let stats = board
        .service
        .dwell_stats(epoch() + TimeDelta::seconds(42))
        .await?;

    eyre::ensure!(stats.get(Column::Blocked).samples() == 1, "deleted task counted");
    eyre::ensure!(
        stats.get(Column::Blocked).average_millis() == Some(42_000),
        "wrong average"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn revisited_columns_accumulate_samples(
    board: Board<InMemoryTaskRepository>,
) -> eyre::Result<()> {
    scenarios::seed(&board, "T", Column::WorkingOn).await?;
    let id = task_id("T")?;
    board.advance_secs(10);
    board.service.move_task(&id, Column::Blocked).await?;
    board.advance_secs(1);
    board.service.move_task(&id, Column::WorkingOn).await?;
    board.advance_secs(20);
    board.service.move_task(&id, Column::Done).await?;

    let stats = board
        .service
        .dwell_stats(epoch() + TimeDelta::hours(1))
        .await?;

    eyre::ensure!(
        stats.get(Column::WorkingOn)
            == ColumnDwell::Measured {
                average: TimeDelta::seconds(15),
                samples: 2,
            },
        "working on: {:?}",
        stats.get(Column::WorkingOn)
    );
    eyre::ensure!(stats.get(Column::Blocked).average_millis() == Some(1_000), "blocked");
    Ok(())
}

//! `SQLite` integration tests for task board operations.

use crate::test_helpers::{Board, scenarios};
use rstest::{fixture, rstest};
use taskboard::task::adapters::sqlite::SqliteTaskRepository;

#[fixture]
fn board() -> Board<SqliteTaskRepository> {
    let repository = SqliteTaskRepository::in_memory().expect("in-memory database opens");
    Board::new(repository)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_then_get(board: Board<SqliteTaskRepository>) -> eyre::Result<()> {
    scenarios::create_then_get(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_create_is_rejected(board: Board<SqliteTaskRepository>) -> eyre::Result<()> {
    scenarios::duplicate_create_is_rejected(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moves_track_last_transition(board: Board<SqliteTaskRepository>) -> eyre::Result<()> {
    scenarios::moves_track_last_transition(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn no_op_move_appends_nothing(board: Board<SqliteTaskRepository>) -> eyre::Result<()> {
    scenarios::no_op_move_appends_nothing(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn same_instant_records_keep_append_order(
    board: Board<SqliteTaskRepository>,
) -> eyre::Result<()> {
    scenarios::same_instant_records_keep_append_order(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_is_partial_and_atomic(board: Board<SqliteTaskRepository>) -> eyre::Result<()> {
    scenarios::update_is_partial_and_atomic(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_cascades(board: Board<SqliteTaskRepository>) -> eyre::Result<()> {
    scenarios::delete_cascades(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dependency_edges_round_trip(board: Board<SqliteTaskRepository>) -> eyre::Result<()> {
    scenarios::dependency_edges_round_trip(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_filters_and_orders(board: Board<SqliteTaskRepository>) -> eyre::Result<()> {
    scenarios::list_filters_and_orders(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn column_counts_include_empty_columns(
    board: Board<SqliteTaskRepository>,
) -> eyre::Result<()> {
    scenarios::column_counts_include_empty_columns(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dwell_stats_from_history(board: Board<SqliteTaskRepository>) -> eyre::Result<()> {
    scenarios::dwell_stats_from_history(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn self_dependencies_are_accepted(board: Board<SqliteTaskRepository>) -> eyre::Result<()> {
    scenarios::self_dependencies_are_accepted(&board).await
}

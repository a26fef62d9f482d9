//! In-memory integration tests for task board operations.

use crate::test_helpers::{Board, scenarios};
use rstest::{fixture, rstest};
use std::sync::Arc;
use taskboard::task::adapters::memory::InMemoryTaskRepository;

#[fixture]
fn board() -> Board<InMemoryTaskRepository> {
    Board::new(InMemoryTaskRepository::new())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_then_get(board: Board<InMemoryTaskRepository>) -> eyre::Result<()> {
    scenarios::create_then_get(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_create_is_rejected(board: Board<InMemoryTaskRepository>) -> eyre::Result<()> {
    scenarios::duplicate_create_is_rejected(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moves_track_last_transition(board: Board<InMemoryTaskRepository>) -> eyre::Result<()> {
    scenarios::moves_track_last_transition(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn no_op_move_appends_nothing(board: Board<InMemoryTaskRepository>) -> eyre::Result<()> {
    scenarios::no_op_move_appends_nothing(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn same_instant_records_keep_append_order(
    board: Board<InMemoryTaskRepository>,
) -> eyre::Result<()> {
    scenarios::same_instant_records_keep_append_order(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_is_partial_and_atomic(board: Board<InMemoryTaskRepository>) -> eyre::Result<()> {
    scenarios::update_is_partial_and_atomic(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_cascades(board: Board<InMemoryTaskRepository>) -> eyre::Result<()> {
    scenarios::delete_cascades(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dependency_edges_round_trip(board: Board<InMemoryTaskRepository>) -> eyre::Result<()> {
    scenarios::dependency_edges_round_trip(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_filters_and_orders(board: Board<InMemoryTaskRepository>) -> eyre::Result<()> {
    scenarios::list_filters_and_orders(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn column_counts_include_empty_columns(
    board: Board<InMemoryTaskRepository>,
) -> eyre::Result<()> {
    scenarios::column_counts_include_empty_columns(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn self_dependencies_are_accepted(board: Board<InMemoryTaskRepository>) -> eyre::Result<()> {
    scenarios::self_dependencies_are_accepted(&board).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_moves_chain_transitions(
    board: Board<InMemoryTaskRepository>,
) -> eyre::Result<()> {
    scenarios::concurrent_moves_chain_transitions(Arc::new(board)).await
}

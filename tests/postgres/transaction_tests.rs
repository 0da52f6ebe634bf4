//! Rollback and write serialization against `PostgreSQL`.

use crate::postgres::helpers::{BoxError, PreparedStore, prepare_store, prepared_store};
use kanban::board::{
    domain::{Ordinal, TaskId},
    ports::{BoardStore, BoardStoreError},
    services::{MoveTaskRequest, OrderingError},
};
use rstest::rstest;

#[rstest]
#[ignore = "requires KANBAN_TEST_DATABASE_URL"]
fn failed_unit_of_work_is_rolled_back(
    prepared_store: Result<PreparedStore, BoxError>,
) -> Result<(), BoxError> {
    let ctx = prepared_store?;
    let tasks = ctx.seed("Todo", &["A", "B"])?;
    let a = tasks.first().ok_or("missing task A")?.id();
    let before = ctx.rt.block_on(ctx.engine.list_board())?;

    let result: Result<(), OrderingError> = ctx.rt.block_on(ctx.store().write(move |tx| {
        tx.set_ordinal(a, Ordinal::new(40).map_err(OrderingError::from)?)?;
        Err(OrderingError::TaskNotFound(TaskId::new(999).map_err(OrderingError::from)?))
    }));

    assert!(matches!(result, Err(OrderingError::TaskNotFound(_))));
    let after = ctx.rt.block_on(ctx.engine.list_board())?;
    assert_eq!(after, before);
    Ok(())
}

#[rstest]
#[ignore = "requires KANBAN_TEST_DATABASE_URL"]
fn reads_cannot_write(
    prepared_store: Result<PreparedStore, BoxError>,
) -> Result<(), BoxError> {
    let ctx = prepared_store?;
    let tasks = ctx.seed("Todo", &["A"])?;
    let a = tasks.first().ok_or("missing task A")?.id();
    let ord = Ordinal::new(9)?;

    let result = ctx
        .rt
        .block_on(ctx.store().read(move |tx| tx.set_ordinal(a, ord)));

    assert!(matches!(result, Err(BoardStoreError::Persistence(_))));
    assert_eq!(ctx.layout("Todo")?, [("A".to_owned(), 1)]);
    Ok(())
}

#[test]
#[ignore = "requires KANBAN_TEST_DATABASE_URL"]
fn concurrent_moves_keep_every_column_dense() -> Result<(), BoxError> {
    let ctx = prepare_store(6)?;
    let mut tasks = ctx.seed("Todo", &["A", "B", "C", "D", "E", "F"])?;
    tasks.extend(ctx.seed("Doing", &["G", "H", "I", "J"])?);
    let columns: Vec<i64> = ["Todo", "Doing", "Done"]
        .iter()
        .map(|name| ctx.column(name).map(|column| column.id().value()))
        .collect::<Result<_, _>>()?;

    let handles: Vec<_> = tasks
        .iter()
        .zip(columns.iter().cycle())
        .zip(1_i32..)
        .map(|((task, column), slot)| {
            let engine = ctx.engine.clone();
            let request =
                MoveTaskRequest::new(task.id().value(), *column).with_target_ordinal(slot);
            ctx.rt.spawn(async move { engine.move_task(request).await })
        })
        .collect();
    for handle in handles {
        ctx.rt.block_on(handle)??;
    }

    let board = ctx.rt.block_on(ctx.engine.list_board())?;
    assert_eq!(board.tasks().len(), 10);
    assert!(board.check_density().is_empty());
    Ok(())
}

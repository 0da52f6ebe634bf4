//! Creation, relocation, and lookup failure scenarios on a seeded board.

use crate::in_memory::helpers::{MemoryEngine, column_named, engine, layout, seed};
use kanban::board::services::{CreateTaskRequest, ErrorKind, MoveTaskRequest, OrderingError};
use rstest::rstest;
use tokio::runtime::Runtime;

fn owned(entries: &[(&str, i32)]) -> Vec<(String, i32)> {
    entries
        .iter()
        .map(|(title, ord)| ((*title).to_owned(), *ord))
        .collect()
}

#[rstest]
fn seeded_board_has_three_ordered_columns(
    engine: eyre::Result<(Runtime, MemoryEngine)>,
) -> eyre::Result<()> {
    let (rt, engine) = engine?;
    let board = rt.block_on(engine.list_board())?;

    let columns: Vec<(&str, i32)> = board
        .columns()
        .iter()
        .map(|column| (column.name(), column.ord()))
        .collect();
    assert_eq!(columns, [("Todo", 1), ("Doing", 2), ("Done", 3)]);
    assert!(board.tasks().is_empty());
    Ok(())
}

#[rstest]
fn created_tasks_take_consecutive_ordinals(
    engine: eyre::Result<(Runtime, MemoryEngine)>,
) -> eyre::Result<()> {
    let (rt, engine) = engine?;
    let created = seed(&rt, &engine, "Todo", &["Draft plan", "Review"])?;

    let ords: Vec<i32> = created.iter().map(|task| task.ord().value()).collect();
    assert_eq!(ords, [1, 2]);
    assert_eq!(
        layout(&rt, &engine, "Todo")?,
        owned(&[("Draft plan", 1), ("Review", 2)])
    );
    Ok(())
}

#[rstest]
fn appended_move_closes_the_source_gap(
    engine: eyre::Result<(Runtime, MemoryEngine)>,
) -> eyre::Result<()> {
    let (rt, engine) = engine?;
    let created = seed(&rt, &engine, "Todo", &["First", "Second"])?;
    let first = created.first().ok_or_else(|| eyre::eyre!("no task created"))?;
    let doing = column_named(&rt, &engine, "Doing")?;

    let moved = rt.block_on(
        engine.move_task(MoveTaskRequest::new(first.id().value(), doing.id().value())),
    )?;

    assert_eq!(moved.col_id(), doing.id());
    assert_eq!(moved.ord().value(), 1);
    assert_eq!(layout(&rt, &engine, "Todo")?, owned(&[("Second", 1)]));
    Ok(())
}

#[rstest]
fn moving_an_unknown_task_is_not_found(
    engine: eyre::Result<(Runtime, MemoryEngine)>,
) -> eyre::Result<()> {
    let (rt, engine) = engine?;
    let doing = column_named(&rt, &engine, "Doing")?;

    let result = rt.block_on(
        engine.move_task(MoveTaskRequest::new(999, doing.id().value()).with_target_ordinal(1)),
    );

    let Err(err) = result else {
        return Err(eyre::eyre!("move of an unknown task should fail"));
    };
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(err, OrderingError::TaskNotFound(_)));
    Ok(())
}

#[rstest]
fn creating_in_an_unknown_column_is_not_found(
    engine: eyre::Result<(Runtime, MemoryEngine)>,
) -> eyre::Result<()> {
    let (rt, engine) = engine?;

    let result = rt.block_on(engine.create_task(CreateTaskRequest::new(404, "Lost")));

    let Err(err) = result else {
        return Err(eyre::eyre!("creation in an unknown column should fail"));
    };
    assert!(matches!(err, OrderingError::ColumnNotFound(id) if id.value() == 404));
    assert_eq!(err.client_message(), "column not found: 404");
    Ok(())
}

#[rstest]
fn advancing_walks_a_task_across_the_board(
    engine: eyre::Result<(Runtime, MemoryEngine)>,
) -> eyre::Result<()> {
    let (rt, engine) = engine?;
    let created = seed(&rt, &engine, "Todo", &["Card"])?;
    let card = created.first().ok_or_else(|| eyre::eyre!("no task created"))?;
    let task_id = card.id().value();

    let in_doing = rt.block_on(engine.advance_task(task_id))?;
    let in_done = rt.block_on(engine.advance_task(task_id))?;
    let stuck = rt.block_on(engine.advance_task(task_id));

    assert_eq!(in_doing.col_id(), column_named(&rt, &engine, "Doing")?.id());
    assert_eq!(in_done.col_id(), column_named(&rt, &engine, "Done")?.id());
    assert!(matches!(stuck, Err(OrderingError::AlreadyInLastColumn { .. })));
    assert_eq!(layout(&rt, &engine, "Done")?, owned(&[("Card", 1)]));
    Ok(())
}

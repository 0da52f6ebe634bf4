//! When steps for board ordering BDD scenarios.

use super::world::{BoardWorld, run_async};
use eyre::WrapErr;
use kanban::board::services::{CreateTaskRequest, MoveTaskRequest};
use rstest_bdd_macros::when;

fn slot(ord: u64) -> Result<i32, eyre::Report> {
    i32::try_from(ord).wrap_err("position out of range")
}

#[when(r#"a task titled "{title}" is created in "{column}""#)]
fn create_task(world: &mut BoardWorld, title: String, column: String) -> Result<(), eyre::Report> {
    let col_id = world.column(&column)?.id().value();
    world.last_result = Some(run_async(
        world.engine.create_task(CreateTaskRequest::new(col_id, title)),
    ));
    Ok(())
}

#[when(r#""{title}" is moved to "{column}" at position {ord:u64}"#)]
fn move_to_position(
    world: &mut BoardWorld,
    title: String,
    column: String,
    ord: u64,
) -> Result<(), eyre::Report> {
    let task_id = world.task(&title)?.id().value();
    let col_id = world.column(&column)?.id().value();
    let request = MoveTaskRequest::new(task_id, col_id).with_target_ordinal(slot(ord)?);
    world.last_result = Some(run_async(world.engine.move_task(request)));
    Ok(())
}

#[when(r#""{title}" is moved to "{column}" without a position"#)]
fn move_without_position(
    world: &mut BoardWorld,
    title: String,
    column: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task(&title)?.id().value();
    let col_id = world.column(&column)?.id().value();
    world.last_result = Some(run_async(
        world.engine.move_task(MoveTaskRequest::new(task_id, col_id)),
    ));
    Ok(())
}

#[when(r#"task #{task_id:u64} is moved to "{column}" at position {ord:u64}"#)]
fn move_by_id(
    world: &mut BoardWorld,
    task_id: u64,
    column: String,
    ord: u64,
) -> Result<(), eyre::Report> {
    let raw_id = i64::try_from(task_id).wrap_err("task id out of range")?;
    let col_id = world.column(&column)?.id().value();
    let request = MoveTaskRequest::new(raw_id, col_id).with_target_ordinal(slot(ord)?);
    world.last_result = Some(run_async(world.engine.move_task(request)));
    Ok(())
}

#[when(r#""{title}" is advanced"#)]
fn advance(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world.task(&title)?.id().value();
    world.last_result = Some(run_async(world.engine.advance_task(task_id)));
    Ok(())
}

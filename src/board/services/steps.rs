//! Transactional steps of the ordering engine.
//!
//! Every function here runs inside a single store transaction and leaves
//! commit or rollback to the caller.

use tracing::{debug, warn};

use super::error::{OrderingError, OrderingResult};
use crate::board::{
    domain::{ColumnId, MovePolicy, Ordinal, Task, TaskId, TaskTitle, ordering},
    ports::{BoardStoreError, BoardStoreResult, BoardTransaction},
};

/// Rewrites a column's ordinals to `1..=N` in canonical order.
///
/// Only tasks whose ordinal changes are written. Returns the number of
/// rewritten tasks, so zero means the column was already dense.
///
/// # Errors
///
/// Returns [`BoardStoreError`] when reading or writing the column fails.
pub fn normalize_column(
    tx: &mut dyn BoardTransaction,
    column: ColumnId,
) -> BoardStoreResult<usize> {
    let slots = tx.column_slots(column)?;
    let plan = ordering::renumber_plan(&slots)
        .map_err(|err| BoardStoreError::corrupt_row(format!("column {column}: {err}")))?;
    for (task, ord) in &plan {
        tx.set_ordinal(*task, *ord)?;
    }
    debug!(%column, tasks = slots.len(), rewritten = plan.len(), "normalized column");
    Ok(plan.len())
}

/// Appends a new task after the highest ordinal in `column`.
pub(super) fn append_task(
    tx: &mut dyn BoardTransaction,
    column: ColumnId,
    title: &TaskTitle,
) -> OrderingResult<Task> {
    if tx.find_column(column)?.is_none() {
        return Err(OrderingError::ColumnNotFound(column));
    }

    let highest = tx.max_ordinal(column)?.unwrap_or(0).max(0);
    let ord = Ordinal::new(highest.saturating_add(1))
        .map_err(|err| BoardStoreError::corrupt_row(format!("column {column}: {err}")))?;
    Ok(tx.insert_task(column, title, ord)?)
}

/// Relocates a task into `destination` at the slot resolved from `hint`.
pub(super) fn relocate(
    tx: &mut dyn BoardTransaction,
    task_id: TaskId,
    destination: ColumnId,
    hint: Option<f64>,
    policy: MovePolicy,
) -> OrderingResult<Task> {
    let task = tx
        .find_task(task_id)?
        .ok_or(OrderingError::TaskNotFound(task_id))?;
    let target_column = tx
        .find_column(destination)?
        .ok_or(OrderingError::ColumnNotFound(destination))?;
    let source = task.col_id();

    if policy != MovePolicy::Unrestricted {
        let source_column = tx.find_column(source)?.ok_or_else(|| {
            BoardStoreError::corrupt_row(format!("task {task_id}: dangling column {source}"))
        })?;
        let next = tx.next_column(source_column.ord())?;
        if !policy.permits(&source_column, &target_column, next.as_ref()) {
            return Err(OrderingError::MoveNotPermitted {
                task: task_id,
                from: source,
                to: destination,
                policy,
            });
        }
    }

    let repaired = normalize_column(tx, source)?;
    if repaired > 0 {
        warn!(column = %source, repaired, "repaired ordinal drift before move");
    }

    let count_to = tx.count_tasks(destination)?;
    let target = ordering::resolve_target(hint, count_to)
        .map_err(|err| BoardStoreError::corrupt_row(format!("column {destination}: {err}")))?;
    debug!(task = %task_id, %destination, count_to, ?hint, %target, "resolved move target");

    tx.shift_from(destination, target)?;
    tx.place_task(task_id, destination, target)?;

    normalize_column(tx, destination)?;
    normalize_column(tx, source)?;

    Ok(tx
        .find_task(task_id)?
        .ok_or(BoardStoreError::MissingTask(task_id))?)
}

/// Relocates a task to the end of the column right of its own.
pub(super) fn advance(
    tx: &mut dyn BoardTransaction,
    task_id: TaskId,
    policy: MovePolicy,
) -> OrderingResult<Task> {
    let task = tx
        .find_task(task_id)?
        .ok_or(OrderingError::TaskNotFound(task_id))?;
    let current = tx.find_column(task.col_id())?.ok_or_else(|| {
        BoardStoreError::corrupt_row(format!("task {task_id}: dangling column {}", task.col_id()))
    })?;
    let next = tx
        .next_column(current.ord())?
        .ok_or(OrderingError::AlreadyInLastColumn {
            task: task_id,
            column: current.id(),
        })?;
    relocate(tx, task_id, next.id(), None, policy)
}

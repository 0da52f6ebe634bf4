//! Diesel row models for board persistence.

use super::schema::{board_columns, tasks};
use crate::board::{
    domain::{
        Column, ColumnId, Ordinal, PersistedColumnData, PersistedTaskData, Slot, Task, TaskId,
    },
    ports::{BoardStoreError, BoardStoreResult},
};
use diesel::prelude::*;

/// Query result row for columns.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = board_columns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ColumnRow {
    /// Column identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Board position.
    pub ord: i32,
}

/// Insert model for seeded columns.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = board_columns)]
pub struct NewColumnRow<'a> {
    /// Display name.
    pub name: &'a str,
    /// Board position.
    pub ord: i32,
}

/// Query result row for tasks.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Owning column.
    pub col_id: i64,
    /// Position within the owning column.
    pub ord: i32,
}

/// Insert model for new tasks.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow<'a> {
    /// Title.
    pub title: &'a str,
    /// Owning column.
    pub col_id: i64,
    /// Position within the owning column.
    pub ord: i32,
}

fn corrupt(err: impl std::fmt::Display) -> BoardStoreError {
    BoardStoreError::corrupt_row(err.to_string())
}

impl TryFrom<ColumnRow> for Column {
    type Error = BoardStoreError;

    fn try_from(row: ColumnRow) -> BoardStoreResult<Self> {
        Ok(Self::from_persisted(PersistedColumnData {
            id: ColumnId::new(row.id).map_err(corrupt)?,
            name: row.name,
            ord: row.ord,
        }))
    }
}

impl TryFrom<TaskRow> for Task {
    type Error = BoardStoreError;

    fn try_from(row: TaskRow) -> BoardStoreResult<Self> {
        Ok(Self::from_persisted(PersistedTaskData {
            id: TaskId::new(row.id).map_err(corrupt)?,
            title: row.title,
            col_id: ColumnId::new(row.col_id).map_err(corrupt)?,
            ord: Ordinal::new(i64::from(row.ord)).map_err(corrupt)?,
        }))
    }
}

/// Maps an `(id, ord)` pair into a raw slot.
pub fn to_slot((id, ord): (i64, i32)) -> BoardStoreResult<Slot> {
    Ok(Slot {
        task_id: TaskId::new(id).map_err(corrupt)?,
        ord: i64::from(ord),
    })
}

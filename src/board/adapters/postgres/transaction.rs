//! [`BoardTransaction`] over an open `PostgreSQL` transaction.

use super::{
    models::{ColumnRow, NewTaskRow, TaskRow, to_slot},
    schema::{board_columns, tasks},
};
use crate::board::{
    domain::{Column, ColumnId, Ordinal, Slot, Task, TaskId, TaskTitle},
    ports::{BoardStoreError, BoardStoreResult, BoardTransaction},
};
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// Statements issued on a connection that is already inside a transaction.
pub(super) struct PgBoardTransaction<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PgBoardTransaction<'a> {
    pub(super) const fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }
}

fn ensure_updated(updated: usize, task: TaskId) -> BoardStoreResult<()> {
    if updated == 0 {
        return Err(BoardStoreError::MissingTask(task));
    }
    Ok(())
}

impl BoardTransaction for PgBoardTransaction<'_> {
    fn find_task(&mut self, id: TaskId) -> BoardStoreResult<Option<Task>> {
        let row = tasks::table
            .find(id.value())
            .select(TaskRow::as_select())
            .first::<TaskRow>(self.conn)
            .optional()
            .map_err(BoardStoreError::persistence)?;
        row.map(Task::try_from).transpose()
    }

    fn find_column(&mut self, id: ColumnId) -> BoardStoreResult<Option<Column>> {
        let row = board_columns::table
            .find(id.value())
            .select(ColumnRow::as_select())
            .first::<ColumnRow>(self.conn)
            .optional()
            .map_err(BoardStoreError::persistence)?;
        row.map(Column::try_from).transpose()
    }

    fn next_column(&mut self, ord: i32) -> BoardStoreResult<Option<Column>> {
        let row = board_columns::table
            .filter(board_columns::ord.gt(ord))
            .order(board_columns::ord.asc())
            .select(ColumnRow::as_select())
            .first::<ColumnRow>(self.conn)
            .optional()
            .map_err(BoardStoreError::persistence)?;
        row.map(Column::try_from).transpose()
    }

    fn column_slots(&mut self, column: ColumnId) -> BoardStoreResult<Vec<Slot>> {
        tasks::table
            .filter(tasks::col_id.eq(column.value()))
            .order((tasks::ord.asc(), tasks::id.asc()))
            .select((tasks::id, tasks::ord))
            .load::<(i64, i32)>(self.conn)
            .map_err(BoardStoreError::persistence)?
            .into_iter()
            .map(to_slot)
            .collect()
    }

    fn count_tasks(&mut self, column: ColumnId) -> BoardStoreResult<usize> {
        let count: i64 = tasks::table
            .filter(tasks::col_id.eq(column.value()))
            .count()
            .get_result(self.conn)
            .map_err(BoardStoreError::persistence)?;
        usize::try_from(count).map_err(BoardStoreError::persistence)
    }

    fn max_ordinal(&mut self, column: ColumnId) -> BoardStoreResult<Option<i64>> {
        let highest: Option<i32> = tasks::table
            .filter(tasks::col_id.eq(column.value()))
            .select(diesel::dsl::max(tasks::ord))
            .first(self.conn)
            .map_err(BoardStoreError::persistence)?;
        Ok(highest.map(i64::from))
    }

    fn set_ordinal(&mut self, task: TaskId, ord: Ordinal) -> BoardStoreResult<()> {
        let updated = diesel::update(tasks::table.find(task.value()))
            .set(tasks::ord.eq(ord.value()))
            .execute(self.conn)
            .map_err(BoardStoreError::persistence)?;
        ensure_updated(updated, task)
    }

    fn shift_from(&mut self, column: ColumnId, from: Ordinal) -> BoardStoreResult<usize> {
        diesel::update(
            tasks::table
                .filter(tasks::col_id.eq(column.value()))
                .filter(tasks::ord.ge(from.value())),
        )
        .set(tasks::ord.eq(tasks::ord + 1))
        .execute(self.conn)
        .map_err(BoardStoreError::persistence)
    }

    fn place_task(&mut self, task: TaskId, column: ColumnId, ord: Ordinal) -> BoardStoreResult<()> {
        let updated = diesel::update(tasks::table.find(task.value()))
            .set((tasks::col_id.eq(column.value()), tasks::ord.eq(ord.value())))
            .execute(self.conn)
            .map_err(BoardStoreError::persistence)?;
        ensure_updated(updated, task)
    }

    fn insert_task(
        &mut self,
        column: ColumnId,
        title: &TaskTitle,
        ord: Ordinal,
    ) -> BoardStoreResult<Task> {
        let row = diesel::insert_into(tasks::table)
            .values(&NewTaskRow {
                title: title.as_str(),
                col_id: column.value(),
                ord: ord.value(),
            })
            .returning(TaskRow::as_returning())
            .get_result::<TaskRow>(self.conn)
            .map_err(BoardStoreError::persistence)?;
        Task::try_from(row)
    }

    fn list_columns(&mut self) -> BoardStoreResult<Vec<Column>> {
        board_columns::table
            .order(board_columns::ord.asc())
            .select(ColumnRow::as_select())
            .load::<ColumnRow>(self.conn)
            .map_err(BoardStoreError::persistence)?
            .into_iter()
            .map(Column::try_from)
            .collect()
    }

    fn list_tasks(&mut self) -> BoardStoreResult<Vec<Task>> {
        tasks::table
            .order((tasks::col_id.asc(), tasks::ord.asc(), tasks::id.asc()))
            .select(TaskRow::as_select())
            .load::<TaskRow>(self.conn)
            .map_err(BoardStoreError::persistence)?
            .into_iter()
            .map(Task::try_from)
            .collect()
    }
}

//! Store port: scoped transactions over persisted columns and tasks.

use crate::board::domain::{Column, ColumnId, Ordinal, Slot, Task, TaskId, TaskTitle};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for board store operations.
pub type BoardStoreResult<T> = Result<T, BoardStoreError>;

/// Statements available inside one store transaction.
///
/// Every method runs against the transaction's view of the board: writes
/// are visible to later reads in the same transaction and to nobody else
/// until commit.
#[cfg_attr(test, mockall::automock)]
pub trait BoardTransaction {
    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError`] when the lookup fails.
    fn find_task(&mut self, id: TaskId) -> BoardStoreResult<Option<Task>>;

    /// Finds a column by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError`] when the lookup fails.
    fn find_column(&mut self, id: ColumnId) -> BoardStoreResult<Option<Column>>;

    /// Returns the column positioned immediately right of `ord`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError`] when the lookup fails.
    fn next_column(&mut self, ord: i32) -> BoardStoreResult<Option<Column>>;

    /// Returns the raw slots of a column ordered by `(ord ASC, id ASC)`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError`] when the query fails.
    fn column_slots(&mut self, column: ColumnId) -> BoardStoreResult<Vec<Slot>>;

    /// Returns the number of tasks in a column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError`] when the query fails.
    fn count_tasks(&mut self, column: ColumnId) -> BoardStoreResult<usize>;

    /// Returns the largest ordinal stored in a column, or `None` when empty.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError`] when the query fails.
    fn max_ordinal(&mut self, column: ColumnId) -> BoardStoreResult<Option<i64>>;

    /// Overwrites one task's ordinal.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::MissingTask`] when no row was updated.
    fn set_ordinal(&mut self, task: TaskId, ord: Ordinal) -> BoardStoreResult<()>;

    /// Increments the ordinal of every task in `column` with `ord >= from`.
    ///
    /// Returns the number of tasks shifted.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError`] when the update fails.
    fn shift_from(&mut self, column: ColumnId, from: Ordinal) -> BoardStoreResult<usize>;

    /// Writes a task's owning column and ordinal together.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::MissingTask`] when no row was updated.
    fn place_task(&mut self, task: TaskId, column: ColumnId, ord: Ordinal)
    -> BoardStoreResult<()>;

    /// Inserts a new task and returns the persisted record.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError`] when the insert fails.
    fn insert_task(
        &mut self,
        column: ColumnId,
        title: &TaskTitle,
        ord: Ordinal,
    ) -> BoardStoreResult<Task>;

    /// Returns every column ordered by board position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError`] when the query fails.
    fn list_columns(&mut self) -> BoardStoreResult<Vec<Column>>;

    /// Returns every task ordered by `(col_id, ord, id)`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError`] when the query fails.
    fn list_tasks(&mut self) -> BoardStoreResult<Vec<Task>>;
}

/// Board persistence contract.
///
/// The store is the single writer gate: [`BoardStore::write`] runs its
/// closure in one transaction, serialized against every other write, and
/// commits only when the closure returns `Ok`. Any `Err` rolls the whole
/// unit back. [`BoardStore::read`] observes a consistent snapshot.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Creates the schema when missing and seeds the default columns on an
    /// empty board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError`] when bootstrap fails.
    async fn initialize(&self) -> BoardStoreResult<()>;

    /// Runs `work` against a read-only snapshot.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a store failure converted into `E`.
    async fn read<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn BoardTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<BoardStoreError> + Send + 'static;

    /// Runs `work` as one atomic, exclusive unit of work.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a store failure converted into `E`.
    /// Either way nothing written by `work` is persisted.
    async fn write<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn BoardTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<BoardStoreError> + Send + 'static;
}

/// Errors returned by board store implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardStoreError {
    /// A task expected to exist inside the transaction was not found.
    #[error("task row missing: {0}")]
    MissingTask(TaskId),

    /// A persisted value could not be mapped into the domain.
    #[error("corrupt row: {0}")]
    CorruptRow(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardStoreError {
    /// Wraps a persistence error.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Reports a row that cannot be represented in the domain.
    #[must_use]
    pub fn corrupt_row(detail: impl Into<String>) -> Self {
        Self::CorruptRow(detail.into())
    }
}

//! The ordering engine: task placement and relocation over a board store.

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use super::{
    error::{ErrorKind, OrderingError, OrderingResult},
    requests::{CreateTaskRequest, MoveTaskRequest},
    steps,
};
use crate::board::{
    domain::{Board, ColumnId, MovePolicy, Task, TaskId, TaskTitle},
    ports::BoardStore,
};

/// Orchestrates every write to task ordinals and owning columns.
///
/// Each operation validates its input, then runs as one unit of work through
/// [`BoardStore::write`]; either every step commits or none does.
#[derive(Clone)]
pub struct OrderingEngine<S>
where
    S: BoardStore,
{
    store: Arc<S>,
    policy: MovePolicy,
}

impl<S> OrderingEngine<S>
where
    S: BoardStore,
{
    /// Creates an engine with the permissive [`MovePolicy::Unrestricted`].
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            policy: MovePolicy::default(),
        }
    }

    /// Replaces the move policy.
    #[must_use]
    pub fn with_policy(mut self, policy: MovePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Returns a consistent snapshot of every column and task.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::Store`] when the snapshot cannot be read.
    #[instrument(skip(self))]
    pub async fn list_board(&self) -> OrderingResult<Board> {
        self.store
            .read(|tx| -> OrderingResult<Board> {
                let columns = tx.list_columns()?;
                let tasks = tx.list_tasks()?;
                Ok(Board::new(columns, tasks))
            })
            .await
            .inspect_err(log_failure)
    }

    /// Creates a task at the end of a column.
    ///
    /// The new ordinal is one past the column's highest ordinal, or 1 for
    /// an empty column. Existing tasks are not rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::InvalidArgument`] for an empty title or a
    /// non-positive column id, [`OrderingError::ColumnNotFound`] when the
    /// column does not exist, and [`OrderingError::Store`] on persistence
    /// failure.
    #[instrument(skip(self))]
    pub async fn create_task(&self, request: CreateTaskRequest) -> OrderingResult<Task> {
        let column = ColumnId::new(request.col_id)?;
        let title = TaskTitle::new(&request.title)?;

        let task = self
            .store
            .write(move |tx| steps::append_task(tx, column, &title))
            .await
            .inspect_err(log_failure)?;
        info!(task = %task.id(), column = %task.col_id(), ord = %task.ord(), "created task");
        Ok(task)
    }

    /// Relocates a task to a column and slot.
    ///
    /// The slot is an insertion position: `k` puts the task k-th among the
    /// destination's tasks counted before the move, and one past the end
    /// appends. Moves within the task's own column are handled by the same
    /// protocol.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::InvalidArgument`] for non-positive ids,
    /// [`OrderingError::TaskNotFound`] or [`OrderingError::ColumnNotFound`]
    /// after failed lookups, [`OrderingError::MoveNotPermitted`] when the
    /// move policy rejects the destination, and [`OrderingError::Store`] on
    /// persistence failure. No partial move is ever persisted.
    #[instrument(skip(self))]
    pub async fn move_task(&self, request: MoveTaskRequest) -> OrderingResult<Task> {
        let task_id = TaskId::new(request.task_id)?;
        let destination = ColumnId::new(request.to_col_id)?;
        let hint = request.to_ord;
        let policy = self.policy;

        let task = self
            .store
            .write(move |tx| steps::relocate(tx, task_id, destination, hint, policy))
            .await
            .inspect_err(log_failure)?;
        info!(task = %task.id(), column = %task.col_id(), ord = %task.ord(), "moved task");
        Ok(task)
    }

    /// Moves a task to the end of the column immediately to its right.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::InvalidArgument`] for a non-positive id,
    /// [`OrderingError::TaskNotFound`] for an unknown task,
    /// [`OrderingError::AlreadyInLastColumn`] when there is no column to
    /// the right, and [`OrderingError::Store`] on persistence failure.
    #[instrument(skip(self))]
    pub async fn advance_task(&self, raw_task_id: i64) -> OrderingResult<Task> {
        let task_id = TaskId::new(raw_task_id)?;
        let policy = self.policy;

        let task = self
            .store
            .write(move |tx| steps::advance(tx, task_id, policy))
            .await
            .inspect_err(log_failure)?;
        info!(task = %task.id(), column = %task.col_id(), ord = %task.ord(), "advanced task");
        Ok(task)
    }

    /// Renumbers one column to `1..=N` as a standalone unit of work.
    ///
    /// Returns the number of tasks whose ordinal changed.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::InvalidArgument`] for a non-positive id,
    /// [`OrderingError::ColumnNotFound`] for an unknown column, and
    /// [`OrderingError::Store`] on persistence failure.
    #[instrument(skip(self))]
    pub async fn normalize_column(&self, raw_column_id: i64) -> OrderingResult<usize> {
        let column = ColumnId::new(raw_column_id)?;

        let rewritten = self
            .store
            .write(move |tx| -> OrderingResult<usize> {
                if tx.find_column(column)?.is_none() {
                    return Err(OrderingError::ColumnNotFound(column));
                }
                Ok(steps::normalize_column(tx, column)?)
            })
            .await
            .inspect_err(log_failure)?;
        info!(%column, rewritten, "normalized column");
        Ok(rewritten)
    }
}

fn log_failure(err: &OrderingError) {
    match err.kind() {
        ErrorKind::Internal => error!(error = %err, "board transaction rolled back"),
        kind => debug!(kind = kind.as_str(), error = %err, "board operation rejected"),
    }
}

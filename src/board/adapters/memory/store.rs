//! In-memory board store with copy-on-write transactions.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::{
        Column, ColumnId, DEFAULT_COLUMNS, Ordinal, PersistedColumnData, PersistedTaskData, Slot,
        Task, TaskId, TaskTitle,
    },
    ports::{BoardStore, BoardStoreError, BoardStoreResult, BoardTransaction},
};

/// Thread-safe in-memory board store.
///
/// Writes run against a private copy of the board taken under the write
/// lock; the copy replaces the shared state only when the unit of work
/// succeeds, so a failed closure leaves no trace.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardStore {
    state: Arc<RwLock<BoardState>>,
}

#[derive(Debug, Clone, Default)]
struct BoardState {
    columns: Vec<Column>,
    tasks: BTreeMap<TaskId, TaskRecord>,
    last_task_id: i64,
}

#[derive(Debug, Clone)]
struct TaskRecord {
    title: String,
    col_id: ColumnId,
    ord: i64,
}

impl InMemoryBoardStore {
    /// Creates an empty store; [`BoardStore::initialize`] seeds it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given columns at positions `1..`.
    ///
    /// Column identifiers are assigned in the same order, starting at 1.
    /// [`BoardStore::initialize`] leaves such a store unseeded.
    #[must_use]
    pub fn with_columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = names
            .into_iter()
            .zip(1_i32..)
            .filter_map(|(name, position)| {
                let id = ColumnId::new(i64::from(position)).ok()?;
                Some(Column::from_persisted(PersistedColumnData {
                    id,
                    name: name.into(),
                    ord: position,
                }))
            })
            .collect();
        Self {
            state: Arc::new(RwLock::new(BoardState {
                columns,
                ..BoardState::default()
            })),
        }
    }
}

fn poisoned(err: impl std::fmt::Display) -> BoardStoreError {
    BoardStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl BoardStore for InMemoryBoardStore {
    async fn initialize(&self) -> BoardStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.columns.is_empty() {
            return Ok(());
        }
        for (position, (name, ord)) in (1_i64..).zip(DEFAULT_COLUMNS) {
            let id = ColumnId::new(position).map_err(BoardStoreError::persistence)?;
            state.columns.push(Column::from_persisted(PersistedColumnData {
                id,
                name: name.to_owned(),
                ord,
            }));
        }
        tracing::info!(columns = state.columns.len(), "seeded default columns");
        Ok(())
    }

    async fn read<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn BoardTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<BoardStoreError> + Send + 'static,
    {
        let mut snapshot = self.state.read().map_err(poisoned)?.clone();
        work(&mut MemoryTransaction {
            state: &mut snapshot,
        })
    }

    async fn write<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn BoardTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<BoardStoreError> + Send + 'static,
    {
        let mut state = self.state.write().map_err(poisoned)?;
        let mut draft = state.clone();
        let outcome = work(&mut MemoryTransaction { state: &mut draft });
        if outcome.is_ok() {
            *state = draft;
        }
        outcome
    }
}

struct MemoryTransaction<'a> {
    state: &'a mut BoardState,
}

impl MemoryTransaction<'_> {
    fn record_mut(&mut self, id: TaskId) -> BoardStoreResult<&mut TaskRecord> {
        self.state
            .tasks
            .get_mut(&id)
            .ok_or(BoardStoreError::MissingTask(id))
    }

    fn ordered_ids(&self, column: ColumnId) -> Vec<(i64, TaskId)> {
        let mut ids: Vec<(i64, TaskId)> = self
            .state
            .tasks
            .iter()
            .filter(|(_, record)| record.col_id == column)
            .map(|(id, record)| (record.ord, *id))
            .collect();
        ids.sort_unstable();
        ids
    }
}

fn to_task(id: TaskId, record: &TaskRecord) -> BoardStoreResult<Task> {
    let ord = Ordinal::new(record.ord)
        .map_err(|err| BoardStoreError::corrupt_row(format!("task {id}: {err}")))?;
    Ok(Task::from_persisted(PersistedTaskData {
        id,
        title: record.title.clone(),
        col_id: record.col_id,
        ord,
    }))
}

impl BoardTransaction for MemoryTransaction<'_> {
    fn find_task(&mut self, id: TaskId) -> BoardStoreResult<Option<Task>> {
        self.state
            .tasks
            .get(&id)
            .map(|record| to_task(id, record))
            .transpose()
    }

    fn find_column(&mut self, id: ColumnId) -> BoardStoreResult<Option<Column>> {
        Ok(self
            .state
            .columns
            .iter()
            .find(|column| column.id() == id)
            .cloned())
    }

    fn next_column(&mut self, ord: i32) -> BoardStoreResult<Option<Column>> {
        Ok(self
            .state
            .columns
            .iter()
            .filter(|column| column.ord() > ord)
            .min_by_key(|column| column.ord())
            .cloned())
    }

    fn column_slots(&mut self, column: ColumnId) -> BoardStoreResult<Vec<Slot>> {
        Ok(self
            .ordered_ids(column)
            .into_iter()
            .map(|(ord, task_id)| Slot { task_id, ord })
            .collect())
    }

    fn count_tasks(&mut self, column: ColumnId) -> BoardStoreResult<usize> {
        Ok(self
            .state
            .tasks
            .values()
            .filter(|record| record.col_id == column)
            .count())
    }

    fn max_ordinal(&mut self, column: ColumnId) -> BoardStoreResult<Option<i64>> {
        Ok(self
            .state
            .tasks
            .values()
            .filter(|record| record.col_id == column)
            .map(|record| record.ord)
            .max())
    }

    fn set_ordinal(&mut self, task: TaskId, ord: Ordinal) -> BoardStoreResult<()> {
        self.record_mut(task)?.ord = i64::from(ord.value());
        Ok(())
    }

    fn shift_from(&mut self, column: ColumnId, from: Ordinal) -> BoardStoreResult<usize> {
        let threshold = i64::from(from.value());
        let mut shifted = 0;
        for record in self.state.tasks.values_mut() {
            if record.col_id == column && record.ord >= threshold {
                record.ord += 1;
                shifted += 1;
            }
        }
        Ok(shifted)
    }

    fn place_task(&mut self, task: TaskId, column: ColumnId, ord: Ordinal) -> BoardStoreResult<()> {
        let record = self.record_mut(task)?;
        record.col_id = column;
        record.ord = i64::from(ord.value());
        Ok(())
    }

    fn insert_task(
        &mut self,
        column: ColumnId,
        title: &TaskTitle,
        ord: Ordinal,
    ) -> BoardStoreResult<Task> {
        let next = self.state.last_task_id + 1;
        let id = TaskId::new(next).map_err(BoardStoreError::persistence)?;
        let record = TaskRecord {
            title: title.as_str().to_owned(),
            col_id: column,
            ord: i64::from(ord.value()),
        };
        let task = to_task(id, &record)?;
        self.state.tasks.insert(id, record);
        self.state.last_task_id = next;
        Ok(task)
    }

    fn list_columns(&mut self) -> BoardStoreResult<Vec<Column>> {
        let mut columns = self.state.columns.clone();
        columns.sort_by_key(Column::ord);
        Ok(columns)
    }

    fn list_tasks(&mut self) -> BoardStoreResult<Vec<Task>> {
        let mut tasks = self
            .state
            .tasks
            .iter()
            .map(|(id, record)| to_task(*id, record))
            .collect::<BoardStoreResult<Vec<Task>>>()?;
        tasks.sort_by_key(|task| (task.col_id(), task.ord(), task.id()));
        Ok(tasks)
    }
}

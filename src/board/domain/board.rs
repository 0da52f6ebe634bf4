//! Whole-board snapshot returned by listing.

use super::{Column, ColumnId, Task, ordering};
use serde::{Deserialize, Serialize};

/// A consistent snapshot of every column and task on the board.
///
/// Columns are ordered by board position and tasks by
/// `(col_id, ord, id)`, matching the listing contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(rename = "cols")]
    columns: Vec<Column>,
    tasks: Vec<Task>,
}

/// A column whose task ordinals are not exactly `1..=N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DensityViolation {
    /// The offending column.
    pub column: ColumnId,
    /// Ordinals found, in canonical order.
    pub ordinals: Vec<i32>,
}

impl Board {
    /// Builds a snapshot, putting both lists into canonical order.
    #[must_use]
    pub fn new(mut columns: Vec<Column>, mut tasks: Vec<Task>) -> Self {
        columns.sort_by_key(|column| (column.ord(), column.id()));
        tasks.sort_by_key(|task| (task.col_id(), task.ord(), task.id()));
        Self { columns, tasks }
    }

    /// Returns columns left to right.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns every task on the board.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the column with the given identifier.
    #[must_use]
    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| column.id() == id)
    }

    /// Returns the tasks of one column in display order.
    #[must_use]
    pub fn column_tasks(&self, id: ColumnId) -> Vec<&Task> {
        self.tasks.iter().filter(|task| task.col_id() == id).collect()
    }

    /// Reports every column whose ordinals are not exactly `1..=N`.
    #[must_use]
    pub fn check_density(&self) -> Vec<DensityViolation> {
        self.columns
            .iter()
            .filter_map(|column| {
                let ordinals: Vec<i32> = self
                    .column_tasks(column.id())
                    .iter()
                    .map(|task| task.ord().value())
                    .collect();
                let widened: Vec<i64> = ordinals.iter().copied().map(i64::from).collect();
                (!ordering::is_dense(&widened)).then(|| DensityViolation {
                    column: column.id(),
                    ordinals,
                })
            })
            .collect()
    }
}

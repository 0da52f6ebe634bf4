//! Task read model and raw ordering slots.

use super::{ColumnId, Ordinal, TaskId};
use serde::{Deserialize, Serialize};

/// A task card as persisted on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    col_id: ColumnId,
    ord: Ordinal,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Owning column.
    pub col_id: ColumnId,
    /// Position within the owning column.
    pub ord: Ordinal,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            col_id: data.col_id,
            ord: data.ord,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the owning column.
    #[must_use]
    pub const fn col_id(&self) -> ColumnId {
        self.col_id
    }

    /// Returns the position within the owning column.
    #[must_use]
    pub const fn ord(&self) -> Ordinal {
        self.ord
    }
}

/// A task's raw position as read for renumbering.
///
/// The ordinal is kept unvalidated so that a drifted column (gaps or
/// duplicates) can still be read and repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Task occupying the slot.
    pub task_id: TaskId,
    /// Ordinal currently stored for the task.
    pub ord: i64,
}

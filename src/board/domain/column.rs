//! Board column read model.

use super::ColumnId;
use serde::{Deserialize, Serialize};

/// Columns seeded on first initialization, as `(name, board position)`.
pub const DEFAULT_COLUMNS: [(&str, i32); 3] = [("Todo", 1), ("Doing", 2), ("Done", 3)];

/// A named stage of the board.
///
/// Columns are created by the seed bootstrap and never mutated afterwards.
/// `ord` is the left-to-right board position and is unique across columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    id: ColumnId,
    name: String,
    ord: i32,
}

/// Parameter object for reconstructing a persisted column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedColumnData {
    /// Persisted column identifier.
    pub id: ColumnId,
    /// Display name.
    pub name: String,
    /// Board position.
    pub ord: i32,
}

impl Column {
    /// Reconstructs a column from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedColumnData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            ord: data.ord,
        }
    }

    /// Returns the column identifier.
    #[must_use]
    pub const fn id(&self) -> ColumnId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the board position.
    #[must_use]
    pub const fn ord(&self) -> i32 {
        self.ord
    }
}

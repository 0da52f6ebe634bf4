//! Service-level errors and their client-facing classification.

use crate::board::{
    domain::{BoardDomainError, ColumnId, MovePolicy, TaskId},
    ports::BoardStoreError,
};
use thiserror::Error;

/// Errors returned by ordering engine operations.
#[derive(Debug, Error)]
pub enum OrderingError {
    /// Input failed validation; the store was not touched.
    #[error(transparent)]
    InvalidArgument(#[from] BoardDomainError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The column does not exist.
    #[error("column not found: {0}")]
    ColumnNotFound(ColumnId),

    /// The configured move policy rejects the destination.
    #[error(
        "move of task {task} from column {from} to column {to} violates the {} policy",
        policy.as_str()
    )]
    MoveNotPermitted {
        /// Task being moved.
        task: TaskId,
        /// Column the task currently belongs to.
        from: ColumnId,
        /// Requested destination column.
        to: ColumnId,
        /// Policy in force.
        policy: MovePolicy,
    },

    /// The task cannot advance because its column is the rightmost one.
    #[error("task {task} is already in the last column {column}")]
    AlreadyInLastColumn {
        /// Task being advanced.
        task: TaskId,
        /// Rightmost column holding the task.
        column: ColumnId,
    },

    /// Store failure; the unit of work was rolled back.
    #[error(transparent)]
    Store(#[from] BoardStoreError),
}

/// Result type for ordering engine operations.
pub type OrderingResult<T> = Result<T, OrderingError>;

/// Client-facing classification of [`OrderingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input.
    InvalidArgument,
    /// A referenced task or column does not exist.
    NotFound,
    /// The request is well formed but not allowed in the current state.
    Conflict,
    /// Unexpected persistence failure.
    Internal,
}

impl ErrorKind {
    /// Returns the canonical lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }
}

impl OrderingError {
    /// Classifies the error for the request layer.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::TaskNotFound(_) | Self::ColumnNotFound(_) => ErrorKind::NotFound,
            Self::MoveNotPermitted { .. } | Self::AlreadyInLastColumn { .. } => ErrorKind::Conflict,
            Self::Store(_) => ErrorKind::Internal,
        }
    }

    /// Returns a message safe to show to clients.
    ///
    /// Internal failures never expose persistence detail.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self.kind() {
            ErrorKind::Internal => "internal error".to_owned(),
            _ => self.to_string(),
        }
    }
}

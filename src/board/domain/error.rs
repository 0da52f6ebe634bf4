//! Error types for board domain validation.

use thiserror::Error;

/// Errors returned while constructing validated board values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// The column identifier is not a positive integer.
    #[error("invalid column id {0}, expected a positive integer")]
    InvalidColumnId(i64),

    /// The task identifier is not a positive integer.
    #[error("invalid task id {0}, expected a positive integer")]
    InvalidTaskId(i64),

    /// The ordinal is outside the persisted range `1..=i32::MAX`.
    #[error("invalid ordinal {0}, expected a positive integer")]
    InvalidOrdinal(i64),

    /// The move policy name is not recognised.
    #[error("unknown move policy: {0}")]
    UnknownMovePolicy(String),
}

//! Request payloads accepted by the ordering engine.
//!
//! Requests carry raw values as they arrive from a request layer; the
//! engine validates them before opening a transaction.

/// Request payload for creating a task at the end of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub(super) col_id: i64,
    pub(super) title: String,
}

impl CreateTaskRequest {
    /// Creates a request for the given column and raw title.
    #[must_use]
    pub fn new(col_id: i64, title: impl Into<String>) -> Self {
        Self {
            col_id,
            title: title.into(),
        }
    }
}

/// Request payload for relocating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveTaskRequest {
    pub(super) task_id: i64,
    pub(super) to_col_id: i64,
    pub(super) to_ord: Option<f64>,
}

impl MoveTaskRequest {
    /// Creates a request that appends the task to the destination column.
    #[must_use]
    pub const fn new(task_id: i64, to_col_id: i64) -> Self {
        Self {
            task_id,
            to_col_id,
            to_ord: None,
        }
    }

    /// Sets the requested slot.
    ///
    /// Any number is accepted: non-finite values append, everything else
    /// is floored and clamped into the destination's valid range.
    #[must_use]
    pub const fn with_target(mut self, to_ord: f64) -> Self {
        self.to_ord = Some(to_ord);
        self
    }

    /// Sets the requested slot from a whole number.
    #[must_use]
    pub fn with_target_ordinal(self, to_ord: i32) -> Self {
        self.with_target(f64::from(to_ord))
    }
}

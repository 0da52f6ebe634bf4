//! Domain model for the task board.
//!
//! Columns, tasks, and the validated scalars that identify and position
//! them. The pure ordering rules (target clamping, renumbering plans, and
//! density checks) live in [`ordering`] so that both storage adapters and
//! the ordering engine share one definition of a dense column.

mod board;
mod column;
mod error;
mod ids;
pub mod ordering;
mod policy;
mod task;

pub use board::{Board, DensityViolation};
pub use column::{Column, DEFAULT_COLUMNS, PersistedColumnData};
pub use error::BoardDomainError;
pub use ids::{ColumnId, Ordinal, TaskId, TaskTitle};
pub use policy::MovePolicy;
pub use task::{PersistedTaskData, Slot, Task};

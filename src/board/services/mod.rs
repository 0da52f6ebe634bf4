//! Application services: the ordering engine and its request types.

mod engine;
mod error;
mod requests;
mod steps;

pub use engine::OrderingEngine;
pub use error::{ErrorKind, OrderingError, OrderingResult};
pub use requests::{CreateTaskRequest, MoveTaskRequest};
pub use steps::normalize_column;

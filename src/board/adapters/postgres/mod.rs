//! `PostgreSQL` adapter for board persistence.

mod models;
mod schema;
mod store;
mod transaction;

pub use store::{BoardPgPool, PostgresBoardStore};

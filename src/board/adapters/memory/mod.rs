//! In-memory board store for tests and local experimentation.

mod store;

pub use store::InMemoryBoardStore;

//! Port contracts for board persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the ordering
//! engine.

pub mod store;

pub use store::{BoardStore, BoardStoreError, BoardStoreResult, BoardTransaction};

#[cfg(test)]
pub use store::MockBoardTransaction;

//! Task board with a transactional ordering engine.
//!
//! Columns hold tasks in a dense order: within every column the task
//! ordinals are exactly `1..=N`, with `(ord, id)` as the canonical display
//! order. The [`services::OrderingEngine`] is the only writer of ordinals
//! and owning columns; it places new tasks and relocates existing ones,
//! each as a single atomic unit of work against a [`ports::BoardStore`].
//! The module follows hexagonal architecture:
//!
//! - Domain types and pure ordering rules in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

//! Kanban: a task board whose ordering engine keeps every column dense.
//!
//! This crate provides the board model, the ordering engine that assigns
//! and maintains task positions, and the storage adapters it runs against.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, memory)
//!
//! # Modules
//!
//! - [`board`]: Columns, tasks, and the ordering engine
//! - [`config`]: Runtime configuration from the environment or a file
//! - [`telemetry`]: `tracing` subscriber setup

pub mod board;
pub mod config;
pub mod telemetry;

//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for wells and layers.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths run the model's explicit validation inside the same
//!   transaction as the mutation it guards.
//! - Repository APIs return semantic errors (`WellNotFound`, `LayerNotFound`)
//!   in addition to DB transport errors.

pub mod error;
pub mod layer_repo;
mod schema;
pub mod well_repo;

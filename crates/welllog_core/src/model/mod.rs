//! Domain model for wells and their geological layers.
//!
//! # Responsibility
//! - Define canonical records shared by repositories, services and adapters.
//! - Keep every write precondition as an explicit, pure validation function.
//!
//! # Invariants
//! - Every record is identified by a stable UUID assigned on insert.
//! - Depths are fixed-point metres with two fractional digits.

pub mod depth;
pub mod layer;
pub mod validation;
pub mod well;

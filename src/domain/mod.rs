//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `campaign` - Campaign aggregate, delivery counters, and snapshots

pub mod campaign;
pub mod foundation;

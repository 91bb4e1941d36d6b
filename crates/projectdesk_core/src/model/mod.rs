//! Domain model for project records.
//!
//! # Responsibility
//! - Define the canonical `Project` record and its write-side inputs.
//! - Own input-shape validation for every project procedure.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `ProjectId`.
//! - Deletion is permanent; there is no tombstone state.

pub mod patch;
pub mod project;

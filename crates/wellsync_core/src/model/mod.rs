//! Domain model for facilities and their wells.
//!
//! # Responsibility
//! - Define the records persisted by the store and produced by reconciliation.
//! - Own the delimited API-number format used at the storage boundary.
//!
//! # Invariants
//! - A facility owns at most one contact response and any number of wells.
//! - Well records are only ever written as a complete set per facility.

pub mod contact;
pub mod facility;
pub mod well;

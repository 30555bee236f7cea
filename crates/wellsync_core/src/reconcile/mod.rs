//! Registry reconciliation: matching, normalization and PLSS derivation.
//!
//! Everything here is pure; fetching and committing live in
//! `service::import_service`.

pub mod engine;
pub mod matcher;
pub mod normalize;
pub mod plss;

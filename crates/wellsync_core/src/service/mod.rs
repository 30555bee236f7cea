//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repositories and the registry into use-case level APIs.
//! - Keep the CLI decoupled from SQL and HTTP details.

pub mod facility_service;
pub mod import_service;

//! Core domain logic for wellsync.
//!
//! Facilities list the API numbers of the wells they report on; this crate
//! reconciles those numbers against the published RBDMS well registry and
//! keeps each facility's well set in a local SQLite store.

pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod reconcile;
pub mod registry;
pub mod repo;
pub mod service;

pub use config::{load_config, load_config_or_default, ConfigError, WellsyncConfig};
pub use export::render_facility_export;
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::contact::ContactResponse;
pub use model::facility::{parse_api_numbers, Facility, FacilityId, FacilityValidationError};
pub use model::well::{WellRecord, WellValidationError};
pub use reconcile::engine::{reconcile, ApiMatchStatus, ApiOutcome, Reconciliation};
pub use reconcile::matcher::{match_api_number, MatchOutcome, RegistryIndex};
pub use registry::{
    FileRegistryFetcher, HttpRegistryFetcher, RegistryError, RegistryFetcher, RegistryRecord,
    RegistryResult,
};
pub use repo::facility_repo::{FacilityRepository, RepoError, RepoResult, SqliteFacilityRepository};
pub use repo::well_repo::{SqliteWellRepository, WellRepository};
pub use service::facility_service::{FacilityDetails, FacilityService, FacilityServiceError};
pub use service::import_service::{ImportError, ImportReport, ImportService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

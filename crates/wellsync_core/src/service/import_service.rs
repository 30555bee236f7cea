//! Registry import use-case.
//!
//! # Responsibility
//! - Check preconditions, fetch the registry, reconcile, commit, report.
//! - Translate the run into a report callers can show to users.
//!
//! # Invariants
//! - No API numbers → the registry is never contacted.
//! - A failed fetch aborts before any store mutation.
//! - Wells are committed only when at least one was produced, and then as a
//!   whole-set replacement.
//! - Per-identifier misses never abort the run.

use crate::model::facility::{Facility, FacilityId};
use crate::model::well::WellRecord;
use crate::reconcile::engine::{reconcile, ApiMatchStatus, ApiOutcome, Reconciliation};
use crate::registry::{RegistryError, RegistryFetcher, RegistryRecord};
use crate::repo::facility_repo::{RepoError, RepoResult};
use crate::repo::well_repo::WellRepository;
use log::{error, info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Run-level import failure.
#[derive(Debug)]
pub enum ImportError {
    /// Facility has no API numbers to reconcile.
    NoApiNumbers(FacilityId),
    RegistryUnavailable(RegistryError),
    /// Every identifier was skipped; prior wells are left untouched.
    NoMatchesImported(ImportReport),
    /// Commit failed and was rolled back.
    Repo(RepoError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoApiNumbers(_) => {
                write!(f, "API numbers are required to import RBDMS well data")
            }
            Self::RegistryUnavailable(err) => {
                write!(f, "error downloading or processing the registry: {err}")
            }
            Self::NoMatchesImported(report) => write!(
                f,
                "no well data was imported ({} requested, {} not found, {} ambiguous)",
                report.requested, report.not_found, report.ambiguous
            ),
            Self::Repo(err) => write!(f, "failed to store imported wells: {err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::RegistryUnavailable(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NoApiNumbers(_) | Self::NoMatchesImported(_) => None,
        }
    }
}

impl From<RegistryError> for ImportError {
    fn from(value: RegistryError) -> Self {
        Self::RegistryUnavailable(value)
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// User-facing result of one import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub facility_id: FacilityId,
    pub requested: usize,
    pub imported: usize,
    pub not_found: usize,
    pub ambiguous: usize,
    /// True when the facility's wells were replaced.
    pub committed: bool,
    pub outcomes: Vec<ApiOutcome>,
}

impl ImportReport {
    fn from_reconciliation(facility_id: FacilityId, reconciliation: &Reconciliation) -> Self {
        Self {
            facility_id,
            requested: reconciliation.outcomes.len(),
            imported: reconciliation.imported(),
            not_found: reconciliation.not_found(),
            ambiguous: reconciliation.ambiguous(),
            committed: false,
            outcomes: reconciliation.outcomes.clone(),
        }
    }

    pub fn skipped(&self) -> usize {
        self.not_found + self.ambiguous
    }

    /// One line per skipped identifier followed by a totals line.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .outcomes
            .iter()
            .filter_map(|outcome| match outcome.status {
                ApiMatchStatus::Imported => None,
                ApiMatchStatus::NotFound => Some(format!(
                    "No matching records found for API number: {}",
                    outcome.api_number
                )),
                ApiMatchStatus::Ambiguous { matches } => Some(format!(
                    "Multiple records ({matches}) found for API number: {}",
                    outcome.api_number
                )),
            })
            .collect();

        lines.push(format!(
            "Requested {}, imported {}, skipped {} ({} not found, {} ambiguous).",
            self.requested,
            self.imported,
            self.skipped(),
            self.not_found,
            self.ambiguous
        ));
        lines.push(if self.committed {
            "RBDMS well data imported successfully.".to_string()
        } else {
            "No well data was imported; existing wells were left unchanged.".to_string()
        });
        lines
    }
}

/// Import use-case over a well store and a registry source.
pub struct ImportService<R: WellRepository, F: RegistryFetcher> {
    repo: R,
    fetcher: F,
}

impl<R: WellRepository, F: RegistryFetcher> ImportService<R, F> {
    pub fn new(repo: R, fetcher: F) -> Self {
        Self { repo, fetcher }
    }

    /// Fetches the registry and replaces `facility`'s wells with the matches.
    ///
    /// # Errors
    /// - `NoApiNumbers` before any fetch when the facility lists none.
    /// - `RegistryUnavailable` when the snapshot cannot be obtained.
    /// - `NoMatchesImported` when nothing matched uniquely.
    /// - `Repo` when the replacement transaction fails.
    pub fn import_wells(&mut self, facility: &Facility) -> Result<ImportReport, ImportError> {
        if facility.api_numbers.is_empty() {
            warn!(
                "event=well_import module=service status=rejected facility_id={} error_code=no_api_numbers",
                facility.id
            );
            return Err(ImportError::NoApiNumbers(facility.id));
        }

        let started_at = Instant::now();
        info!(
            "event=registry_fetch module=service status=start facility_id={} source={}",
            facility.id,
            self.fetcher.source_kind()
        );
        let registry = self.fetcher.fetch().map_err(|err| {
            error!(
                "event=registry_fetch module=service status=error facility_id={} duration_ms={} error={}",
                facility.id,
                started_at.elapsed().as_millis(),
                err
            );
            ImportError::from(err)
        })?;
        info!(
            "event=registry_fetch module=service status=ok facility_id={} rows={} duration_ms={}",
            facility.id,
            registry.len(),
            started_at.elapsed().as_millis()
        );

        self.import_with_registry(facility, &registry)
    }

    /// Same as [`ImportService::import_wells`] against an already fetched
    /// snapshot; lets callers share one download across facilities.
    pub fn import_with_registry(
        &mut self,
        facility: &Facility,
        registry: &[RegistryRecord],
    ) -> Result<ImportReport, ImportError> {
        if facility.api_numbers.is_empty() {
            return Err(ImportError::NoApiNumbers(facility.id));
        }

        let reconciliation = reconcile(facility, registry);
        let mut report = ImportReport::from_reconciliation(facility.id, &reconciliation);

        if reconciliation.wells.is_empty() {
            warn!(
                "event=well_import module=service status=no_matches facility_id={} requested={} not_found={} ambiguous={}",
                facility.id, report.requested, report.not_found, report.ambiguous
            );
            return Err(ImportError::NoMatchesImported(report));
        }

        if let Err(err) = self
            .repo
            .replace_well_records(facility.id, &reconciliation.wells)
        {
            error!(
                "event=well_import module=service status=error facility_id={} error_code=commit_failed error={}",
                facility.id, err
            );
            return Err(err.into());
        }
        report.committed = true;

        info!(
            "event=well_import module=service status=ok facility_id={} requested={} imported={} not_found={} ambiguous={}",
            facility.id, report.requested, report.imported, report.not_found, report.ambiguous
        );
        Ok(report)
    }

    /// Current wells of a facility in stored order.
    pub fn list_wells(&self, facility_id: FacilityId) -> RepoResult<Vec<WellRecord>> {
        self.repo.list_well_records(facility_id)
    }
}

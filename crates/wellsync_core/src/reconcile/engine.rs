//! Facility API numbers × registry snapshot → well records.
//!
//! # Invariants
//! - API numbers are processed in facility order; duplicates independently.
//! - Only `Unique` matches produce a well; the rest are reported and skipped.
//! - Every produced well carries the facility's own API number string.
//! - This module never touches the store; committing is the caller's job.

use crate::model::facility::Facility;
use crate::model::well::WellRecord;
use crate::reconcile::matcher::{MatchOutcome, RegistryIndex};
use crate::reconcile::normalize::{normalize, FieldKind, NormalizedValue};
use crate::reconcile::plss;
use crate::registry::{columns, RegistryRecord};
use serde::Serialize;

/// Per-identifier result kept for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApiMatchStatus {
    Imported,
    NotFound,
    Ambiguous { matches: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiOutcome {
    pub api_number: String,
    #[serde(flatten)]
    pub status: ApiMatchStatus,
}

/// Output of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// Wells in facility API-number order.
    pub wells: Vec<WellRecord>,
    /// One entry per facility API number, same order.
    pub outcomes: Vec<ApiOutcome>,
}

impl Reconciliation {
    pub fn imported(&self) -> usize {
        self.wells.len()
    }

    pub fn not_found(&self) -> usize {
        self.count(|status| matches!(status, ApiMatchStatus::NotFound))
    }

    pub fn ambiguous(&self) -> usize {
        self.count(|status| matches!(status, ApiMatchStatus::Ambiguous { .. }))
    }

    fn count(&self, predicate: impl Fn(&ApiMatchStatus) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.status))
            .count()
    }
}

/// Matches every facility API number against `registry`.
pub fn reconcile(facility: &Facility, registry: &[RegistryRecord]) -> Reconciliation {
    reconcile_api_numbers(&facility.api_numbers, registry)
}

pub fn reconcile_api_numbers(api_numbers: &[String], registry: &[RegistryRecord]) -> Reconciliation {
    let index = RegistryIndex::build(registry);
    let mut result = Reconciliation::default();

    for api_number in api_numbers {
        let status = match index.lookup(api_number) {
            MatchOutcome::Unique(record) => {
                result.wells.push(well_from_record(api_number, record));
                ApiMatchStatus::Imported
            }
            MatchOutcome::NotFound => ApiMatchStatus::NotFound,
            MatchOutcome::Ambiguous(matches) => ApiMatchStatus::Ambiguous { matches },
        };
        result.outcomes.push(ApiOutcome {
            api_number: api_number.clone(),
            status,
        });
    }

    result
}

/// Normalizes one matched registry row into a well record.
pub fn well_from_record(api_number: &str, record: &RegistryRecord) -> WellRecord {
    let text = |column: &str, kind: FieldKind| {
        normalize(record.get(column), kind).and_then(NormalizedValue::into_text)
    };
    let number = |column: &str| {
        normalize(record.get(column), FieldKind::Numeric).and_then(NormalizedValue::into_number)
    };

    let section = text(columns::SECTION, FieldKind::Plain);
    let township = text(columns::TOWNSHIP, FieldKind::Plain);
    let range = text(columns::RANGE, FieldKind::Plain);
    let qtr2 = text(columns::QTR2, FieldKind::Plain);
    let qtr1 = text(columns::QTR1, FieldKind::Plain);
    let plss = plss::compose(
        section.as_deref(),
        township.as_deref(),
        range.as_deref(),
        qtr1.as_deref(),
        qtr2.as_deref(),
    );

    WellRecord {
        api_number: api_number.to_string(),
        well_name: text(columns::WELL_NAME, FieldKind::Titled),
        well_num: text(columns::WELL_NUM, FieldKind::Plain),
        operator: text(columns::OPERATOR, FieldKind::Titled),
        latitude: number(columns::SH_LAT),
        longitude: number(columns::SH_LON),
        county: text(columns::COUNTY, FieldKind::Titled),
        section,
        township,
        range,
        qtr2,
        qtr1,
        plss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_row(api: &str) -> RegistryRecord {
        RegistryRecord::from_pairs([
            ("API", api),
            ("WELL_NAME", " SMITH FEDERAL "),
            ("WELL_NUM", "1-24H"),
            ("OPERATOR", "CAMINO NATURAL RESOURCES LLC"),
            ("SH_LAT", "35.123456"),
            ("SH_LON", "-97.9876543"),
            ("COUNTY", "GRADY"),
            ("SECTION", "12"),
            ("TOWNSHIP", "5N"),
            ("RANGE", "3W"),
            ("QTR2", "SW"),
            ("QTR1", "NE"),
        ])
    }

    #[test]
    fn unique_row_is_fully_normalized() {
        let well = well_from_record("3505100001", &full_row("3505100001"));
        assert_eq!(well.api_number, "3505100001");
        assert_eq!(well.well_name.as_deref(), Some("Smith Federal"));
        assert_eq!(well.well_num.as_deref(), Some("1-24H"));
        assert_eq!(well.operator.as_deref(), Some("Camino Natural Resources Llc"));
        assert_eq!(well.latitude, Some(35.12346));
        assert_eq!(well.longitude, Some(-97.98765));
        assert_eq!(well.county.as_deref(), Some("Grady"));
        assert_eq!(well.plss.as_deref(), Some("S12 T5N R3W SWNE"));
    }

    #[test]
    fn missing_columns_become_none() {
        let record = RegistryRecord::from_pairs([("API", "X1"), ("SH_LAT", "n/a")]);
        let well = well_from_record("X1", &record);
        assert_eq!(well, WellRecord::new("X1"));
    }

    #[test]
    fn duplicates_and_ambiguity_follow_facility_order() {
        let registry = vec![full_row("A1"), full_row("B2"), full_row("B2")];
        let api_numbers: Vec<String> = ["A1", "A1", "B2", "C3"].map(String::from).to_vec();

        let result = reconcile_api_numbers(&api_numbers, &registry);

        let statuses: Vec<ApiMatchStatus> =
            result.outcomes.iter().map(|outcome| outcome.status).collect();
        assert_eq!(
            statuses,
            vec![
                ApiMatchStatus::Imported,
                ApiMatchStatus::Imported,
                ApiMatchStatus::Ambiguous { matches: 2 },
                ApiMatchStatus::NotFound,
            ]
        );
        assert_eq!(result.wells.len(), 2);
        assert!(result.wells.iter().all(|well| well.api_number == "A1"));
        assert_eq!((result.imported(), result.not_found(), result.ambiguous()), (2, 1, 1));
    }

    #[test]
    fn every_produced_well_comes_from_the_facility_list() {
        let registry = vec![full_row("A1"), full_row("B2")];
        let facility = Facility::new("Pad", vec!["B2".into(), "Q7".into(), "A1".into()]);
        let result = reconcile(&facility, &registry);
        let produced: Vec<&str> = result.wells.iter().map(|w| w.api_number.as_str()).collect();
        assert_eq!(produced, vec!["B2", "A1"]);
        assert!(produced
            .iter()
            .all(|api| facility.api_numbers.iter().any(|own| own == api)));
    }
}

//! Identifier → registry row matching.
//!
//! Matching is exact string equality on the raw `API` cell: no trimming, no
//! case folding. Rows without an `API` cell never match.

use crate::registry::RegistryRecord;
use std::collections::HashMap;

/// Cardinality of the registry rows sharing one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome<'a> {
    NotFound,
    Unique(&'a RegistryRecord),
    /// Number of rows sharing the identifier (always >= 2).
    Ambiguous(usize),
}

impl<'a> MatchOutcome<'a> {
    fn from_rows(mut rows: impl Iterator<Item = &'a RegistryRecord>) -> Self {
        match (rows.next(), rows.next()) {
            (None, _) => Self::NotFound,
            (Some(record), None) => Self::Unique(record),
            (Some(_), Some(_)) => Self::Ambiguous(2 + rows.count()),
        }
    }
}

/// Linear scan of `registry` for `api_number`.
pub fn match_api_number<'a>(api_number: &str, registry: &'a [RegistryRecord]) -> MatchOutcome<'a> {
    MatchOutcome::from_rows(
        registry
            .iter()
            .filter(|record| record.api_number() == Some(api_number)),
    )
}

/// Registry rows grouped by identifier, built once per reconciliation run.
///
/// Lookups give the same outcome as [`match_api_number`].
pub struct RegistryIndex<'a> {
    by_api: HashMap<&'a str, Vec<&'a RegistryRecord>>,
}

impl<'a> RegistryIndex<'a> {
    pub fn build(registry: &'a [RegistryRecord]) -> Self {
        let mut by_api: HashMap<&'a str, Vec<&'a RegistryRecord>> = HashMap::new();
        for record in registry {
            if let Some(api) = record.api_number() {
                by_api.entry(api).or_default().push(record);
            }
        }
        Self { by_api }
    }

    pub fn lookup(&self, api_number: &str) -> MatchOutcome<'a> {
        match self.by_api.get(api_number) {
            Some(rows) => MatchOutcome::from_rows(rows.iter().copied()),
            None => MatchOutcome::NotFound,
        }
    }

    /// Number of distinct identifiers in the snapshot.
    pub fn distinct_api_numbers(&self) -> usize {
        self.by_api.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(api: &str, name: &str) -> RegistryRecord {
        RegistryRecord::from_pairs([("API", api), ("WELL_NAME", name)])
    }

    fn registry() -> Vec<RegistryRecord> {
        vec![
            row("A1", "first"),
            row("B2", "second"),
            row("B2", "second again"),
            row("C3 ", "padded"),
            RegistryRecord::from_pairs([("WELL_NAME", "no api")]),
        ]
    }

    #[test]
    fn classifies_cardinality() {
        let registry = registry();
        assert!(matches!(
            match_api_number("A1", &registry),
            MatchOutcome::Unique(record) if record.get("WELL_NAME") == Some("first")
        ));
        assert_eq!(match_api_number("B2", &registry), MatchOutcome::Ambiguous(2));
        assert_eq!(match_api_number("Z9", &registry), MatchOutcome::NotFound);
    }

    #[test]
    fn comparison_is_exact() {
        let registry = registry();
        assert_eq!(match_api_number("C3", &registry), MatchOutcome::NotFound);
        assert!(matches!(
            match_api_number("C3 ", &registry),
            MatchOutcome::Unique(_)
        ));
        assert_eq!(match_api_number("a1", &registry), MatchOutcome::NotFound);
        assert_eq!(match_api_number("", &registry), MatchOutcome::NotFound);
    }

    #[test]
    fn index_agrees_with_linear_scan() {
        let registry = registry();
        let index = RegistryIndex::build(&registry);
        for api in ["A1", "B2", "C3", "C3 ", "Z9", "", "a1"] {
            assert_eq!(index.lookup(api), match_api_number(api, &registry), "api={api:?}");
        }
        assert_eq!(index.distinct_api_numbers(), 3);
    }

    #[test]
    fn ambiguous_count_covers_every_duplicate() {
        let registry = vec![row("D4", "x"), row("D4", "y"), row("D4", "z")];
        assert_eq!(match_api_number("D4", &registry), MatchOutcome::Ambiguous(3));
        assert_eq!(RegistryIndex::build(&registry).lookup("D4"), MatchOutcome::Ambiguous(3));
    }
}

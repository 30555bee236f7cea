//! CSV decoding for registry snapshots.

use super::{columns, RegistryError, RegistryFetcher, RegistryRecord, RegistryResult};
use std::path::{Path, PathBuf};

/// Decodes a registry CSV (header row + data rows).
///
/// Invalid UTF-8 is replaced rather than rejected; published snapshots
/// occasionally carry stray Latin-1 bytes in operator names.
///
/// # Errors
/// - `MissingColumn("API")` when the header has no identifier column.
/// - `Decode` for malformed CSV framing.
pub fn parse_registry_csv(bytes: &[u8]) -> RegistryResult<Vec<RegistryRecord>> {
    let content = String::from_utf8_lossy(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_string())
        .collect();
    if !headers.iter().any(|header| header == columns::API) {
        return Err(RegistryError::MissingColumn(columns::API));
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        records.push(RegistryRecord::from_pairs(
            headers.iter().cloned().zip(row.iter().map(str::to_string)),
        ));
    }
    Ok(records)
}

/// Reads a registry snapshot previously saved to disk.
#[derive(Debug, Clone)]
pub struct FileRegistryFetcher {
    path: PathBuf,
}

impl FileRegistryFetcher {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RegistryFetcher for FileRegistryFetcher {
    fn source_kind(&self) -> &'static str {
        "file"
    }

    fn fetch(&self) -> RegistryResult<Vec<RegistryRecord>> {
        let bytes = std::fs::read(&self.path).map_err(|source| RegistryError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_registry_csv(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_keyed_by_header() {
        let csv = "API,WELL_NAME,SH_LAT\n3500100001,SMITH 1-2,35.1\n3500100002,JONES,\n";
        let records = parse_registry_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].api_number(), Some("3500100001"));
        assert_eq!(records[0].get("WELL_NAME"), Some("SMITH 1-2"));
        assert_eq!(records[1].get("SH_LAT"), Some(""));
        assert_eq!(records[1].get("COUNTY"), None);
    }

    #[test]
    fn raw_values_are_not_trimmed() {
        let csv = "API,OPERATOR\n\" 3500100001 \",\"  ACME OIL  \"\n";
        let records = parse_registry_csv(csv.as_bytes()).unwrap();
        assert_eq!(records[0].api_number(), Some(" 3500100001 "));
        assert_eq!(records[0].get("OPERATOR"), Some("  ACME OIL  "));
    }

    #[test]
    fn short_rows_leave_trailing_columns_absent() {
        let csv = "API,WELL_NAME,COUNTY\n3500100001\n";
        let records = parse_registry_csv(csv.as_bytes()).unwrap();
        assert_eq!(records[0].api_number(), Some("3500100001"));
        assert_eq!(records[0].get("COUNTY"), None);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut bytes = b"API,OPERATOR\n3500100001,CAF".to_vec();
        bytes.push(0xE9);
        bytes.push(b'\n');
        let records = parse_registry_csv(&bytes).unwrap();
        assert_eq!(records[0].get("OPERATOR"), Some("CAF\u{fffd}"));
    }

    #[test]
    fn missing_api_column_is_rejected() {
        let err = parse_registry_csv(b"WELL_NAME\nSMITH\n").unwrap_err();
        assert!(matches!(err, RegistryError::MissingColumn("API")));
    }

    #[test]
    fn byte_order_mark_does_not_hide_api_column() {
        let csv = "\u{feff}API,WELL_NAME\n3500100001,SMITH\n";
        let records = parse_registry_csv(csv.as_bytes()).unwrap();
        assert_eq!(records[0].api_number(), Some("3500100001"));
    }

    #[test]
    fn file_fetcher_reports_missing_file_as_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FileRegistryFetcher::new(dir.path().join("absent.csv"));
        assert!(matches!(fetcher.fetch(), Err(RegistryError::Io { .. })));
    }
}

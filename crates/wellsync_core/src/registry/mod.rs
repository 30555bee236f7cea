//! External well registry access.
//!
//! # Responsibility
//! - Fetch the bulk registry snapshot (HTTP or local file).
//! - Decode it into column-keyed records without interpreting values.
//!
//! # Invariants
//! - A fetch either yields the complete record set or fails as a whole.
//! - Raw cell values are kept byte-for-byte (after UTF-8 repair); trimming
//!   and typing belong to `reconcile::normalize`.

mod csv_source;
mod http;

pub use csv_source::{parse_registry_csv, FileRegistryFetcher};
pub use http::HttpRegistryFetcher;

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Registry column names used by reconciliation.
pub mod columns {
    pub const API: &str = "API";
    pub const WELL_NAME: &str = "WELL_NAME";
    pub const WELL_NUM: &str = "WELL_NUM";
    pub const OPERATOR: &str = "OPERATOR";
    pub const SH_LAT: &str = "SH_LAT";
    pub const SH_LON: &str = "SH_LON";
    pub const COUNTY: &str = "COUNTY";
    pub const SECTION: &str = "SECTION";
    pub const TOWNSHIP: &str = "TOWNSHIP";
    pub const RANGE: &str = "RANGE";
    pub const QTR2: &str = "QTR2";
    pub const QTR1: &str = "QTR1";
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Fatal failure while obtaining the registry snapshot.
#[derive(Debug)]
pub enum RegistryError {
    /// Transport-level failure (DNS, TLS, timeout, body read).
    Http(reqwest::Error),
    /// Server answered with a non-success status.
    Status { url: String, status: u16 },
    Io { path: PathBuf, source: std::io::Error },
    Decode(csv::Error),
    /// Header row lacks a column reconciliation cannot work without.
    MissingColumn(&'static str),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "registry request failed: {err}"),
            Self::Status { url, status } => {
                write!(f, "registry returned HTTP {status} for {url}")
            }
            Self::Io { path, source } => {
                write!(f, "failed to read registry file `{}`: {source}", path.display())
            }
            Self::Decode(err) => write!(f, "registry CSV could not be decoded: {err}"),
            Self::MissingColumn(column) => {
                write!(f, "registry CSV is missing required column `{column}`")
            }
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Decode(err) => Some(err),
            Self::Status { .. } | Self::MissingColumn(_) => None,
        }
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<csv::Error> for RegistryError {
    fn from(value: csv::Error) -> Self {
        Self::Decode(value)
    }
}

/// One registry row, keyed by header name.
///
/// Cells beyond the header width are dropped; cells missing from a short row
/// are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryRecord {
    fields: BTreeMap<String, String>,
}

impl RegistryRecord {
    /// Builds a record from `(column, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Raw cell value, or `None` when the column is absent for this row.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Raw identifier cell, compared as-is by the matcher.
    pub fn api_number(&self) -> Option<&str> {
        self.get(columns::API)
    }
}

/// Source of the registry snapshot used for one reconciliation run.
pub trait RegistryFetcher {
    /// Short label for logs (`http`, `file`, ...).
    fn source_kind(&self) -> &'static str;
    fn fetch(&self) -> RegistryResult<Vec<RegistryRecord>>;
}

//! Facility domain model.
//!
//! # Responsibility
//! - Define the facility record and its ordered API-number list.
//! - Convert the list to and from its comma-delimited storage form.
//!
//! # Invariants
//! - `name` is never blank.
//! - Every API number is trimmed, non-empty and free of the delimiter.
//! - Duplicate API numbers are allowed and keep their positions.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a facility.
pub type FacilityId = Uuid;

/// Separator used when API numbers are persisted as one string.
pub const API_NUMBER_DELIMITER: char = ',';

/// Validation failures for facility writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacilityValidationError {
    BlankName,
    /// API number at `index` is blank or not trimmed.
    MalformedApiNumber { index: usize, value: String },
}

impl Display for FacilityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "facility name is required"),
            Self::MalformedApiNumber { index, value } => {
                write!(f, "api number #{index} is malformed: `{value}`")
            }
        }
    }
}

impl Error for FacilityValidationError {}

/// A regulated facility and the wells it reports on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    /// API numbers in entry order, duplicates preserved.
    pub api_numbers: Vec<String>,
}

impl Facility {
    /// Creates a facility with a generated id.
    pub fn new(name: impl Into<String>, api_numbers: Vec<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, api_numbers)
    }

    pub fn with_id(id: FacilityId, name: impl Into<String>, api_numbers: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            api_numbers,
        }
    }

    /// Checks the invariants enforced before any store write.
    pub fn validate(&self) -> Result<(), FacilityValidationError> {
        if self.name.trim().is_empty() {
            return Err(FacilityValidationError::BlankName);
        }

        for (index, value) in self.api_numbers.iter().enumerate() {
            if value.is_empty()
                || value.trim() != value
                || value.contains(API_NUMBER_DELIMITER)
            {
                return Err(FacilityValidationError::MalformedApiNumber {
                    index,
                    value: value.clone(),
                });
            }
        }

        Ok(())
    }

    /// Storage form of [`Facility::api_numbers`].
    pub fn api_numbers_joined(&self) -> String {
        join_api_numbers(&self.api_numbers)
    }
}

/// Splits the delimited storage/input form into trimmed, non-empty entries.
///
/// `" 35-001 ,, 35-002,"` yields `["35-001", "35-002"]`.
pub fn parse_api_numbers(raw: &str) -> Vec<String> {
    raw.split(API_NUMBER_DELIMITER)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_api_numbers(api_numbers: &[String]) -> String {
    api_numbers.join(",")
}

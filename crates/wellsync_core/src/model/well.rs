//! Well record materialized from the external registry.
//!
//! # Invariants
//! - `api_number` is non-empty and equals the facility API number it was
//!   matched for.
//! - `latitude`/`longitude` are finite and carry at most 5 decimals.
//! - `plss` is derived from the location fields, never edited directly.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WellValidationError {
    BlankApiNumber { position: usize },
    NonFiniteCoordinate { position: usize },
}

impl Display for WellValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankApiNumber { position } => {
                write!(f, "well #{position} has a blank api number")
            }
            Self::NonFiniteCoordinate { position } => {
                write!(f, "well #{position} has a non-finite coordinate")
            }
        }
    }
}

impl Error for WellValidationError {}

/// Normalized well metadata stored per facility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WellRecord {
    pub api_number: String,
    pub well_name: Option<String>,
    pub well_num: Option<String>,
    pub operator: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub county: Option<String>,
    pub section: Option<String>,
    pub township: Option<String>,
    pub range: Option<String>,
    pub qtr2: Option<String>,
    pub qtr1: Option<String>,
    /// Composite Public Land Survey System code, e.g. `S12 T5N R3W SWNE`.
    pub plss: Option<String>,
}

impl WellRecord {
    pub fn new(api_number: impl Into<String>) -> Self {
        Self {
            api_number: api_number.into(),
            ..Self::default()
        }
    }

    /// Checks a record before it is written at `position` in a facility set.
    pub fn validate(&self, position: usize) -> Result<(), WellValidationError> {
        if self.api_number.is_empty() {
            return Err(WellValidationError::BlankApiNumber { position });
        }
        let finite = |value: Option<f64>| value.map_or(true, f64::is_finite);
        if !finite(self.latitude) || !finite(self.longitude) {
            return Err(WellValidationError::NonFiniteCoordinate { position });
        }
        Ok(())
    }
}

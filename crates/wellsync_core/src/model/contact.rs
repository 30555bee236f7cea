//! Contact response attached to a facility.

use serde::{Deserialize, Serialize};

/// Free-text contact block, at most one per facility.
///
/// Fields are stored as given; required-field checks happen in
/// `FacilityService::save_details`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

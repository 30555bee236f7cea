//! Facility use-case service.
//!
//! # Responsibility
//! - Add facilities from user input (name + delimited API numbers).
//! - Save facility details and the contact response together.
//! - Delete a facility with everything it owns.
//!
//! # Invariants
//! - Detail saves require facility name, contact name, company, phone and
//!   email; all inputs are trimmed before storage.
//! - API numbers are parsed from the delimited form here, never in the store.

use crate::model::contact::ContactResponse;
use crate::model::facility::{parse_api_numbers, Facility, FacilityId};
use crate::repo::facility_repo::{FacilityRepository, RepoError, RepoResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for facility use-cases.
#[derive(Debug)]
pub enum FacilityServiceError {
    /// A required input was blank; carries the field name.
    MissingRequiredField(&'static str),
    FacilityNotFound(FacilityId),
    Repo(RepoError),
}

impl Display for FacilityServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequiredField(field) => write!(f, "`{field}` is required"),
            Self::FacilityNotFound(id) => write!(f, "facility not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FacilityServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for FacilityServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::FacilityNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Form-shaped input for a detail save. Values are raw user input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacilityDetails {
    pub facility_name: String,
    /// Comma-delimited API numbers.
    pub api_numbers: String,
    pub contact: ContactResponse,
}

/// Facility service facade over repository implementations.
pub struct FacilityService<R: FacilityRepository> {
    repo: R,
}

impl<R: FacilityRepository> FacilityService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a facility from a name and delimited API numbers.
    pub fn add_facility(
        &self,
        name: &str,
        raw_api_numbers: &str,
    ) -> Result<Facility, FacilityServiceError> {
        let name = required("facility_name", name)?;
        let facility = Facility::new(name, parse_api_numbers(raw_api_numbers));
        self.repo.create_facility(&facility)?;
        info!(
            "event=facility_add module=service status=ok facility_id={} api_numbers={}",
            facility.id,
            facility.api_numbers.len()
        );
        Ok(facility)
    }

    pub fn get_facility(&self, id: FacilityId) -> RepoResult<Option<Facility>> {
        self.repo.get_facility(id)
    }

    /// Like [`FacilityService::get_facility`] but missing is an error.
    pub fn require_facility(&self, id: FacilityId) -> Result<Facility, FacilityServiceError> {
        self.repo
            .get_facility(id)?
            .ok_or(FacilityServiceError::FacilityNotFound(id))
    }

    pub fn list_facilities(&self) -> RepoResult<Vec<Facility>> {
        self.repo.list_facilities()
    }

    pub fn get_contact(&self, id: FacilityId) -> RepoResult<Option<ContactResponse>> {
        self.repo.get_contact(id)
    }

    /// Validates and stores facility details plus contact in one transaction.
    pub fn save_details(
        &mut self,
        id: FacilityId,
        details: &FacilityDetails,
    ) -> Result<Facility, FacilityServiceError> {
        let name = required("facility_name", &details.facility_name)?;
        let contact = normalize_contact(&details.contact)?;

        let facility = Facility::with_id(id, name, parse_api_numbers(&details.api_numbers));
        self.repo.save_details(&facility, &contact)?;
        info!(
            "event=facility_save module=service status=ok facility_id={} api_numbers={}",
            facility.id,
            facility.api_numbers.len()
        );
        Ok(facility)
    }

    /// Removes the facility, its contact and its wells.
    pub fn delete_facility(&mut self, id: FacilityId) -> Result<(), FacilityServiceError> {
        self.repo.delete_facility_cascade(id)?;
        info!("event=facility_delete module=service status=ok facility_id={id}");
        Ok(())
    }
}

fn required(field: &'static str, value: &str) -> Result<String, FacilityServiceError> {
    optional(value).ok_or(FacilityServiceError::MissingRequiredField(field))
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn normalize_contact(raw: &ContactResponse) -> Result<ContactResponse, FacilityServiceError> {
    let field = |value: &Option<String>| value.as_deref().and_then(optional);
    let require = |name: &'static str, value: &Option<String>| {
        field(value).ok_or(FacilityServiceError::MissingRequiredField(name))
    };

    Ok(ContactResponse {
        name: Some(require("name", &raw.name)?),
        title: field(&raw.title),
        company: Some(require("company", &raw.company)?),
        street: field(&raw.street),
        city: field(&raw.city),
        state: field(&raw.state),
        zip: field(&raw.zip),
        phone_number: Some(require("phone_number", &raw.phone_number)?),
        email: Some(require("email", &raw.email)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_contact() -> ContactResponse {
        ContactResponse {
            name: Some(" Dana Reyes ".into()),
            title: Some("".into()),
            company: Some("Red Fork Midstream".into()),
            phone_number: Some("405-555-0100".into()),
            email: Some("dana@example.com".into()),
            ..ContactResponse::default()
        }
    }

    #[test]
    fn contact_is_trimmed_and_blank_optionals_dropped() {
        let contact = normalize_contact(&complete_contact()).unwrap();
        assert_eq!(contact.name.as_deref(), Some("Dana Reyes"));
        assert_eq!(contact.title, None);
        assert_eq!(contact.street, None);
    }

    #[test]
    fn missing_required_contact_field_is_named() {
        let mut contact = complete_contact();
        contact.email = Some("   ".into());
        match normalize_contact(&contact) {
            Err(FacilityServiceError::MissingRequiredField(field)) => assert_eq!(field, "email"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

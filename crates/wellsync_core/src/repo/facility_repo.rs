//! Facility/contact repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist facilities with their API numbers in delimited form.
//! - Upsert the single contact response per facility.
//! - Remove a facility together with everything it owns.
//!
//! # Invariants
//! - Writes call `Facility::validate()` before touching SQL.
//! - Reads reject persisted rows that no longer satisfy the model.
//! - `save_details` and `delete_facility_cascade` are all-or-nothing.

use crate::db::DbError;
use crate::model::contact::ContactResponse;
use crate::model::facility::{parse_api_numbers, Facility, FacilityId, FacilityValidationError};
use crate::model::well::WellValidationError;
use crate::repo::ensure_schema;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const FACILITY_SELECT_SQL: &str = "SELECT
    id,
    facility_name,
    api_numbers
FROM facilities";

const FACILITY_COLUMNS: &[&str] = &["id", "facility_name", "api_numbers"];

const CONTACT_COLUMNS: &[&str] = &[
    "facility_id",
    "name",
    "title",
    "company",
    "street",
    "city",
    "state",
    "zip",
    "phone_number",
    "email",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Store error shared by the facility and well repositories.
#[derive(Debug)]
pub enum RepoError {
    InvalidFacility(FacilityValidationError),
    InvalidWell(WellValidationError),
    Db(DbError),
    NotFound(FacilityId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFacility(err) => write!(f, "{err}"),
            Self::InvalidWell(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "facility not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "store is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "store table `{table}` is missing column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidFacility(err) => Some(err),
            Self::InvalidWell(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FacilityValidationError> for RepoError {
    fn from(value: FacilityValidationError) -> Self {
        Self::InvalidFacility(value)
    }
}

impl From<WellValidationError> for RepoError {
    fn from(value: WellValidationError) -> Self {
        Self::InvalidWell(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for facilities and their contact response.
pub trait FacilityRepository {
    fn create_facility(&self, facility: &Facility) -> RepoResult<FacilityId>;
    fn get_facility(&self, id: FacilityId) -> RepoResult<Option<Facility>>;
    /// Lists facilities ordered by name, then id.
    fn list_facilities(&self) -> RepoResult<Vec<Facility>>;
    fn update_facility(&self, facility: &Facility) -> RepoResult<()>;
    fn get_contact(&self, id: FacilityId) -> RepoResult<Option<ContactResponse>>;
    /// Updates the facility and upserts its contact in one transaction.
    fn save_details(&mut self, facility: &Facility, contact: &ContactResponse) -> RepoResult<()>;
    /// Deletes the facility, its contact and all of its wells in one transaction.
    fn delete_facility_cascade(&mut self, id: FacilityId) -> RepoResult<()>;
}

/// SQLite-backed facility repository.
pub struct SqliteFacilityRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteFacilityRepository<'conn> {
    /// Wraps a migrated connection after checking the tables it needs.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema(
            conn,
            &[
                ("facilities", FACILITY_COLUMNS),
                ("contact_responses", CONTACT_COLUMNS),
            ],
        )?;
        Ok(Self { conn })
    }
}

impl FacilityRepository for SqliteFacilityRepository<'_> {
    fn create_facility(&self, facility: &Facility) -> RepoResult<FacilityId> {
        facility.validate()?;

        self.conn.execute(
            "INSERT INTO facilities (id, facility_name, api_numbers)
             VALUES (?1, ?2, ?3);",
            params![
                facility.id.to_string(),
                facility.name.as_str(),
                facility.api_numbers_joined(),
            ],
        )?;

        Ok(facility.id)
    }

    fn get_facility(&self, id: FacilityId) -> RepoResult<Option<Facility>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FACILITY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_facility_row(row)?));
        }
        Ok(None)
    }

    fn list_facilities(&self) -> RepoResult<Vec<Facility>> {
        let mut stmt = self.conn.prepare(&format!(
            "{FACILITY_SELECT_SQL} ORDER BY facility_name COLLATE NOCASE ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut facilities = Vec::new();
        while let Some(row) = rows.next()? {
            facilities.push(parse_facility_row(row)?);
        }
        Ok(facilities)
    }

    fn update_facility(&self, facility: &Facility) -> RepoResult<()> {
        facility.validate()?;
        if update_facility_row(self.conn, facility)? == 0 {
            return Err(RepoError::NotFound(facility.id));
        }
        Ok(())
    }

    fn get_contact(&self, id: FacilityId) -> RepoResult<Option<ContactResponse>> {
        let contact = self
            .conn
            .query_row(
                "SELECT name, title, company, street, city, state, zip, phone_number, email
                 FROM contact_responses
                 WHERE facility_id = ?1;",
                [id.to_string()],
                |row| {
                    Ok(ContactResponse {
                        name: row.get("name")?,
                        title: row.get("title")?,
                        company: row.get("company")?,
                        street: row.get("street")?,
                        city: row.get("city")?,
                        state: row.get("state")?,
                        zip: row.get("zip")?,
                        phone_number: row.get("phone_number")?,
                        email: row.get("email")?,
                    })
                },
            )
            .optional()?;
        Ok(contact)
    }

    fn save_details(&mut self, facility: &Facility, contact: &ContactResponse) -> RepoResult<()> {
        facility.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if update_facility_row(&tx, facility)? == 0 {
            return Err(RepoError::NotFound(facility.id));
        }
        upsert_contact(&tx, facility.id, contact)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_facility_cascade(&mut self, id: FacilityId) -> RepoResult<()> {
        let id_text = id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !facility_exists_in_tx(&tx, &id_text)? {
            return Err(RepoError::NotFound(id));
        }

        tx.execute(
            "DELETE FROM well_records WHERE facility_id = ?1;",
            [id_text.as_str()],
        )?;
        tx.execute(
            "DELETE FROM contact_responses WHERE facility_id = ?1;",
            [id_text.as_str()],
        )?;
        tx.execute("DELETE FROM facilities WHERE id = ?1;", [id_text.as_str()])?;

        tx.commit()?;
        Ok(())
    }
}

fn update_facility_row(conn: &Connection, facility: &Facility) -> RepoResult<usize> {
    let changed = conn.execute(
        "UPDATE facilities
         SET
            facility_name = ?2,
            api_numbers = ?3,
            updated_at = (strftime('%s', 'now') * 1000)
         WHERE id = ?1;",
        params![
            facility.id.to_string(),
            facility.name.as_str(),
            facility.api_numbers_joined(),
        ],
    )?;
    Ok(changed)
}

fn upsert_contact(tx: &Transaction<'_>, id: FacilityId, contact: &ContactResponse) -> RepoResult<()> {
    tx.execute(
        "INSERT INTO contact_responses (
            facility_id, name, title, company, street, city, state, zip, phone_number, email
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT (facility_id) DO UPDATE SET
            name = excluded.name,
            title = excluded.title,
            company = excluded.company,
            street = excluded.street,
            city = excluded.city,
            state = excluded.state,
            zip = excluded.zip,
            phone_number = excluded.phone_number,
            email = excluded.email;",
        params![
            id.to_string(),
            contact.name,
            contact.title,
            contact.company,
            contact.street,
            contact.city,
            contact.state,
            contact.zip,
            contact.phone_number,
            contact.email,
        ],
    )?;
    Ok(())
}

pub(crate) fn facility_exists_in_tx(tx: &Transaction<'_>, id: &str) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM facilities WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_facility_row(row: &Row<'_>) -> RepoResult<Facility> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in facilities.id"))
    })?;
    let api_numbers: String = row.get("api_numbers")?;

    let facility = Facility {
        id,
        name: row.get("facility_name")?,
        api_numbers: parse_api_numbers(&api_numbers),
    };
    facility.validate()?;
    Ok(facility)
}

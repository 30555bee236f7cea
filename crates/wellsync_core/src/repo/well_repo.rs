//! Well record repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Read a facility's well set in the order it was produced.
//! - Replace a facility's whole well set atomically.
//!
//! # Invariants
//! - `replace_well_records` deletes and inserts inside one IMMEDIATE
//!   transaction; readers see either the old set or the new set, never a mix.
//! - Any validation or SQL failure rolls the replacement back.
//! - Existing rows are never updated field by field.

use crate::model::facility::FacilityId;
use crate::model::well::WellRecord;
use crate::repo::ensure_schema;
use crate::repo::facility_repo::{facility_exists_in_tx, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, Row, TransactionBehavior};

const WELL_COLUMNS: &[&str] = &[
    "facility_id",
    "position",
    "api_number",
    "well_name",
    "well_num",
    "operator",
    "sh_lat",
    "sh_lon",
    "county",
    "section",
    "township",
    "range_code",
    "qtr2",
    "qtr1",
    "plss",
];

/// Repository interface for per-facility well sets.
pub trait WellRepository {
    /// Returns the facility's wells in stored order (empty when none).
    fn list_well_records(&self, facility_id: FacilityId) -> RepoResult<Vec<WellRecord>>;
    /// Replaces every well of `facility_id` with `wells` in one transaction.
    fn replace_well_records(
        &mut self,
        facility_id: FacilityId,
        wells: &[WellRecord],
    ) -> RepoResult<()>;
}

/// SQLite-backed well repository.
pub struct SqliteWellRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteWellRepository<'conn> {
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema(conn, &[("well_records", WELL_COLUMNS)])?;
        Ok(Self { conn })
    }
}

impl WellRepository for SqliteWellRepository<'_> {
    fn list_well_records(&self, facility_id: FacilityId) -> RepoResult<Vec<WellRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                api_number,
                well_name,
                well_num,
                operator,
                sh_lat,
                sh_lon,
                county,
                section,
                township,
                range_code,
                qtr2,
                qtr1,
                plss
             FROM well_records
             WHERE facility_id = ?1
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([facility_id.to_string()])?;
        let mut wells = Vec::new();
        while let Some(row) = rows.next()? {
            wells.push(parse_well_row(row, wells.len())?);
        }
        Ok(wells)
    }

    fn replace_well_records(
        &mut self,
        facility_id: FacilityId,
        wells: &[WellRecord],
    ) -> RepoResult<()> {
        for (position, well) in wells.iter().enumerate() {
            well.validate(position)?;
        }

        let facility_text = facility_id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !facility_exists_in_tx(&tx, &facility_text)? {
            return Err(RepoError::NotFound(facility_id));
        }

        let removed = tx.execute(
            "DELETE FROM well_records WHERE facility_id = ?1;",
            [facility_text.as_str()],
        )?;

        {
            let mut insert = tx.prepare(
                "INSERT INTO well_records (
                    facility_id, position, api_number, well_name, well_num, operator,
                    sh_lat, sh_lon, county, section, township, range_code, qtr2, qtr1, plss
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);",
            )?;
            for (position, well) in wells.iter().enumerate() {
                insert.execute(params![
                    facility_text.as_str(),
                    position as i64,
                    well.api_number.as_str(),
                    well.well_name,
                    well.well_num,
                    well.operator,
                    well.latitude,
                    well.longitude,
                    well.county,
                    well.section,
                    well.township,
                    well.range,
                    well.qtr2,
                    well.qtr1,
                    well.plss,
                ])?;
            }
        }

        tx.commit()?;
        info!(
            "event=wells_replace module=repo status=ok removed={} inserted={}",
            removed,
            wells.len()
        );
        Ok(())
    }
}

fn parse_well_row(row: &Row<'_>, position: usize) -> RepoResult<WellRecord> {
    let well = WellRecord {
        api_number: row.get("api_number")?,
        well_name: row.get("well_name")?,
        well_num: row.get("well_num")?,
        operator: row.get("operator")?,
        latitude: row.get("sh_lat")?,
        longitude: row.get("sh_lon")?,
        county: row.get("county")?,
        section: row.get("section")?,
        township: row.get("township")?,
        range: row.get("range_code")?,
        qtr2: row.get("qtr2")?,
        qtr1: row.get("qtr1")?,
        plss: row.get("plss")?,
    };
    well.validate(position)
        .map_err(|err| RepoError::InvalidData(format!("well_records: {err}")))?;
    Ok(well)
}

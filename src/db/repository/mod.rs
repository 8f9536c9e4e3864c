//! Repository layer: entity-scoped database operations.
//!
//! One sub-module per entity, all re-exported here. Every patient-scoped
//! read joins `patients` to carry the owner's display name; every
//! patient-scoped write first checks that the referenced patient exists.

mod allergy;
mod appointment;
mod lab_result;
mod medical_history;
mod medication;
mod patient;
mod vital_sign;

use chrono::{NaiveDate, NaiveDateTime, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection};

use super::DatabaseError;
use crate::models::EntityKind;

pub use allergy::*;
pub use appointment::*;
pub use lab_result::*;
pub use medical_history::*;
pub use medication::*;
pub use patient::*;
pub use vital_sign::*;

/// Storage format for every timestamp column (matches SQLite `CURRENT_TIMESTAMP`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Form inputs send the HTML `datetime-local` shape, with or without seconds;
// JSON clients may add a fractional part.
const LEGACY_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Current UTC time truncated to whole seconds, as stored.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}

pub(crate) fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a timestamp in the storage format or any accepted input shape.
pub fn parse_timestamp_text(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    std::iter::once(TIMESTAMP_FORMAT)
        .chain(LEGACY_TIMESTAMP_FORMATS)
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

pub(crate) fn parse_timestamp(idx: usize, raw: &str) -> Result<NaiveDateTime, rusqlite::Error> {
    parse_timestamp_text(raw)
        .ok_or_else(|| conversion_error(idx, format!("invalid timestamp: {raw}")))
}

pub(crate) fn parse_optional_date(
    idx: usize,
    raw: Option<String>,
) -> Result<Option<NaiveDate>, rusqlite::Error> {
    raw.filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(&s, DATE_FORMAT)
                .map_err(|e| conversion_error(idx, e.to_string()))
        })
        .transpose()
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

pub(crate) fn not_found(entity: EntityKind, id: i64) -> DatabaseError {
    DatabaseError::NotFound {
        entity_type: entity.as_str().into(),
        id: id.to_string(),
    }
}

/// Whether a patient row with this id exists.
pub fn patient_exists(conn: &Connection, patient_id: i64) -> Result<bool, DatabaseError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM patients WHERE id = ?1)",
        params![patient_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Whether `table` holds a row with this id. `table` must be one of the
/// fixed entity table names, never caller input.
pub(crate) fn row_exists(conn: &Connection, table: &str, id: i64) -> Result<bool, DatabaseError> {
    let exists: bool = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)"),
        params![id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Guard run before every write to a patient-scoped table.
pub(crate) fn ensure_patient_exists(
    conn: &Connection,
    entity: EntityKind,
    patient_id: i64,
) -> Result<(), DatabaseError> {
    if patient_exists(conn, patient_id)? {
        Ok(())
    } else {
        tracing::warn!(entity = %entity, patient_id, "Write rejected: patient does not exist");
        Err(DatabaseError::Referential {
            entity_type: entity.as_str().into(),
            patient_id,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn timestamp_parses_storage_and_legacy_formats() {
        let expected = ts(2024, 3, 1, 9, 30);
        assert_eq!(parse_timestamp(0, "2024-03-01 09:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp(0, "2024-03-01T09:30").unwrap(), expected);
        assert_eq!(parse_timestamp(0, "2024-03-01T09:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp(0, "2024-03-01T09:30:00.000").unwrap(), expected);
        assert!(parse_timestamp(0, "yesterday").is_err());
    }

    #[test]
    fn empty_date_reads_as_none() {
        assert_eq!(parse_optional_date(0, Some(String::new())).unwrap(), None);
        assert_eq!(parse_optional_date(0, None).unwrap(), None);
        assert!(parse_optional_date(0, Some("03/01/2024".into())).is_err());
    }

    #[test]
    fn patient_exists_reflects_store() {
        let conn = test_db();
        assert!(!patient_exists(&conn, 1).unwrap());
        let id = make_patient(&conn, "Jane Doe");
        assert!(patient_exists(&conn, id).unwrap());
    }

    #[test]
    fn referential_guard_names_entity_and_patient() {
        let conn = test_db();
        let err = ensure_patient_exists(&conn, EntityKind::LabResult, 42).unwrap_err();
        match err {
            DatabaseError::Referential { entity_type, patient_id } => {
                assert_eq!(entity_type, "lab_result");
                assert_eq!(patient_id, 42);
            }
            other => panic!("expected Referential, got {other:?}"),
        }
    }

    #[test]
    fn now_has_no_subsecond_component() {
        use chrono::Timelike;
        assert_eq!(now().nanosecond(), 0);
    }
}

use rusqlite::{params, Connection, OptionalExtension};

use super::{ensure_patient_exists, format_date, not_found, parse_optional_date, row_exists};
use crate::db::DatabaseError;
use crate::models::*;

const SELECT_MEDICATION: &str =
    "SELECT m.id, m.patient_id, p.name, m.drug_name, m.dosage, m.frequency,
            m.start_date, m.end_date
     FROM medications m
     JOIN patients p ON m.patient_id = p.id";

// Undated medications sort after dated ones; id breaks ties.
const MEDICATION_ORDER: &str = "ORDER BY m.start_date DESC, m.id DESC";

pub fn insert_medication(conn: &Connection, med: &MedicationFields) -> Result<i64, DatabaseError> {
    med.validate()?;
    ensure_patient_exists(conn, EntityKind::Medication, med.patient_id)?;
    conn.execute(
        "INSERT INTO medications (patient_id, drug_name, dosage, frequency, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            med.patient_id,
            med.drug_name,
            med.dosage,
            med.frequency,
            med.start_date.as_ref().map(format_date),
            med.end_date.as_ref().map(format_date),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_medications(conn: &Connection) -> Result<Vec<Medication>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SELECT_MEDICATION} {MEDICATION_ORDER}"))?;
    let rows = stmt.query_map([], medication_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn list_medications_for_patient(
    conn: &Connection,
    patient_id: i64,
    limit: u32,
) -> Result<Vec<Medication>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_MEDICATION} WHERE m.patient_id = ?1 {MEDICATION_ORDER} LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![patient_id, limit], medication_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_medication(conn: &Connection, id: i64) -> Result<Medication, DatabaseError> {
    conn.query_row(
        &format!("{SELECT_MEDICATION} WHERE m.id = ?1"),
        params![id],
        medication_from_row,
    )
    .optional()?
    .ok_or_else(|| not_found(EntityKind::Medication, id))
}

pub fn update_medication(
    conn: &Connection,
    id: i64,
    med: &MedicationFields,
) -> Result<usize, DatabaseError> {
    med.validate()?;
    if !row_exists(conn, "medications", id)? {
        return Ok(0);
    }
    ensure_patient_exists(conn, EntityKind::Medication, med.patient_id)?;
    let affected = conn.execute(
        "UPDATE medications
         SET patient_id = ?1, drug_name = ?2, dosage = ?3, frequency = ?4,
             start_date = ?5, end_date = ?6
         WHERE id = ?7",
        params![
            med.patient_id,
            med.drug_name,
            med.dosage,
            med.frequency,
            med.start_date.as_ref().map(format_date),
            med.end_date.as_ref().map(format_date),
            id,
        ],
    )?;
    Ok(affected)
}

pub fn delete_medication(conn: &Connection, id: i64) -> Result<usize, DatabaseError> {
    let affected = conn.execute("DELETE FROM medications WHERE id = ?1", params![id])?;
    Ok(affected)
}

fn medication_from_row(row: &rusqlite::Row<'_>) -> Result<Medication, rusqlite::Error> {
    Ok(Medication {
        id: row.get(0)?,
        patient_name: row.get(2)?,
        fields: MedicationFields {
            patient_id: row.get(1)?,
            drug_name: row.get(3)?,
            dosage: row.get(4)?,
            frequency: row.get(5)?,
            start_date: parse_optional_date(6, row.get(6)?)?,
            end_date: parse_optional_date(7, row.get(7)?)?,
        },
    })
}

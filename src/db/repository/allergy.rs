use rusqlite::{params, Connection, OptionalExtension};

use super::{ensure_patient_exists, not_found, row_exists};
use crate::db::DatabaseError;
use crate::models::*;

// Allergies carry no timestamp; the autoincrement id is their recency key.
const SELECT_ALLERGY: &str =
    "SELECT a.id, a.patient_id, p.name, a.allergy_type, a.description, a.severity
     FROM allergies a
     JOIN patients p ON a.patient_id = p.id";

pub fn insert_allergy(conn: &Connection, allergy: &AllergyFields) -> Result<i64, DatabaseError> {
    allergy.validate()?;
    ensure_patient_exists(conn, EntityKind::Allergy, allergy.patient_id)?;
    conn.execute(
        "INSERT INTO allergies (patient_id, allergy_type, description, severity)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            allergy.patient_id,
            allergy.allergy_type,
            allergy.description,
            allergy.severity,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_allergies(conn: &Connection) -> Result<Vec<Allergy>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SELECT_ALLERGY} ORDER BY a.id DESC"))?;
    let rows = stmt.query_map([], row_to_allergy)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn list_allergies_for_patient(
    conn: &Connection,
    patient_id: i64,
    limit: u32,
) -> Result<Vec<Allergy>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_ALLERGY} WHERE a.patient_id = ?1 ORDER BY a.id DESC LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![patient_id, limit], row_to_allergy)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_allergy(conn: &Connection, id: i64) -> Result<Allergy, DatabaseError> {
    conn.query_row(
        &format!("{SELECT_ALLERGY} WHERE a.id = ?1"),
        params![id],
        row_to_allergy,
    )
    .optional()?
    .ok_or_else(|| not_found(EntityKind::Allergy, id))
}

pub fn update_allergy(
    conn: &Connection,
    id: i64,
    allergy: &AllergyFields,
) -> Result<usize, DatabaseError> {
    allergy.validate()?;
    if !row_exists(conn, "allergies", id)? {
        return Ok(0);
    }
    ensure_patient_exists(conn, EntityKind::Allergy, allergy.patient_id)?;
    let affected = conn.execute(
        "UPDATE allergies
         SET patient_id = ?1, allergy_type = ?2, description = ?3, severity = ?4
         WHERE id = ?5",
        params![
            allergy.patient_id,
            allergy.allergy_type,
            allergy.description,
            allergy.severity,
            id,
        ],
    )?;
    Ok(affected)
}

pub fn delete_allergy(conn: &Connection, id: i64) -> Result<usize, DatabaseError> {
    let affected = conn.execute("DELETE FROM allergies WHERE id = ?1", params![id])?;
    Ok(affected)
}

fn row_to_allergy(row: &rusqlite::Row) -> Result<Allergy, rusqlite::Error> {
    Ok(Allergy {
        id: row.get(0)?,
        patient_name: row.get(2)?,
        fields: AllergyFields {
            patient_id: row.get(1)?,
            allergy_type: row.get(3)?,
            description: row.get(4)?,
            severity: row.get(5)?,
        },
    })
}

use rusqlite::{params, Connection, OptionalExtension};

use super::{ensure_patient_exists, format_timestamp, not_found, now, parse_timestamp, row_exists};
use crate::db::DatabaseError;
use crate::models::{EntityKind, LabResult, LabResultFields, Validate};

const SELECT_LAB_RESULT: &str =
    "SELECT l.id, l.patient_id, p.name, l.test_name, l.result, l.unit,
            l.reference_range, l.is_abnormal, l.recorded_at
     FROM lab_results l
     JOIN patients p ON l.patient_id = p.id";

pub fn insert_lab_result(conn: &Connection, lab: &LabResultFields) -> Result<i64, DatabaseError> {
    lab.validate()?;
    ensure_patient_exists(conn, EntityKind::LabResult, lab.patient_id)?;
    let recorded_at = lab.recorded_at.unwrap_or_else(now);
    conn.execute(
        "INSERT INTO lab_results (patient_id, test_name, result, unit, reference_range,
         is_abnormal, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            lab.patient_id,
            lab.test_name,
            lab.result,
            lab.unit,
            lab.reference_range,
            lab.is_abnormal,
            format_timestamp(&recorded_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_lab_results(conn: &Connection) -> Result<Vec<LabResult>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_LAB_RESULT} ORDER BY l.recorded_at DESC, l.id DESC"
    ))?;
    let rows = stmt.query_map([], lab_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn list_lab_results_for_patient(
    conn: &Connection,
    patient_id: i64,
    limit: u32,
) -> Result<Vec<LabResult>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_LAB_RESULT} WHERE l.patient_id = ?1
         ORDER BY l.recorded_at DESC, l.id DESC LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![patient_id, limit], lab_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_lab_result(conn: &Connection, id: i64) -> Result<LabResult, DatabaseError> {
    conn.query_row(
        &format!("{SELECT_LAB_RESULT} WHERE l.id = ?1"),
        params![id],
        lab_from_row,
    )
    .optional()?
    .ok_or_else(|| not_found(EntityKind::LabResult, id))
}

pub fn update_lab_result(
    conn: &Connection,
    id: i64,
    lab: &LabResultFields,
) -> Result<usize, DatabaseError> {
    lab.validate()?;
    if !row_exists(conn, "lab_results", id)? {
        return Ok(0);
    }
    ensure_patient_exists(conn, EntityKind::LabResult, lab.patient_id)?;
    let affected = conn.execute(
        "UPDATE lab_results
         SET patient_id = ?1, test_name = ?2, result = ?3, unit = ?4,
             reference_range = ?5, is_abnormal = ?6,
             recorded_at = COALESCE(?7, recorded_at)
         WHERE id = ?8",
        params![
            lab.patient_id,
            lab.test_name,
            lab.result,
            lab.unit,
            lab.reference_range,
            lab.is_abnormal,
            lab.recorded_at.as_ref().map(format_timestamp),
            id,
        ],
    )?;
    Ok(affected)
}

pub fn delete_lab_result(conn: &Connection, id: i64) -> Result<usize, DatabaseError> {
    let affected = conn.execute("DELETE FROM lab_results WHERE id = ?1", params![id])?;
    Ok(affected)
}

fn lab_from_row(row: &rusqlite::Row<'_>) -> Result<LabResult, rusqlite::Error> {
    let recorded_at: String = row.get(8)?;
    Ok(LabResult {
        id: row.get(0)?,
        patient_name: row.get(2)?,
        fields: LabResultFields {
            patient_id: row.get(1)?,
            test_name: row.get(3)?,
            result: row.get(4)?,
            unit: row.get(5)?,
            reference_range: row.get(6)?,
            is_abnormal: row.get::<_, Option<bool>>(7)?.unwrap_or(false),
            recorded_at: Some(parse_timestamp(8, &recorded_at)?),
        },
    })
}

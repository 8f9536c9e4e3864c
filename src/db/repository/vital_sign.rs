use rusqlite::{params, Connection, OptionalExtension};

use super::{ensure_patient_exists, format_timestamp, not_found, now, parse_timestamp, row_exists};
use crate::db::DatabaseError;
use crate::models::{EntityKind, Validate, VitalSigns, VitalSignsFields};

const SELECT_VITAL_SIGNS: &str =
    "SELECT v.id, v.patient_id, p.name, v.blood_pressure, v.pulse, v.temperature,
            v.respiratory_rate, v.oxygen_saturation, v.recorded_at
     FROM vital_signs v
     JOIN patients p ON v.patient_id = p.id";

/// Insert a vital signs record. `recorded_at` defaults to now.
pub fn insert_vital_signs(
    conn: &Connection,
    fields: &VitalSignsFields,
) -> Result<i64, DatabaseError> {
    fields.validate()?;
    ensure_patient_exists(conn, EntityKind::VitalSigns, fields.patient_id)?;
    let recorded_at = fields.recorded_at.unwrap_or_else(now);
    conn.execute(
        "INSERT INTO vital_signs (patient_id, blood_pressure, pulse, temperature,
         respiratory_rate, oxygen_saturation, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            fields.patient_id,
            fields.blood_pressure,
            fields.pulse,
            fields.temperature,
            fields.respiratory_rate,
            fields.oxygen_saturation,
            format_timestamp(&recorded_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All vital signs, most recently recorded first.
pub fn list_vital_signs(conn: &Connection) -> Result<Vec<VitalSigns>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_VITAL_SIGNS} ORDER BY v.recorded_at DESC, v.id DESC"
    ))?;
    let rows = stmt.query_map([], row_to_vital_signs)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// The `limit` most recent vital signs for one patient.
pub fn list_vital_signs_for_patient(
    conn: &Connection,
    patient_id: i64,
    limit: u32,
) -> Result<Vec<VitalSigns>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_VITAL_SIGNS} WHERE v.patient_id = ?1
         ORDER BY v.recorded_at DESC, v.id DESC LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![patient_id, limit], row_to_vital_signs)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_vital_signs(conn: &Connection, id: i64) -> Result<VitalSigns, DatabaseError> {
    conn.query_row(
        &format!("{SELECT_VITAL_SIGNS} WHERE v.id = ?1"),
        params![id],
        row_to_vital_signs,
    )
    .optional()?
    .ok_or_else(|| not_found(EntityKind::VitalSigns, id))
}

/// Replace a vital signs row. The referenced patient must exist; a `None`
/// `recorded_at` keeps the stored timestamp.
pub fn update_vital_signs(
    conn: &Connection,
    id: i64,
    fields: &VitalSignsFields,
) -> Result<usize, DatabaseError> {
    fields.validate()?;
    if !row_exists(conn, "vital_signs", id)? {
        return Ok(0);
    }
    ensure_patient_exists(conn, EntityKind::VitalSigns, fields.patient_id)?;
    let affected = conn.execute(
        "UPDATE vital_signs
         SET patient_id = ?1, blood_pressure = ?2, pulse = ?3, temperature = ?4,
             respiratory_rate = ?5, oxygen_saturation = ?6,
             recorded_at = COALESCE(?7, recorded_at)
         WHERE id = ?8",
        params![
            fields.patient_id,
            fields.blood_pressure,
            fields.pulse,
            fields.temperature,
            fields.respiratory_rate,
            fields.oxygen_saturation,
            fields.recorded_at.as_ref().map(format_timestamp),
            id,
        ],
    )?;
    Ok(affected)
}

pub fn delete_vital_signs(conn: &Connection, id: i64) -> Result<usize, DatabaseError> {
    let affected = conn.execute("DELETE FROM vital_signs WHERE id = ?1", params![id])?;
    Ok(affected)
}

fn row_to_vital_signs(row: &rusqlite::Row) -> Result<VitalSigns, rusqlite::Error> {
    let recorded_str: String = row.get(8)?;
    Ok(VitalSigns {
        id: row.get(0)?,
        patient_name: row.get(2)?,
        fields: VitalSignsFields {
            patient_id: row.get(1)?,
            blood_pressure: row.get(3)?,
            pulse: row.get(4)?,
            temperature: row.get(5)?,
            respiratory_rate: row.get(6)?,
            oxygen_saturation: row.get(7)?,
            recorded_at: Some(parse_timestamp(8, &recorded_str)?),
        },
    })
}

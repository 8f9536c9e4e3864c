use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{format_date, format_timestamp, not_found, now, parse_optional_date, parse_timestamp};
use crate::db::DatabaseError;
use crate::models::{EntityKind, Patient, PatientFields, Validate};

const SELECT_PATIENT: &str =
    "SELECT id, name, age, sex, contact, address, civil_status, date_of_birth,
            birthplace, primary_language, religion, occupation,
            usual_healthcare_provider, reason_for_health_contact, attending_physician,
            weight, height, created_at
     FROM patients";

/// Dependent tables cleared before the patient row, in this order.
const DEPENDENT_TABLES: [&str; 6] = [
    "vital_signs",
    "lab_results",
    "appointments",
    "medical_history",
    "allergies",
    "medications",
];

/// Insert a patient and return the assigned id.
pub fn insert_patient(conn: &Connection, fields: &PatientFields) -> Result<i64, DatabaseError> {
    fields.validate()?;
    conn.execute(
        "INSERT INTO patients (name, age, sex, contact, address, civil_status, date_of_birth,
         birthplace, primary_language, religion, occupation, usual_healthcare_provider,
         reason_for_health_contact, attending_physician, weight, height, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            fields.name,
            fields.age,
            fields.sex,
            fields.contact,
            fields.address,
            fields.civil_status,
            fields.date_of_birth.as_ref().map(format_date),
            fields.birthplace,
            fields.primary_language,
            fields.religion,
            fields.occupation,
            fields.usual_healthcare_provider,
            fields.reason_for_health_contact,
            fields.attending_physician,
            fields.weight,
            fields.height,
            format_timestamp(&now()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All patients, newest first.
pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_PATIENT} ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map([], row_to_patient)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Patient, DatabaseError> {
    conn.query_row(
        &format!("{SELECT_PATIENT} WHERE id = ?1"),
        params![id],
        row_to_patient,
    )
    .optional()?
    .ok_or_else(|| not_found(EntityKind::Patient, id))
}

/// Replace every mutable column. Returns the number of rows changed (0 or 1).
pub fn update_patient(
    conn: &Connection,
    id: i64,
    fields: &PatientFields,
) -> Result<usize, DatabaseError> {
    fields.validate()?;
    let affected = conn.execute(
        "UPDATE patients
         SET name = ?1, age = ?2, sex = ?3, contact = ?4, address = ?5,
             civil_status = ?6, date_of_birth = ?7, birthplace = ?8,
             primary_language = ?9, religion = ?10, occupation = ?11,
             usual_healthcare_provider = ?12, reason_for_health_contact = ?13,
             attending_physician = ?14, weight = ?15, height = ?16
         WHERE id = ?17",
        params![
            fields.name,
            fields.age,
            fields.sex,
            fields.contact,
            fields.address,
            fields.civil_status,
            fields.date_of_birth.as_ref().map(format_date),
            fields.birthplace,
            fields.primary_language,
            fields.religion,
            fields.occupation,
            fields.usual_healthcare_provider,
            fields.reason_for_health_contact,
            fields.attending_physician,
            fields.weight,
            fields.height,
            id,
        ],
    )?;
    Ok(affected)
}

/// Delete a patient together with every record that references it.
///
/// Runs as one transaction: the six dependent tables are cleared, then the
/// patient row. Any failure drops the transaction uncommitted, which rolls
/// the whole batch back. Returns the number of patient rows removed.
pub fn delete_patient(conn: &Connection, id: i64) -> Result<usize, DatabaseError> {
    let tx = conn.unchecked_transaction()?;

    let mut dependents = 0;
    for table in DEPENDENT_TABLES {
        dependents += tx.execute(
            &format!("DELETE FROM {table} WHERE patient_id = ?1"),
            params![id],
        )?;
    }

    let affected = tx.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    tx.commit()?;

    tracing::info!(patient_id = id, affected, dependents, "Patient deleted");
    Ok(affected)
}

fn row_to_patient(row: &Row) -> Result<Patient, rusqlite::Error> {
    let created_at: String = row.get(17)?;
    Ok(Patient {
        id: row.get(0)?,
        fields: PatientFields {
            name: row.get(1)?,
            age: row.get(2)?,
            sex: row.get(3)?,
            contact: row.get(4)?,
            address: row.get(5)?,
            civil_status: row.get(6)?,
            date_of_birth: parse_optional_date(7, row.get(7)?)?,
            birthplace: row.get(8)?,
            primary_language: row.get(9)?,
            religion: row.get(10)?,
            occupation: row.get(11)?,
            usual_healthcare_provider: row.get(12)?,
            reason_for_health_contact: row.get(13)?,
            attending_physician: row.get(14)?,
            weight: row.get(15)?,
            height: row.get(16)?,
        },
        created_at: parse_timestamp(17, &created_at)?,
    })
}

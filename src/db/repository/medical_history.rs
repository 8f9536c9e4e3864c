use rusqlite::{params, Connection, OptionalExtension};

use super::{ensure_patient_exists, format_timestamp, not_found, now, parse_timestamp, row_exists};
use crate::db::DatabaseError;
use crate::models::{EntityKind, MedicalHistoryEntry, MedicalHistoryFields, Validate};

const SELECT_MEDICAL_HISTORY: &str =
    "SELECT mh.id, mh.patient_id, p.name, mh.diagnosis, mh.chronic_condition,
            mh.procedure, mh.date_recorded
     FROM medical_history mh
     JOIN patients p ON mh.patient_id = p.id";

pub fn insert_medical_history(
    conn: &Connection,
    entry: &MedicalHistoryFields,
) -> Result<i64, DatabaseError> {
    entry.validate()?;
    ensure_patient_exists(conn, EntityKind::MedicalHistory, entry.patient_id)?;
    let date_recorded = entry.date_recorded.unwrap_or_else(now);
    conn.execute(
        "INSERT INTO medical_history (patient_id, diagnosis, chronic_condition, procedure, date_recorded)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            entry.patient_id,
            entry.diagnosis,
            entry.chronic_condition,
            entry.procedure,
            format_timestamp(&date_recorded),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_medical_history(conn: &Connection) -> Result<Vec<MedicalHistoryEntry>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_MEDICAL_HISTORY} ORDER BY mh.date_recorded DESC, mh.id DESC"
    ))?;
    let rows = stmt.query_map([], row_to_entry)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn list_medical_history_for_patient(
    conn: &Connection,
    patient_id: i64,
    limit: u32,
) -> Result<Vec<MedicalHistoryEntry>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_MEDICAL_HISTORY} WHERE mh.patient_id = ?1
         ORDER BY mh.date_recorded DESC, mh.id DESC LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![patient_id, limit], row_to_entry)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_medical_history(
    conn: &Connection,
    id: i64,
) -> Result<MedicalHistoryEntry, DatabaseError> {
    conn.query_row(
        &format!("{SELECT_MEDICAL_HISTORY} WHERE mh.id = ?1"),
        params![id],
        row_to_entry,
    )
    .optional()?
    .ok_or_else(|| not_found(EntityKind::MedicalHistory, id))
}

pub fn update_medical_history(
    conn: &Connection,
    id: i64,
    entry: &MedicalHistoryFields,
) -> Result<usize, DatabaseError> {
    entry.validate()?;
    if !row_exists(conn, "medical_history", id)? {
        return Ok(0);
    }
    ensure_patient_exists(conn, EntityKind::MedicalHistory, entry.patient_id)?;
    let affected = conn.execute(
        "UPDATE medical_history
         SET patient_id = ?1, diagnosis = ?2, chronic_condition = ?3, procedure = ?4,
             date_recorded = COALESCE(?5, date_recorded)
         WHERE id = ?6",
        params![
            entry.patient_id,
            entry.diagnosis,
            entry.chronic_condition,
            entry.procedure,
            entry.date_recorded.as_ref().map(format_timestamp),
            id,
        ],
    )?;
    Ok(affected)
}

pub fn delete_medical_history(conn: &Connection, id: i64) -> Result<usize, DatabaseError> {
    let affected = conn.execute("DELETE FROM medical_history WHERE id = ?1", params![id])?;
    Ok(affected)
}

fn row_to_entry(row: &rusqlite::Row) -> Result<MedicalHistoryEntry, rusqlite::Error> {
    let date_recorded: String = row.get(6)?;
    Ok(MedicalHistoryEntry {
        id: row.get(0)?,
        patient_name: row.get(2)?,
        fields: MedicalHistoryFields {
            patient_id: row.get(1)?,
            diagnosis: row.get(3)?,
            chronic_condition: row.get(4)?,
            procedure: row.get(5)?,
            date_recorded: Some(parse_timestamp(6, &date_recorded)?),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::*;

    fn asthma(patient_id: i64) -> MedicalHistoryFields {
        MedicalHistoryFields {
            patient_id,
            diagnosis: "Asthma".into(),
            chronic_condition: Some("Asthma".into()),
            procedure: None,
            date_recorded: Some(ts(2019, 9, 3, 11, 0)),
        }
    }

    #[test]
    fn insert_and_get_round_trip() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Jane Doe");
        let id = insert_medical_history(&conn, &asthma(patient_id)).unwrap();
        let entry = get_medical_history(&conn, id).unwrap();
        assert_eq!(entry.patient_name, "Jane Doe");
        assert_eq!(entry.fields, asthma(patient_id));
    }

    #[test]
    fn date_recorded_defaults_to_now() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Jane Doe");
        let before = now();
        let id = insert_medical_history(&conn, &MedicalHistoryFields {
            date_recorded: None,
            ..asthma(patient_id)
        })
        .unwrap();
        let recorded = get_medical_history(&conn, id).unwrap().fields.date_recorded.unwrap();
        assert!(recorded >= before);
    }

    #[test]
    fn insert_requires_diagnosis() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Jane Doe");
        let result = insert_medical_history(&conn, &MedicalHistoryFields {
            diagnosis: " ".into(),
            ..asthma(patient_id)
        });
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }

    #[test]
    fn update_clears_omitted_optional_fields() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Jane Doe");
        let id = insert_medical_history(&conn, &MedicalHistoryFields {
            procedure: Some("Spirometry".into()),
            ..asthma(patient_id)
        })
        .unwrap();

        assert_eq!(update_medical_history(&conn, id, &asthma(patient_id)).unwrap(), 1);
        let entry = get_medical_history(&conn, id).unwrap();
        assert_eq!(entry.fields, asthma(patient_id));
        assert!(entry.fields.procedure.is_none());
    }

    #[test]
    fn update_with_missing_patient_is_referential_error() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Jane Doe");
        let id = insert_medical_history(&conn, &asthma(patient_id)).unwrap();
        let result = update_medical_history(&conn, id, &asthma(patient_id + 1));
        assert!(matches!(result, Err(DatabaseError::Referential { .. })));
    }

    #[test]
    fn list_for_patient_is_newest_first() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Jane Doe");
        insert_medical_history(&conn, &asthma(patient_id)).unwrap();
        insert_medical_history(&conn, &MedicalHistoryFields {
            diagnosis: "Fractured wrist".into(),
            chronic_condition: None,
            procedure: Some("Cast".into()),
            date_recorded: Some(ts(2023, 2, 1, 9, 0)),
            patient_id,
        })
        .unwrap();

        let entries = list_medical_history_for_patient(&conn, patient_id, 5).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].fields.diagnosis, "Fractured wrist");
        assert_eq!(list_medical_history(&conn).unwrap().len(), 2);
    }

    #[test]
    fn delete_nonexistent_returns_zero() {
        let conn = test_db();
        assert_eq!(delete_medical_history(&conn, 3).unwrap(), 0);
    }

    #[test]
    fn update_nonexistent_returns_zero() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Jane Doe");
        assert_eq!(update_medical_history(&conn, 3, &asthma(patient_id)).unwrap(), 0);
        assert_eq!(update_medical_history(&conn, 3, &asthma(patient_id + 1)).unwrap(), 0);
    }
}

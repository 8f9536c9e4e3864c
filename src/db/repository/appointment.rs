use rusqlite::{params, Connection, OptionalExtension};

use super::{ensure_patient_exists, format_timestamp, not_found, parse_timestamp, row_exists};
use crate::db::DatabaseError;
use crate::models::{Appointment, AppointmentFields, AppointmentStatus, EntityKind, Validate};

const SELECT_APPOINTMENT: &str =
    "SELECT a.id, a.patient_id, p.name, a.appointment_date, a.reason, a.status,
            a.follow_up_instructions
     FROM appointments a
     JOIN patients p ON a.patient_id = p.id";

pub fn insert_appointment(
    conn: &Connection,
    appt: &AppointmentFields,
) -> Result<i64, DatabaseError> {
    appt.validate()?;
    ensure_patient_exists(conn, EntityKind::Appointment, appt.patient_id)?;
    conn.execute(
        "INSERT INTO appointments (patient_id, appointment_date, reason, status, follow_up_instructions)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            appt.patient_id,
            format_timestamp(&appt.appointment_date),
            appt.reason,
            appt.status.as_str(),
            appt.follow_up_instructions,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All appointments, latest appointment date first.
pub fn list_appointments(conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_APPOINTMENT} ORDER BY a.appointment_date DESC, a.id DESC"
    ))?;
    let rows = stmt.query_map([], row_to_appointment)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn list_appointments_for_patient(
    conn: &Connection,
    patient_id: i64,
    limit: u32,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_APPOINTMENT} WHERE a.patient_id = ?1
         ORDER BY a.appointment_date DESC, a.id DESC LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![patient_id, limit], row_to_appointment)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_appointment(conn: &Connection, id: i64) -> Result<Appointment, DatabaseError> {
    conn.query_row(
        &format!("{SELECT_APPOINTMENT} WHERE a.id = ?1"),
        params![id],
        row_to_appointment,
    )
    .optional()?
    .ok_or_else(|| not_found(EntityKind::Appointment, id))
}

pub fn update_appointment(
    conn: &Connection,
    id: i64,
    appt: &AppointmentFields,
) -> Result<usize, DatabaseError> {
    appt.validate()?;
    if !row_exists(conn, "appointments", id)? {
        return Ok(0);
    }
    ensure_patient_exists(conn, EntityKind::Appointment, appt.patient_id)?;
    let affected = conn.execute(
        "UPDATE appointments
         SET patient_id = ?1, appointment_date = ?2, reason = ?3,
             status = ?4, follow_up_instructions = ?5
         WHERE id = ?6",
        params![
            appt.patient_id,
            format_timestamp(&appt.appointment_date),
            appt.reason,
            appt.status.as_str(),
            appt.follow_up_instructions,
            id,
        ],
    )?;
    Ok(affected)
}

pub fn delete_appointment(conn: &Connection, id: i64) -> Result<usize, DatabaseError> {
    let affected = conn.execute("DELETE FROM appointments WHERE id = ?1", params![id])?;
    Ok(affected)
}

fn row_to_appointment(row: &rusqlite::Row) -> Result<Appointment, rusqlite::Error> {
    let date_str: String = row.get(3)?;
    let status_str: String = row.get(5)?;
    Ok(Appointment {
        id: row.get(0)?,
        patient_name: row.get(2)?,
        fields: AppointmentFields {
            patient_id: row.get(1)?,
            appointment_date: parse_timestamp(3, &date_str)?,
            reason: row.get(4)?,
            status: AppointmentStatus::parse(&status_str),
            follow_up_instructions: row.get(6)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::*;

    fn checkup(patient_id: i64) -> AppointmentFields {
        AppointmentFields {
            patient_id,
            appointment_date: ts(2024, 7, 15, 10, 30),
            reason: "Annual check-up".into(),
            status: AppointmentStatus::Scheduled,
            follow_up_instructions: None,
        }
    }

    #[test]
    fn list_is_empty_without_appointments() {
        let conn = test_db();
        let appointments = list_appointments(&conn).unwrap();
        assert!(appointments.is_empty());
    }

    #[test]
    fn insert_and_get_round_trip() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Jane Doe");
        let id = insert_appointment(&conn, &checkup(patient_id)).unwrap();
        let appt = get_appointment(&conn, id).unwrap();
        assert_eq!(appt.patient_name, "Jane Doe");
        assert_eq!(appt.fields, checkup(patient_id));
    }

    #[test]
    fn custom_status_label_is_preserved() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Jane Doe");
        let fields = AppointmentFields {
            status: AppointmentStatus::Other("no-show".into()),
            ..checkup(patient_id)
        };
        let id = insert_appointment(&conn, &fields).unwrap();
        assert_eq!(
            get_appointment(&conn, id).unwrap().fields.status,
            AppointmentStatus::Other("no-show".into())
        );
    }

    #[test]
    fn list_orders_by_appointment_date() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Jane Doe");
        let early = insert_appointment(&conn, &checkup(patient_id)).unwrap();
        let late = insert_appointment(&conn, &AppointmentFields {
            appointment_date: ts(2024, 9, 1, 9, 0),
            ..checkup(patient_id)
        })
        .unwrap();
        let ids: Vec<_> = list_appointments(&conn).unwrap().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![late, early]);
    }

    #[test]
    fn update_marks_completed_with_follow_up() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Jane Doe");
        let id = insert_appointment(&conn, &checkup(patient_id)).unwrap();
        let done = AppointmentFields {
            status: AppointmentStatus::Completed,
            follow_up_instructions: Some("Return in 6 months".into()),
            ..checkup(patient_id)
        };
        assert_eq!(update_appointment(&conn, id, &done).unwrap(), 1);
        assert_eq!(get_appointment(&conn, id).unwrap().fields, done);
    }

    #[test]
    fn update_with_missing_patient_is_referential_error() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Jane Doe");
        let id = insert_appointment(&conn, &checkup(patient_id)).unwrap();
        let result = update_appointment(&conn, id, &checkup(patient_id + 2));
        assert!(matches!(result, Err(DatabaseError::Referential { .. })));
    }

    #[test]
    fn update_nonexistent_returns_zero() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Jane Doe");
        assert_eq!(update_appointment(&conn, 999, &checkup(patient_id)).unwrap(), 0);
    }

    #[test]
    fn missing_row_wins_over_missing_patient() {
        let conn = test_db();
        assert_eq!(update_appointment(&conn, 999, &checkup(999)).unwrap(), 0);
    }

    #[test]
    fn status_label_round_trips_exactly() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Jane Doe");
        let id = insert_appointment(&conn, &AppointmentFields {
            status: AppointmentStatus::parse("Completed"),
            ..checkup(patient_id)
        })
        .unwrap();
        assert_eq!(get_appointment(&conn, id).unwrap().fields.status.as_str(), "Completed");
    }

    #[test]
    fn reason_is_required() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Jane Doe");
        let result = insert_appointment(&conn, &AppointmentFields {
            reason: String::new(),
            ..checkup(patient_id)
        });
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }

    #[test]
    fn delete_appointment_works() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Jane Doe");
        let id = insert_appointment(&conn, &checkup(patient_id)).unwrap();
        assert_eq!(delete_appointment(&conn, id).unwrap(), 1);
        assert_eq!(delete_appointment(&conn, id).unwrap(), 0);
    }
}

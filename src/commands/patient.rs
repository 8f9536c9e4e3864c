//! Patient commands. Deleting a patient removes every dependent record in
//! one transaction.

use super::{run, CommandError};
use crate::core_state::CoreState;
use crate::db;
use crate::models::{Patient, PatientFields};

/// Creates a patient and returns its id.
pub fn add_patient(fields: PatientFields, state: &CoreState) -> Result<i64, CommandError> {
    let id = run(state, |conn| db::insert_patient(conn, &fields))?;
    tracing::debug!(patient_id = id, "Patient added");
    Ok(id)
}

/// All patients, newest first.
pub fn get_patients(state: &CoreState) -> Result<Vec<Patient>, CommandError> {
    run(state, db::list_patients)
}

pub fn get_patient(id: i64, state: &CoreState) -> Result<Patient, CommandError> {
    run(state, |conn| db::get_patient(conn, id))
}

/// Full replace of the patient's profile. Returns rows changed (0 = no such patient).
pub fn update_patient(
    id: i64,
    fields: PatientFields,
    state: &CoreState,
) -> Result<usize, CommandError> {
    run(state, |conn| db::update_patient(conn, id, &fields))
}

pub fn delete_patient(id: i64, state: &CoreState) -> Result<usize, CommandError> {
    run(state, |conn| db::delete_patient(conn, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ErrorCode;

    #[test]
    fn add_then_get() {
        let state = CoreState::in_memory().unwrap();
        let id = add_patient(PatientFields {
            name: "Jane Doe".into(),
            age: Some(34),
            ..Default::default()
        }, &state)
        .unwrap();

        let patient = get_patient(id, &state).unwrap();
        assert_eq!(patient.fields.name, "Jane Doe");
        assert_eq!(get_patients(&state).unwrap().len(), 1);
    }

    #[test]
    fn blank_name_is_validation_error() {
        let state = CoreState::in_memory().unwrap();
        let err = add_patient(PatientFields::default(), &state).unwrap_err();
        assert_eq!(err.code, ErrorCode::Validation);
    }

    #[test]
    fn missing_patient_is_not_found() {
        let state = CoreState::in_memory().unwrap();
        let err = get_patient(8, &state).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn update_and_delete_report_affected_rows() {
        let state = CoreState::in_memory().unwrap();
        let fields = PatientFields {
            name: "Jane Doe".into(),
            ..Default::default()
        };
        let id = add_patient(fields.clone(), &state).unwrap();
        assert_eq!(update_patient(id, fields.clone(), &state).unwrap(), 1);
        assert_eq!(update_patient(id + 1, fields, &state).unwrap(), 0);
        assert_eq!(delete_patient(id, &state).unwrap(), 1);
        assert_eq!(delete_patient(id, &state).unwrap(), 0);
    }
}

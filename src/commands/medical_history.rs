use super::{run, CommandError};
use crate::config::SUMMARY_LIMIT;
use crate::core_state::CoreState;
use crate::db;
use crate::models::{MedicalHistoryEntry, MedicalHistoryFields};

pub fn add_medical_history(
    fields: MedicalHistoryFields,
    state: &CoreState,
) -> Result<i64, CommandError> {
    let id = run(state, |conn| db::insert_medical_history(conn, &fields))?;
    tracing::debug!(entry_id = id, patient_id = fields.patient_id, "Medical history added");
    Ok(id)
}

pub fn get_medical_history(state: &CoreState) -> Result<Vec<MedicalHistoryEntry>, CommandError> {
    run(state, db::list_medical_history)
}

pub fn get_medical_history_entry(
    id: i64,
    state: &CoreState,
) -> Result<MedicalHistoryEntry, CommandError> {
    run(state, |conn| db::get_medical_history(conn, id))
}

pub fn update_medical_history(
    id: i64,
    fields: MedicalHistoryFields,
    state: &CoreState,
) -> Result<usize, CommandError> {
    run(state, |conn| db::update_medical_history(conn, id, &fields))
}

pub fn delete_medical_history(id: i64, state: &CoreState) -> Result<usize, CommandError> {
    run(state, |conn| db::delete_medical_history(conn, id))
}

pub fn get_patient_history(
    patient_id: i64,
    state: &CoreState,
) -> Result<Vec<MedicalHistoryEntry>, CommandError> {
    run(state, |conn| db::list_medical_history_for_patient(conn, patient_id, SUMMARY_LIMIT))
}

//! Lab result commands.

use super::{run, CommandError};
use crate::config::SUMMARY_LIMIT;
use crate::core_state::CoreState;
use crate::db;
use crate::models::{LabResult, LabResultFields};

pub fn add_lab_result(fields: LabResultFields, state: &CoreState) -> Result<i64, CommandError> {
    let id = run(state, |conn| db::insert_lab_result(conn, &fields))?;
    tracing::debug!(
        lab_result_id = id,
        patient_id = fields.patient_id,
        abnormal = fields.is_abnormal,
        "Lab result added"
    );
    Ok(id)
}

/// All lab results, most recently recorded first.
pub fn get_lab_results(state: &CoreState) -> Result<Vec<LabResult>, CommandError> {
    run(state, db::list_lab_results)
}

pub fn get_lab_result(id: i64, state: &CoreState) -> Result<LabResult, CommandError> {
    run(state, |conn| db::get_lab_result(conn, id))
}

pub fn update_lab_result(
    id: i64,
    fields: LabResultFields,
    state: &CoreState,
) -> Result<usize, CommandError> {
    run(state, |conn| db::update_lab_result(conn, id, &fields))
}

pub fn delete_lab_result(id: i64, state: &CoreState) -> Result<usize, CommandError> {
    run(state, |conn| db::delete_lab_result(conn, id))
}

pub fn get_patient_labs(patient_id: i64, state: &CoreState) -> Result<Vec<LabResult>, CommandError> {
    run(state, |conn| db::list_lab_results_for_patient(conn, patient_id, SUMMARY_LIMIT))
}

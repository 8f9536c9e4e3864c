use super::{run, CommandError};
use crate::config::SUMMARY_LIMIT;
use crate::core_state::CoreState;
use crate::db;
use crate::models::{VitalSigns, VitalSignsFields};

pub fn add_vital_signs(fields: VitalSignsFields, state: &CoreState) -> Result<i64, CommandError> {
    let id = run(state, |conn| db::insert_vital_signs(conn, &fields))?;
    tracing::debug!(vital_signs_id = id, patient_id = fields.patient_id, "Vital signs recorded");
    Ok(id)
}

pub fn get_vital_signs(state: &CoreState) -> Result<Vec<VitalSigns>, CommandError> {
    run(state, db::list_vital_signs)
}

pub fn get_vital_signs_by_id(id: i64, state: &CoreState) -> Result<VitalSigns, CommandError> {
    run(state, |conn| db::get_vital_signs(conn, id))
}

pub fn update_vital_signs(
    id: i64,
    fields: VitalSignsFields,
    state: &CoreState,
) -> Result<usize, CommandError> {
    run(state, |conn| db::update_vital_signs(conn, id, &fields))
}

pub fn delete_vital_signs(id: i64, state: &CoreState) -> Result<usize, CommandError> {
    run(state, |conn| db::delete_vital_signs(conn, id))
}

pub fn get_patient_vitals(
    patient_id: i64,
    state: &CoreState,
) -> Result<Vec<VitalSigns>, CommandError> {
    run(state, |conn| db::list_vital_signs_for_patient(conn, patient_id, SUMMARY_LIMIT))
}

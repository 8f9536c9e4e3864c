use super::{run, CommandError};
use crate::config::SUMMARY_LIMIT;
use crate::core_state::CoreState;
use crate::db;
use crate::models::{Allergy, AllergyFields};

pub fn add_allergy(fields: AllergyFields, state: &CoreState) -> Result<i64, CommandError> {
    let id = run(state, |conn| db::insert_allergy(conn, &fields))?;
    tracing::debug!(allergy_id = id, patient_id = fields.patient_id, "Allergy added");
    Ok(id)
}

pub fn get_allergies(state: &CoreState) -> Result<Vec<Allergy>, CommandError> {
    run(state, db::list_allergies)
}

pub fn get_allergy(id: i64, state: &CoreState) -> Result<Allergy, CommandError> {
    run(state, |conn| db::get_allergy(conn, id))
}

pub fn update_allergy(
    id: i64,
    fields: AllergyFields,
    state: &CoreState,
) -> Result<usize, CommandError> {
    run(state, |conn| db::update_allergy(conn, id, &fields))
}

pub fn delete_allergy(id: i64, state: &CoreState) -> Result<usize, CommandError> {
    run(state, |conn| db::delete_allergy(conn, id))
}

pub fn get_patient_allergies(
    patient_id: i64,
    state: &CoreState,
) -> Result<Vec<Allergy>, CommandError> {
    run(state, |conn| db::list_allergies_for_patient(conn, patient_id, SUMMARY_LIMIT))
}

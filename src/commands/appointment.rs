//! Appointment commands.

use super::{run, CommandError};
use crate::config::SUMMARY_LIMIT;
use crate::core_state::CoreState;
use crate::db;
use crate::models::{Appointment, AppointmentFields};

/// Schedules an appointment for an existing patient.
pub fn add_appointment(fields: AppointmentFields, state: &CoreState) -> Result<i64, CommandError> {
    let id = run(state, |conn| db::insert_appointment(conn, &fields))?;
    tracing::debug!(
        appointment_id = id,
        patient_id = fields.patient_id,
        status = fields.status.as_str(),
        "Appointment added"
    );
    Ok(id)
}

/// All appointments, latest date first.
pub fn get_appointments(state: &CoreState) -> Result<Vec<Appointment>, CommandError> {
    run(state, db::list_appointments)
}

pub fn get_appointment(id: i64, state: &CoreState) -> Result<Appointment, CommandError> {
    run(state, |conn| db::get_appointment(conn, id))
}

pub fn update_appointment(
    id: i64,
    fields: AppointmentFields,
    state: &CoreState,
) -> Result<usize, CommandError> {
    run(state, |conn| db::update_appointment(conn, id, &fields))
}

pub fn delete_appointment(id: i64, state: &CoreState) -> Result<usize, CommandError> {
    run(state, |conn| db::delete_appointment(conn, id))
}

/// The patient's most recent appointments.
pub fn get_patient_appointments(
    patient_id: i64,
    state: &CoreState,
) -> Result<Vec<Appointment>, CommandError> {
    run(state, |conn| db::list_appointments_for_patient(conn, patient_id, SUMMARY_LIMIT))
}

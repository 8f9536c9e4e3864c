//! Medication commands.

use super::{run, CommandError};
use crate::config::SUMMARY_LIMIT;
use crate::core_state::CoreState;
use crate::db;
use crate::models::{Medication, MedicationFields};

pub fn add_medication(fields: MedicationFields, state: &CoreState) -> Result<i64, CommandError> {
    let id = run(state, |conn| db::insert_medication(conn, &fields))?;
    tracing::debug!(medication_id = id, patient_id = fields.patient_id, "Medication added");
    Ok(id)
}

/// All medications, latest start date first; undated rows last.
pub fn get_medications(state: &CoreState) -> Result<Vec<Medication>, CommandError> {
    run(state, db::list_medications)
}

pub fn get_medication(id: i64, state: &CoreState) -> Result<Medication, CommandError> {
    run(state, |conn| db::get_medication(conn, id))
}

pub fn update_medication(
    id: i64,
    fields: MedicationFields,
    state: &CoreState,
) -> Result<usize, CommandError> {
    run(state, |conn| db::update_medication(conn, id, &fields))
}

pub fn delete_medication(id: i64, state: &CoreState) -> Result<usize, CommandError> {
    run(state, |conn| db::delete_medication(conn, id))
}

pub fn get_patient_medications(
    patient_id: i64,
    state: &CoreState,
) -> Result<Vec<Medication>, CommandError> {
    run(state, |conn| db::list_medications_for_patient(conn, patient_id, SUMMARY_LIMIT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::patient::add_patient;
    use crate::models::PatientFields;
    use chrono::NaiveDate;

    #[test]
    fn undated_medication_lists_after_dated() {
        let state = CoreState::in_memory().unwrap();
        let patient_id = add_patient(PatientFields {
            name: "Jane Doe".into(),
            ..Default::default()
        }, &state)
        .unwrap();
        add_medication(MedicationFields {
            patient_id,
            drug_name: "Vitamin D".into(),
            ..Default::default()
        }, &state)
        .unwrap();
        add_medication(MedicationFields {
            patient_id,
            drug_name: "Metformin".into(),
            dosage: Some("500 mg".into()),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15),
            ..Default::default()
        }, &state)
        .unwrap();

        let names: Vec<_> = get_medications(&state)
            .unwrap()
            .into_iter()
            .map(|m| m.fields.drug_name)
            .collect();
        assert_eq!(names, vec!["Metformin", "Vitamin D"]);
    }
}

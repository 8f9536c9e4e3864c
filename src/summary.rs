//! Patient detail view: the patient plus the most recent records of each
//! dependent type.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{self, DatabaseError};
use crate::models::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSummary {
    pub patient: Patient,
    pub vital_signs: Vec<VitalSigns>,
    pub allergies: Vec<Allergy>,
    pub medications: Vec<Medication>,
    pub lab_results: Vec<LabResult>,
    pub medical_history: Vec<MedicalHistoryEntry>,
    pub appointments: Vec<Appointment>,
}

/// Build the summary for one patient, `limit` rows per dependent type.
pub fn get_patient_summary(
    conn: &Connection,
    patient_id: i64,
    limit: u32,
) -> Result<PatientSummary, DatabaseError> {
    let patient = db::get_patient(conn, patient_id)?;
    Ok(PatientSummary {
        patient,
        vital_signs: db::list_vital_signs_for_patient(conn, patient_id, limit)?,
        allergies: db::list_allergies_for_patient(conn, patient_id, limit)?,
        medications: db::list_medications_for_patient(conn, patient_id, limit)?,
        lab_results: db::list_lab_results_for_patient(conn, patient_id, limit)?,
        medical_history: db::list_medical_history_for_patient(conn, patient_id, limit)?,
        appointments: db::list_appointments_for_patient(conn, patient_id, limit)?,
    })
}

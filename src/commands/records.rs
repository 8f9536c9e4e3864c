//! Cross-entity views: the patient summary and list search.

use serde::Deserialize;

use super::{run, CommandError};
use crate::config::SUMMARY_LIMIT;
use crate::core_state::CoreState;
use crate::db;
use crate::models::EntityKind;
use crate::search::{filter, SearchResults};
use crate::summary::{self, PatientSummary};

pub fn get_patient_summary(
    patient_id: i64,
    state: &CoreState,
) -> Result<PatientSummary, CommandError> {
    run(state, |conn| summary::get_patient_summary(conn, patient_id, SUMMARY_LIMIT))
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub entity: EntityKind,
    #[serde(default)]
    pub term: String,
}

/// List every record of `query.entity` and keep those matching `query.term`.
pub fn search(query: SearchQuery, state: &CoreState) -> Result<SearchResults, CommandError> {
    let term = query.term.as_str();
    let results = run(state, |conn| {
        Ok(match query.entity {
            EntityKind::Patient => SearchResults::Patients(filter(&db::list_patients(conn)?, term)),
            EntityKind::MedicalHistory => {
                SearchResults::MedicalHistory(filter(&db::list_medical_history(conn)?, term))
            }
            EntityKind::Allergy => SearchResults::Allergies(filter(&db::list_allergies(conn)?, term)),
            EntityKind::Medication => {
                SearchResults::Medications(filter(&db::list_medications(conn)?, term))
            }
            EntityKind::VitalSigns => {
                SearchResults::VitalSigns(filter(&db::list_vital_signs(conn)?, term))
            }
            EntityKind::LabResult => {
                SearchResults::LabResults(filter(&db::list_lab_results(conn)?, term))
            }
            EntityKind::Appointment => {
                SearchResults::Appointments(filter(&db::list_appointments(conn)?, term))
            }
        })
    })?;
    tracing::debug!(entity = %query.entity, hits = results.len(), "Search complete");
    Ok(results)
}

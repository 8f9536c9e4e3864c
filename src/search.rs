//! Free-text filtering over already-listed records.
//!
//! A derived view only: callers list from the store, then narrow the result
//! here. Matching is a case-insensitive substring test over the fields a
//! user would type into a list's search box.

use serde::Serialize;

use crate::models::*;

pub trait Searchable {
    /// Text fields inspected by [`filter`].
    fn search_fields(&self) -> Vec<&str>;

    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.search_fields()
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Keep the records matching `term`. A blank term keeps everything.
pub fn filter<T: Searchable + Clone>(records: &[T], term: &str) -> Vec<T> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| record.matches(&needle))
        .cloned()
        .collect()
}

/// Filter result tagged by entity so one channel can serve every list.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SearchResults {
    Patients(Vec<Patient>),
    MedicalHistory(Vec<MedicalHistoryEntry>),
    Allergies(Vec<Allergy>),
    Medications(Vec<Medication>),
    VitalSigns(Vec<VitalSigns>),
    LabResults(Vec<LabResult>),
    Appointments(Vec<Appointment>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            Self::Patients(v) => v.len(),
            Self::MedicalHistory(v) => v.len(),
            Self::Allergies(v) => v.len(),
            Self::Medications(v) => v.len(),
            Self::VitalSigns(v) => v.len(),
            Self::LabResults(v) => v.len(),
            Self::Appointments(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Searchable for Patient {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.fields.name.as_str()];
        fields.extend(self.fields.contact.as_deref());
        fields
    }
}

impl Searchable for Appointment {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.patient_name.as_str(), self.fields.reason.as_str()]
    }
}

impl Searchable for VitalSigns {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.patient_name.as_str()]
    }
}

impl Searchable for LabResult {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.patient_name.as_str(), self.fields.test_name.as_str()]
    }
}

impl Searchable for MedicalHistoryEntry {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.patient_name.as_str(), self.fields.diagnosis.as_str()];
        fields.extend(self.fields.chronic_condition.as_deref());
        fields.extend(self.fields.procedure.as_deref());
        fields
    }
}

impl Searchable for Allergy {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.patient_name.as_str(),
            self.fields.allergy_type.as_str(),
            self.fields.description.as_str(),
            self.fields.severity.as_str(),
        ]
    }
}

impl Searchable for Medication {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.patient_name.as_str(), self.fields.drug_name.as_str()]
    }
}

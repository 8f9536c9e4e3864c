use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{require, Validate};
use crate::db::DatabaseError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicationFields {
    pub patient_id: i64,
    pub drug_name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: i64,
    pub patient_name: String,
    #[serde(flatten)]
    pub fields: MedicationFields,
}

impl Validate for MedicationFields {
    fn validate(&self) -> Result<(), DatabaseError> {
        require("drug_name", &self.drug_name)
    }
}


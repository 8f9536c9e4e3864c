use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{require, Validate};
use crate::db::DatabaseError;

/// Demographic and administrative profile of a patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientFields {
    pub name: String,
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub civil_status: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub birthplace: Option<String>,
    pub primary_language: Option<String>,
    pub religion: Option<String>,
    pub occupation: Option<String>,
    pub usual_healthcare_provider: Option<String>,
    pub reason_for_health_contact: Option<String>,
    pub attending_physician: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    #[serde(flatten)]
    pub fields: PatientFields,
    pub created_at: NaiveDateTime,
}

impl Validate for PatientFields {
    fn validate(&self) -> Result<(), DatabaseError> {
        require("name", &self.name)
    }
}

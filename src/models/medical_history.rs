use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{require, Validate};
use crate::db::DatabaseError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicalHistoryFields {
    pub patient_id: i64,
    pub diagnosis: String,
    pub chronic_condition: Option<String>,
    pub procedure: Option<String>,
    /// Defaults to the insert time when absent.
    #[serde(
        default,
        deserialize_with = "super::timestamp::deserialize_flexible_optional_timestamp"
    )]
    pub date_recorded: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalHistoryEntry {
    pub id: i64,
    pub patient_name: String,
    #[serde(flatten)]
    pub fields: MedicalHistoryFields,
}

impl Validate for MedicalHistoryFields {
    fn validate(&self) -> Result<(), DatabaseError> {
        require("diagnosis", &self.diagnosis)
    }
}


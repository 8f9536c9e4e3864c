use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{require, Validate};
use crate::db::DatabaseError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabResultFields {
    pub patient_id: i64,
    pub test_name: String,
    /// Free-text result value; labs report both numbers and phrases.
    pub result: Option<String>,
    pub unit: Option<String>,
    pub reference_range: Option<String>,
    #[serde(default)]
    pub is_abnormal: bool,
    /// Defaults to the insert time when absent.
    #[serde(
        default,
        deserialize_with = "super::timestamp::deserialize_flexible_optional_timestamp"
    )]
    pub recorded_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    pub id: i64,
    pub patient_name: String,
    #[serde(flatten)]
    pub fields: LabResultFields,
}

impl Validate for LabResultFields {
    fn validate(&self) -> Result<(), DatabaseError> {
        require("test_name", &self.test_name)
    }
}


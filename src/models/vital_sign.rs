use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Validate;
use crate::db::DatabaseError;

/// One set of bedside measurements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalSignsFields {
    pub patient_id: i64,
    /// Systolic/diastolic as entered, e.g. "120/80".
    pub blood_pressure: Option<String>,
    pub pulse: Option<u32>,
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    pub respiratory_rate: Option<u32>,
    /// SpO2 percentage.
    pub oxygen_saturation: Option<u32>,
    /// Defaults to the insert time when absent.
    #[serde(
        default,
        deserialize_with = "super::timestamp::deserialize_flexible_optional_timestamp"
    )]
    pub recorded_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    pub id: i64,
    pub patient_name: String,
    #[serde(flatten)]
    pub fields: VitalSignsFields,
}

impl Validate for VitalSignsFields {
    // Every measurement is optional; a row may record any subset.
    fn validate(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}


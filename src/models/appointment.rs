use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::AppointmentStatus;
use super::{require, Validate};
use crate::db::DatabaseError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentFields {
    pub patient_id: i64,
    #[serde(deserialize_with = "super::timestamp::deserialize_flexible_timestamp")]
    pub appointment_date: NaiveDateTime,
    pub reason: String,
    pub status: AppointmentStatus,
    pub follow_up_instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_name: String,
    #[serde(flatten)]
    pub fields: AppointmentFields,
}

impl Validate for AppointmentFields {
    fn validate(&self) -> Result<(), DatabaseError> {
        require("reason", &self.reason)?;
        require("status", self.status.as_str())
    }
}


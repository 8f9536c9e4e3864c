use serde::{Deserialize, Serialize};

use super::{require, Validate};
use crate::db::DatabaseError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllergyFields {
    pub patient_id: i64,
    pub allergy_type: String,
    pub description: String,
    pub severity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allergy {
    pub id: i64,
    pub patient_name: String,
    #[serde(flatten)]
    pub fields: AllergyFields,
}

impl Validate for AllergyFields {
    fn validate(&self) -> Result<(), DatabaseError> {
        require("allergy_type", &self.allergy_type)?;
        require("description", &self.description)?;
        require("severity", &self.severity)
    }
}


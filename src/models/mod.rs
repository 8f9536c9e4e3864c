//! Typed records for the seven EMR entities.
//!
//! Each entity has a `*Fields` struct holding everything the caller supplies
//! on create/update, and a record struct returned by reads that adds the
//! surrogate id and, for patient-scoped entities, the owning patient's name.

pub mod allergy;
pub mod appointment;
pub mod enums;
pub mod lab;
pub mod medical_history;
pub mod medication;
pub mod patient;
pub mod timestamp;
pub mod vital_sign;

pub use allergy::*;
pub use appointment::*;
pub use enums::*;
pub use lab::*;
pub use medical_history::*;
pub use medication::*;
pub use patient::*;
pub use vital_sign::*;

use crate::db::DatabaseError;

/// Required-field check run before any write.
pub trait Validate {
    fn validate(&self) -> Result<(), DatabaseError>;
}

fn require(field: &str, value: &str) -> Result<(), DatabaseError> {
    if value.trim().is_empty() {
        return Err(DatabaseError::Validation(format!("{field} is required")));
    }
    Ok(())
}

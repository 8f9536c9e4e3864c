//! Request/response commands exposed to the presentation layer.
//!
//! One function per operation. Each acquires the store through `CoreState`,
//! runs a single repository call and maps failures to [`CommandError`], the
//! serializable form a front end can show to the user.

pub mod allergy;
pub mod appointment;
pub mod lab_result;
pub mod medical_history;
pub mod medication;
pub mod patient;
pub mod records;
pub mod vital_signs;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::core_state::{CoreError, CoreState};
use crate::db::DatabaseError;

/// Health check command: verifies the backend is running.
pub fn health_check() -> String {
    tracing::debug!("Health check called");
    "ok".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Validation,
    NotFound,
    Referential,
    Storage,
    BadRequest,
    Internal,
}

/// Structured error returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct CommandError {
    pub code: ErrorCode,
    pub message: String,
}

impl CommandError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        let code = match &err {
            CoreError::Database(DatabaseError::Validation(_)) => ErrorCode::Validation,
            CoreError::Database(DatabaseError::NotFound { .. }) => ErrorCode::NotFound,
            CoreError::Database(DatabaseError::Referential { .. }) => ErrorCode::Referential,
            CoreError::Database(_) => ErrorCode::Storage,
            CoreError::LockPoisoned | CoreError::DataDir(_) => ErrorCode::Internal,
        };
        match code {
            ErrorCode::Storage | ErrorCode::Internal => {
                tracing::error!(error = %message, "Command failed")
            }
            _ => tracing::debug!(error = %message, "Command rejected"),
        }
        Self { code, message }
    }
}

impl From<DatabaseError> for CommandError {
    fn from(err: DatabaseError) -> Self {
        CoreError::Database(err).into()
    }
}

/// Run one repository operation against the store.
pub(crate) fn run<T>(
    state: &CoreState,
    op: impl FnOnce(&Connection) -> Result<T, DatabaseError>,
) -> Result<T, CommandError> {
    state.with_db(op).map_err(CommandError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_returns_ok() {
        assert_eq!(health_check(), "ok");
    }

    #[test]
    fn database_errors_map_to_codes() {
        let cases = [
            (DatabaseError::Validation("name is required".into()), ErrorCode::Validation),
            (
                DatabaseError::NotFound { entity_type: "patient".into(), id: "1".into() },
                ErrorCode::NotFound,
            ),
            (
                DatabaseError::Referential { entity_type: "vital_signs".into(), patient_id: 1 },
                ErrorCode::Referential,
            ),
            (
                DatabaseError::Sqlite(rusqlite::Error::InvalidQuery),
                ErrorCode::Storage,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(CommandError::from(err).code, expected);
        }
    }

    #[test]
    fn lock_poisoning_is_internal() {
        assert_eq!(CommandError::from(CoreError::LockPoisoned).code, ErrorCode::Internal);
    }

    #[test]
    fn error_serializes_with_screaming_code() {
        let json = serde_json::to_value(CommandError::bad_request("Unknown channel")).unwrap();
        assert_eq!(json["code"], "BAD_REQUEST");
        assert_eq!(json["message"], "Unknown channel");
    }
}

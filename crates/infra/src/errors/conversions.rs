//! Conversions from external infrastructure errors into domain errors.
//!
//! `InfraError` is also the error type recovery-wrapped infrastructure
//! operations return: it reports a structured [`ErrorCategory`] taken from
//! the domain variant, so the recovery engine never has to guess from text.

use std::fmt;
use std::io::{Error as IoError, ErrorKind};

use recipebox_common::recovery::{CategorizedError, ErrorCategory, RecoveryError};
use recipebox_domain::RecipeBoxError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfraError(pub RecipeBoxError);

impl From<InfraError> for RecipeBoxError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<RecipeBoxError> for InfraError {
    fn from(value: RecipeBoxError) -> Self {
        InfraError(value)
    }
}

impl fmt::Display for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl CategorizedError for InfraError {
    fn category(&self) -> Option<ErrorCategory> {
        let category = match &self.0 {
            RecipeBoxError::Database(_) | RecipeBoxError::Storage(_) => {
                ErrorCategory::StorageFailure
            }
            RecipeBoxError::Network(_) => ErrorCategory::NetworkFailure,
            RecipeBoxError::PermissionDenied(_) => ErrorCategory::PermissionDenied,
            RecipeBoxError::Validation(_) | RecipeBoxError::Config(_) => {
                ErrorCategory::ValidationFailure
            }
            RecipeBoxError::Busy(_) => ErrorCategory::TransientFailure,
            RecipeBoxError::NotFound(_) | RecipeBoxError::Internal(_) => ErrorCategory::Unknown,
        };
        Some(category)
    }

    fn is_critical(&self) -> bool {
        matches!(self.0, RecipeBoxError::Internal(_))
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoRecipeBoxError {
    fn into_recipebox(self) -> RecipeBoxError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → RecipeBoxError */
/* -------------------------------------------------------------------------- */

impl IntoRecipeBoxError for SqlError {
    fn into_recipebox(self) -> RecipeBoxError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => RecipeBoxError::Busy("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        RecipeBoxError::Busy("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        RecipeBoxError::Validation("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        RecipeBoxError::Validation("foreign key constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, _) => {
                        RecipeBoxError::Validation(format!("constraint violation: {message}"))
                    }
                    (ErrorCode::PermissionDenied | ErrorCode::ReadOnly, _) => {
                        RecipeBoxError::PermissionDenied(format!(
                            "database is not writable: {message}"
                        ))
                    }
                    (ErrorCode::DiskFull, _) => {
                        RecipeBoxError::Storage("disk full while writing database".into())
                    }
                    (ErrorCode::CannotOpen | ErrorCode::SystemIoFailure, _) => {
                        RecipeBoxError::Storage(format!("database file unavailable: {message}"))
                    }
                    (ErrorCode::DatabaseCorrupt | ErrorCode::NotADatabase, _) => {
                        RecipeBoxError::Internal(format!("database file is corrupted: {message}"))
                    }
                    _ => RecipeBoxError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => RecipeBoxError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                RecipeBoxError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                RecipeBoxError::Database(format!("invalid column type: {ty}"))
            }
            RE::InvalidParameterName(parameter_name) => {
                RecipeBoxError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => RecipeBoxError::Storage(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => RecipeBoxError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_recipebox())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → RecipeBoxError */
/* -------------------------------------------------------------------------- */

impl IntoRecipeBoxError for IoError {
    fn into_recipebox(self) -> RecipeBoxError {
        let message = self.to_string();

        match self.kind() {
            ErrorKind::PermissionDenied => RecipeBoxError::PermissionDenied(message),
            ErrorKind::NotFound => RecipeBoxError::NotFound(message),
            ErrorKind::TimedOut
            | ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected => RecipeBoxError::Network(message),
            ErrorKind::WouldBlock | ErrorKind::Interrupted => RecipeBoxError::Busy(message),
            ErrorKind::InvalidData | ErrorKind::InvalidInput => RecipeBoxError::Validation(message),
            _ => RecipeBoxError::Storage(message),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_recipebox())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → RecipeBoxError */
/* -------------------------------------------------------------------------- */

impl IntoRecipeBoxError for HttpError {
    fn into_recipebox(self) -> RecipeBoxError {
        if self.is_timeout() {
            return RecipeBoxError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return RecipeBoxError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => RecipeBoxError::PermissionDenied(message),
                404 => RecipeBoxError::NotFound(message),
                408 | 429 => RecipeBoxError::Busy(message),
                400..=499 => RecipeBoxError::Validation(message),
                _ => RecipeBoxError::Network(message),
            };
        }

        if self.is_builder() {
            return RecipeBoxError::Config(format!("invalid HTTP request: {self}"));
        }

        RecipeBoxError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_recipebox())
    }
}

/* -------------------------------------------------------------------------- */
/* RecoveryError → RecipeBoxError */
/* -------------------------------------------------------------------------- */

impl From<RecoveryError> for InfraError {
    fn from(value: RecoveryError) -> Self {
        InfraError(RecipeBoxError::Config(value.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

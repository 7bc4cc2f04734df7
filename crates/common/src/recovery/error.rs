// Error types for the recovery module
use thiserror::Error;

use crate::error::{CommonError, ErrorSeverity};
use crate::impl_error_classification;

/// Errors raised while building recovery inputs (configs, presets, kinds).
///
/// Failures of the wrapped operations never surface as `RecoveryError`; they
/// end up in a [`RecoveryResult`](super::RecoveryResult).
#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("Invalid retry configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Unknown retry preset '{0}' (expected quick, standard or persistent)")]
    UnknownPreset(String),

    #[error("Unknown operation kind '{0}'")]
    UnknownOperationKind(String),
}

impl RecoveryError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }
}

impl_error_classification!(RecoveryError, Common,
    Self::InvalidConfig { .. } | Self::UnknownPreset(_) | Self::UnknownOperationKind(_) => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    }
);

/// Result type for recovery configuration operations
pub type RecoveryConfigResult<T> = Result<T, RecoveryError>;

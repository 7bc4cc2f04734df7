//! Closed vocabularies shared by every recovery component.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::RecoveryError;

/// Coarse kind of the wrapped operation. Used as the tiebreaker when a
/// failure cannot be categorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Save,
    Load,
    Delete,
    Upload,
    Download,
    Validation,
}

impl OperationKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 6] =
        [Self::Save, Self::Load, Self::Delete, Self::Upload, Self::Download, Self::Validation];

    /// Lower-case name used in operation ids, config keys and log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Load => "load",
            Self::Delete => "delete",
            Self::Upload => "upload",
            Self::Download => "download",
            Self::Validation => "validation",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = RecoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| RecoveryError::UnknownOperationKind(s.to_string()))
    }
}

/// Category of a failure, derived from the error on every attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    PermissionDenied,
    ValidationFailure,
    NetworkFailure,
    StorageFailure,
    TransientFailure,
    Unknown,
}

impl ErrorCategory {
    /// Permission and validation failures never improve on retry.
    pub const fn is_retryable(self) -> bool {
        !matches!(self, Self::PermissionDenied | Self::ValidationFailure)
    }

    /// Snake-case label for log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::ValidationFailure => "validation_failure",
            Self::NetworkFailure => "network_failure",
            Self::StorageFailure => "storage_failure",
            Self::TransientFailure => "transient_failure",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the orchestrator does after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStrategy {
    /// Try again immediately.
    Retry,
    /// Try again after the configured backoff delay.
    RetryWithDelay,
    /// Try again after an exponentially growing delay.
    RetryWithExponentialBackoff,
    /// Stop retrying the primary operation and run the fallback.
    Fallback,
    /// Stop and hand the failure to the user.
    UserIntervention,
    /// Stop without a fallback; the failure is not recoverable.
    Abort,
}

impl RecoveryStrategy {
    /// Whether the strategy asks for another primary attempt.
    pub const fn is_retry(self) -> bool {
        matches!(self, Self::Retry | Self::RetryWithDelay | Self::RetryWithExponentialBackoff)
    }

    /// Snake-case label for log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Retry => "retry",
            Self::RetryWithDelay => "retry_with_delay",
            Self::RetryWithExponentialBackoff => "retry_with_exponential_backoff",
            Self::Fallback => "fallback",
            Self::UserIntervention => "user_intervention",
            Self::Abort => "abort",
        }
    }
}

impl fmt::Display for RecoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical identity of one unit of work, e.g. `save_recipe_42`.
///
/// Concurrent executions must not share an id; their attempt counts would
/// interleave in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(String);

impl OperationId {
    /// `<kind>_<entity>_<id>`, the stable form used for retries of the same
    /// record.
    pub fn new(kind: OperationKind, entity: &str, id: impl fmt::Display) -> Self {
        Self(format!("{kind}_{entity}_{id}"))
    }

    /// `<kind>_<entity>_<uuid v7>`, for work without a natural identity
    /// (a recipe that has not been inserted yet, a bulk import).
    pub fn unique(kind: OperationKind, entity: &str) -> Self {
        Self::new(kind, entity, uuid::Uuid::now_v7())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OperationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OperationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for OperationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

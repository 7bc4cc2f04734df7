//! Failure classification.
//!
//! Categories come from the error itself whenever the producing collaborator
//! tags it (see [`CategorizedError::category`]). Free-text keyword matching
//! only covers errors that carry no tag, and it keeps a strict priority order
//! so that a non-retryable category is never hidden behind a retryable-sounding
//! word: `"invalid payload after timeout"` is a validation failure.

use std::error::Error as StdError;
use std::fmt::Display;
use std::io;

use super::types::ErrorCategory;
use crate::error::{CommonError, ErrorClassification};

/// Keyword table in priority order; the first matching row wins.
const KEYWORDS: &[(ErrorCategory, &[&str])] = &[
    (ErrorCategory::PermissionDenied, &["permission denied", "unauthorized", "forbidden"]),
    (ErrorCategory::ValidationFailure, &["validation", "invalid", "format"]),
    (ErrorCategory::NetworkFailure, &["network", "connection", "timeout", "unreachable"]),
    (ErrorCategory::StorageFailure, &["storage", "database", "file", "disk"]),
    (ErrorCategory::TransientFailure, &["busy", "locked", "temporary"]),
];

/// An error the recovery engine can reason about.
///
/// Implementors that know what went wrong return a category from
/// [`category`](Self::category); the default falls back to keyword matching
/// over the `Display` output.
pub trait CategorizedError: Display {
    /// Structured category, if the error carries one.
    fn category(&self) -> Option<ErrorCategory> {
        None
    }

    /// Critical errors abort the execution without retry or fallback.
    fn is_critical(&self) -> bool {
        false
    }
}

/// Maps failures onto [`ErrorCategory`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Structured category first, keyword matching second.
    pub fn classify<E>(error: &E) -> ErrorCategory
    where
        E: CategorizedError + ?Sized,
    {
        error.category().unwrap_or_else(|| Self::classify_message(&error.to_string()))
    }

    /// Keyword classification of a raw failure description.
    pub fn classify_message(raw: &str) -> ErrorCategory {
        let normalized = raw.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| normalized.contains(keyword)))
            .map_or(ErrorCategory::Unknown, |(category, _)| *category)
    }
}

impl CategorizedError for CommonError {
    fn category(&self) -> Option<ErrorCategory> {
        let category = match self {
            Self::Unauthorized { .. } => ErrorCategory::PermissionDenied,
            Self::Validation { .. } | Self::Config { .. } | Self::Serialization { .. } => {
                ErrorCategory::ValidationFailure
            }
            Self::Backend { .. } | Self::Timeout { .. } => ErrorCategory::NetworkFailure,
            Self::Storage { .. } | Self::Persistence { .. } => ErrorCategory::StorageFailure,
            Self::Busy { .. } | Self::Lock { .. } => ErrorCategory::TransientFailure,
            Self::NotFound { .. } | Self::Internal { .. } | Self::Cancelled { .. } => {
                ErrorCategory::Unknown
            }
        };
        Some(category)
    }

    fn is_critical(&self) -> bool {
        ErrorClassification::is_critical(self)
    }
}

impl CategorizedError for io::Error {
    fn category(&self) -> Option<ErrorCategory> {
        use io::ErrorKind as K;

        match self.kind() {
            K::PermissionDenied => Some(ErrorCategory::PermissionDenied),
            K::InvalidInput | K::InvalidData => Some(ErrorCategory::ValidationFailure),
            K::ConnectionRefused
            | K::ConnectionReset
            | K::ConnectionAborted
            | K::NotConnected
            | K::AddrNotAvailable
            | K::BrokenPipe
            | K::TimedOut => Some(ErrorCategory::NetworkFailure),
            K::NotFound | K::AlreadyExists | K::WriteZero | K::UnexpectedEof => {
                Some(ErrorCategory::StorageFailure)
            }
            K::WouldBlock | K::Interrupted => Some(ErrorCategory::TransientFailure),
            _ => None,
        }
    }
}

impl CategorizedError for String {}

impl CategorizedError for &str {}

impl CategorizedError for Box<dyn StdError + Send + Sync> {}

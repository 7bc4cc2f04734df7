//! Outcome of a recovery-wrapped execution.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use super::types::{ErrorCategory, RecoveryStrategy};
use crate::utils::serde::duration_millis;

/// Structured outcome handed back to the caller for rendering.
///
/// `data` is present exactly when the execution succeeded; `error` and
/// `next_strategy` only ever appear on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryResult<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_strategy: Option<RecoveryStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<ErrorCategory>,
    attempts: u32,
    #[serde(with = "duration_millis")]
    total_delay: Duration,
    used_fallback: bool,
}

impl<T> RecoveryResult<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            suggestions: Vec::new(),
            next_strategy: None,
            category: None,
            attempts: 0,
            total_delay: Duration::ZERO,
            used_fallback: false,
        }
    }

    pub fn failure(
        error: impl Into<String>,
        suggestions: Vec<String>,
        next_strategy: Option<RecoveryStrategy>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            suggestions,
            next_strategy,
            category: None,
            attempts: 0,
            total_delay: Duration::ZERO,
            used_fallback: false,
        }
    }

    pub(crate) fn with_attempts(mut self, attempts: u32, total_delay: Duration) -> Self {
        self.attempts = attempts;
        self.total_delay = total_delay;
        self
    }

    pub(crate) fn with_category(mut self, category: ErrorCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub(crate) fn via_fallback(mut self) -> Self {
        self.used_fallback = true;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// What the caller should offer next; `None` after success or abort.
    pub fn next_strategy(&self) -> Option<RecoveryStrategy> {
        self.next_strategy
    }

    /// Category of the last primary failure, if any attempt failed.
    pub fn category(&self) -> Option<ErrorCategory> {
        self.category
    }

    /// Primary operation invocations made.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Time spent waiting between attempts.
    pub fn total_delay(&self) -> Duration {
        self.total_delay
    }

    /// Whether the fallback produced the outcome.
    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    /// Convert into a plain `Result`, keeping the failure details.
    ///
    /// # Errors
    /// Returns [`RecoveryFailure`] when the execution failed.
    pub fn into_result(self) -> Result<T, RecoveryFailure> {
        match self.data {
            Some(data) if self.success => Ok(data),
            _ => Err(RecoveryFailure {
                message: self.error.unwrap_or_default(),
                suggestions: self.suggestions,
                next_strategy: self.next_strategy,
                category: self.category,
                attempts: self.attempts,
            }),
        }
    }

    /// Transform the payload, keeping every other field.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RecoveryResult<U> {
        RecoveryResult {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            suggestions: self.suggestions,
            next_strategy: self.next_strategy,
            category: self.category,
            attempts: self.attempts,
            total_delay: self.total_delay,
            used_fallback: self.used_fallback,
        }
    }
}

/// Failure half of [`RecoveryResult::into_result`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RecoveryFailure {
    pub message: String,
    pub suggestions: Vec<String>,
    pub next_strategy: Option<RecoveryStrategy>,
    pub category: Option<ErrorCategory>,
    pub attempts: u32,
}

impl RecoveryFailure {
    /// Whether the caller should offer a manual retry.
    pub fn needs_user(&self) -> bool {
        self.next_strategy == Some(RecoveryStrategy::UserIntervention)
    }
}

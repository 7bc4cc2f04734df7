//! Structured log events for recovery executions.
//!
//! Every event carries `operation_id` and `kind`; per-attempt events add
//! `attempt`, `category`, `strategy` and `delay_ms` where they apply.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::types::{ErrorCategory, OperationKind, RecoveryStrategy};

/// Emits the log events of one execution.
pub struct RecoverySpan<'a> {
    operation_id: &'a str,
    kind: OperationKind,
    max_attempts: u32,
}

impl<'a> RecoverySpan<'a> {
    pub fn start(operation_id: &'a str, kind: OperationKind, max_attempts: u32) -> Self {
        debug!(operation_id, %kind, max_attempts, "Starting recoverable operation");
        Self { operation_id, kind, max_attempts }
    }

    pub fn record_attempt(&self, attempt: u32) {
        debug!(
            operation_id = self.operation_id,
            kind = %self.kind,
            attempt,
            "Attempting operation"
        );
    }

    pub fn record_failure(
        &self,
        attempt: u32,
        category: ErrorCategory,
        strategy: RecoveryStrategy,
        error: &str,
    ) {
        warn!(
            operation_id = self.operation_id,
            kind = %self.kind,
            attempt,
            max_attempts = self.max_attempts,
            %category,
            %strategy,
            error,
            "Operation attempt failed"
        );
    }

    pub fn record_backoff(&self, attempt: u32, delay: Duration) {
        info!(
            operation_id = self.operation_id,
            kind = %self.kind,
            attempt,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "Backing off before retry"
        );
    }

    pub fn record_fallback(&self, attempt: u32) {
        info!(operation_id = self.operation_id, kind = %self.kind, attempt, "Running fallback");
    }

    pub fn record_fallback_failed(&self, error: &str) {
        warn!(operation_id = self.operation_id, kind = %self.kind, error, "Fallback failed");
    }

    pub fn record_success(&self, attempts: u32, total_delay: Duration, used_fallback: bool) {
        info!(
            operation_id = self.operation_id,
            kind = %self.kind,
            attempts,
            total_delay_ms = u64::try_from(total_delay.as_millis()).unwrap_or(u64::MAX),
            used_fallback,
            "Operation succeeded"
        );
    }

    pub fn record_gave_up(
        &self,
        attempts: u32,
        category: ErrorCategory,
        strategy: RecoveryStrategy,
    ) {
        warn!(
            operation_id = self.operation_id,
            kind = %self.kind,
            attempts,
            %category,
            %strategy,
            "Operation failed, giving up"
        );
    }

    pub fn record_cancelled(&self, attempts: u32) {
        info!(operation_id = self.operation_id, kind = %self.kind, attempts, "Operation cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_events_do_not_panic_without_subscriber() {
        let span = RecoverySpan::start("save_recipe_42", OperationKind::Save, 3);
        span.record_attempt(1);
        span.record_failure(
            1,
            ErrorCategory::NetworkFailure,
            RecoveryStrategy::RetryWithExponentialBackoff,
            "connection reset",
        );
        span.record_backoff(1, Duration::from_secs(1));
        span.record_fallback(3);
        span.record_fallback_failed("cache miss");
        span.record_gave_up(3, ErrorCategory::NetworkFailure, RecoveryStrategy::UserIntervention);
        span.record_cancelled(2);
        span.record_success(2, Duration::MAX, false);
    }
}

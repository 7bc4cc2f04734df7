//! Choosing the next [`RecoveryStrategy`] after a failed attempt.
//!
//! [`StrategySelector`] holds the default rules. Callers that need other
//! behavior inject their own [`RecoveryPolicy`] into the orchestrator.

use super::config::RetryConfig;
use super::types::{ErrorCategory, OperationKind, RecoveryStrategy};

/// Everything known about a failed attempt when a strategy is chosen.
#[derive(Debug, Clone, Copy)]
pub struct FailureContext<'a> {
    pub category: ErrorCategory,
    /// The error reported itself as critical.
    pub critical: bool,
    pub kind: OperationKind,
    /// 1-based number of the attempt that just failed.
    pub attempt: u32,
    pub config: &'a RetryConfig,
}

impl FailureContext<'_> {
    /// Whether another attempt fits in the retry budget.
    pub fn has_budget(&self) -> bool {
        self.attempt < self.config.max_attempts()
    }
}

/// Decides how an execution proceeds after a failure.
pub trait RecoveryPolicy: Send + Sync {
    fn decide(&self, ctx: &FailureContext<'_>) -> RecoveryStrategy;
}

/// Default recovery rules.
///
/// Permission and validation failures never retry. Network failures back off
/// exponentially, storage failures retry with a delay and then fall back,
/// transient failures retry immediately and then once more after a delay.
/// Unknown failures are dispatched on the operation kind. Critical errors
/// abort.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategySelector;

impl StrategySelector {
    /// Pure rule table for a non-critical failure.
    pub fn select(
        category: ErrorCategory,
        kind: OperationKind,
        attempt: u32,
        config: &RetryConfig,
    ) -> RecoveryStrategy {
        use RecoveryStrategy::{
            Fallback, Retry, RetryWithDelay, RetryWithExponentialBackoff, UserIntervention,
        };

        if kind == OperationKind::Validation {
            return UserIntervention;
        }

        let has_budget = attempt < config.max_attempts();
        let within = |under: RecoveryStrategy, exhausted: RecoveryStrategy| {
            if has_budget {
                under
            } else {
                exhausted
            }
        };

        match category {
            ErrorCategory::PermissionDenied | ErrorCategory::ValidationFailure => UserIntervention,
            ErrorCategory::NetworkFailure => within(RetryWithExponentialBackoff, UserIntervention),
            ErrorCategory::StorageFailure => within(RetryWithDelay, Fallback),
            ErrorCategory::TransientFailure => within(Retry, RetryWithDelay),
            ErrorCategory::Unknown => match kind {
                OperationKind::Save | OperationKind::Upload => within(RetryWithDelay, Fallback),
                OperationKind::Load | OperationKind::Download => {
                    within(RetryWithExponentialBackoff, Fallback)
                }
                OperationKind::Delete => within(Retry, UserIntervention),
                OperationKind::Validation => UserIntervention,
            },
        }
    }
}

impl RecoveryPolicy for StrategySelector {
    fn decide(&self, ctx: &FailureContext<'_>) -> RecoveryStrategy {
        if ctx.critical {
            return RecoveryStrategy::Abort;
        }
        Self::select(ctx.category, ctx.kind, ctx.attempt, ctx.config)
    }
}

/// Adapter turning a closure into a [`RecoveryPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct PolicyFn<F>(F);

impl<F> PolicyFn<F>
where
    F: Fn(&FailureContext<'_>) -> RecoveryStrategy + Send + Sync,
{
    pub fn new(decide: F) -> Self {
        Self(decide)
    }
}

impl<F> RecoveryPolicy for PolicyFn<F>
where
    F: Fn(&FailureContext<'_>) -> RecoveryStrategy + Send + Sync,
{
    fn decide(&self, ctx: &FailureContext<'_>) -> RecoveryStrategy {
        (self.0)(ctx)
    }
}

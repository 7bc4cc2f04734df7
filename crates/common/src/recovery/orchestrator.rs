//! The recovery state machine.
//!
//! [`RetryOrchestrator`] drives one operation to a terminal outcome:
//!
//! ```text
//! Idle -> Attempting -> (success) ------------------------------> Terminal
//!            |  ^
//!            |  +-- AwaitingBackoff <-- retryable, budget left
//!            +--> Escalating (fallback) -----------------------> Terminal
//!            +--> UserIntervention / Abort / cancelled --------> Terminal
//! ```
//!
//! Attempts for one id are strictly sequential. The only suspension points
//! are the wrapped futures and the backoff sleep; a [`CancellationToken`]
//! passed to the `*_cancellable` variants is observed before every attempt
//! and during every backoff sleep. An in-flight attempt is never interrupted.
//!
//! The attempt record of an execution is removed on every way out of it,
//! including a panic in the operation or the caller dropping the future.

use std::convert::Infallible;
use std::fmt::Display;
use std::future::{Future, Ready};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::backoff::BackoffCalculator;
use super::classifier::{CategorizedError, ErrorClassifier};
use super::config::RetryConfig;
use super::constants::{ABORT_SUGGESTION, CANCELLED_SUGGESTION};
use super::messages::{failure_message, suggestions};
use super::registry::AttemptRegistry;
use super::result::RecoveryResult;
use super::strategy::{FailureContext, RecoveryPolicy, StrategySelector};
use super::tracing::RecoverySpan;
use super::types::{ErrorCategory, OperationKind, RecoveryStrategy};
use crate::error::CommonError;

/// Fallback type used when the caller supplies none.
type NoFallback<T> = fn() -> Ready<Result<T, Infallible>>;

/// Executes fallible operations with classification-driven retry and fallback.
///
/// ```
/// # let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
/// # runtime.block_on(async {
/// use recipebox_common::recovery::{OperationKind, RetryConfig, RetryOrchestrator};
///
/// let orchestrator = RetryOrchestrator::new();
/// let result = orchestrator
///     .execute("load_recipe_7", OperationKind::Load, &RetryConfig::quick(), || async {
///         Ok::<_, &str>("Shakshuka")
///     })
///     .await;
///
/// assert_eq!(result.data(), Some(&"Shakshuka"));
/// assert_eq!(orchestrator.registry().attempt_count("load_recipe_7"), 0);
/// # });
/// ```
#[derive(Debug)]
pub struct RetryOrchestrator<P = StrategySelector> {
    registry: Arc<AttemptRegistry>,
    policy: P,
}

impl RetryOrchestrator {
    /// Orchestrator with its own registry and the default rules.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(AttemptRegistry::new()))
    }

    /// Orchestrator with the default rules sharing `registry`.
    pub fn with_registry(registry: Arc<AttemptRegistry>) -> Self {
        Self { registry, policy: StrategySelector }
    }
}

impl Default for RetryOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: RecoveryPolicy> RetryOrchestrator<P> {
    /// Orchestrator deciding strategies with `policy` instead of the default
    /// rules.
    pub fn with_policy(registry: Arc<AttemptRegistry>, policy: P) -> Self {
        Self { registry, policy }
    }

    /// Attempt registry shared by every execution of this orchestrator.
    pub fn registry(&self) -> &Arc<AttemptRegistry> {
        &self.registry
    }

    /// Policy that picks the strategy after each failure.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Run `operation` until it succeeds or the recovery rules give up.
    pub async fn execute<T, E, F, Fut>(
        &self,
        operation_id: &str,
        kind: OperationKind,
        config: &RetryConfig,
        operation: F,
    ) -> RecoveryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: CategorizedError,
    {
        self.drive(operation_id, kind, config, operation, None::<NoFallback<T>>, None).await
    }

    /// Like [`execute`](Self::execute), running `fallback` at most once when
    /// the primary operation exhausts its budget or a fallback is chosen.
    pub async fn execute_with_fallback<T, E, F, Fut, G, GFut, GE>(
        &self,
        operation_id: &str,
        kind: OperationKind,
        config: &RetryConfig,
        operation: F,
        fallback: G,
    ) -> RecoveryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: CategorizedError,
        G: FnOnce() -> GFut,
        GFut: Future<Output = Result<T, GE>>,
        GE: Display,
    {
        self.drive(operation_id, kind, config, operation, Some(fallback), None).await
    }

    /// [`execute`](Self::execute) that stops early once `cancel` fires.
    pub async fn execute_cancellable<T, E, F, Fut>(
        &self,
        operation_id: &str,
        kind: OperationKind,
        config: &RetryConfig,
        operation: F,
        cancel: &CancellationToken,
    ) -> RecoveryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: CategorizedError,
    {
        self.drive(operation_id, kind, config, operation, None::<NoFallback<T>>, Some(cancel))
            .await
    }

    /// [`execute_with_fallback`](Self::execute_with_fallback) that stops
    /// early once `cancel` fires.
    #[allow(clippy::too_many_arguments)]
    pub async fn execute_with_fallback_cancellable<T, E, F, Fut, G, GFut, GE>(
        &self,
        operation_id: &str,
        kind: OperationKind,
        config: &RetryConfig,
        operation: F,
        fallback: G,
        cancel: &CancellationToken,
    ) -> RecoveryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: CategorizedError,
        G: FnOnce() -> GFut,
        GFut: Future<Output = Result<T, GE>>,
        GE: Display,
    {
        self.drive(operation_id, kind, config, operation, Some(fallback), Some(cancel)).await
    }

    #[instrument(skip_all, fields(operation_id = %operation_id, kind = %kind))]
    async fn drive<T, E, F, Fut, G, GFut, GE>(
        &self,
        operation_id: &str,
        kind: OperationKind,
        config: &RetryConfig,
        mut operation: F,
        mut fallback: Option<G>,
        cancel: Option<&CancellationToken>,
    ) -> RecoveryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: CategorizedError,
        G: FnOnce() -> GFut,
        GFut: Future<Output = Result<T, GE>>,
        GE: Display,
    {
        let span = RecoverySpan::start(operation_id, kind, config.max_attempts());
        let _record = RecordGuard { registry: &self.registry, operation_id };
        let mut attempts: u32 = 0;
        let mut total_delay = Duration::ZERO;

        loop {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return cancelled(&span, operation_id, attempts, total_delay);
            }

            attempts += 1;
            // A concurrent clear of the same id must not extend the budget
            let attempt = self.registry.record_attempt(operation_id).max(attempts);
            span.record_attempt(attempt);

            let error = match operation().await {
                Ok(value) => {
                    span.record_success(attempts, total_delay, false);
                    return RecoveryResult::success(value).with_attempts(attempts, total_delay);
                }
                Err(error) => error,
            };

            let category = ErrorClassifier::classify(&error);
            let strategy = self.policy.decide(&FailureContext {
                category,
                critical: error.is_critical(),
                kind,
                attempt,
                config,
            });
            let raw = error.to_string();
            span.record_failure(attempt, category, strategy, &raw);

            match strategy {
                _ if strategy.is_retry() && attempt < config.max_attempts() => {
                    let delay = if strategy == RecoveryStrategy::Retry {
                        Duration::ZERO
                    } else {
                        BackoffCalculator::delay(attempt, config)
                    };
                    if !delay.is_zero() {
                        span.record_backoff(attempt, delay);
                        if !sleep_unless_cancelled(delay, cancel).await {
                            return cancelled(&span, operation_id, attempts, total_delay);
                        }
                        total_delay += delay;
                    }
                }
                // Retry strategies land here once the budget is spent
                RecoveryStrategy::Retry
                | RecoveryStrategy::RetryWithDelay
                | RecoveryStrategy::RetryWithExponentialBackoff
                | RecoveryStrategy::Fallback => {
                    let Some(fallback) = fallback.take() else {
                        return give_up(&span, category, &raw, kind, attempts, total_delay);
                    };
                    if cancel.is_some_and(CancellationToken::is_cancelled) {
                        return cancelled(&span, operation_id, attempts, total_delay);
                    }

                    span.record_fallback(attempt);
                    return match fallback().await {
                        Ok(value) => {
                            span.record_success(attempts, total_delay, true);
                            RecoveryResult::success(value)
                                .with_attempts(attempts, total_delay)
                                .with_category(category)
                                .via_fallback()
                        }
                        Err(fallback_error) => {
                            span.record_fallback_failed(&fallback_error.to_string());
                            give_up(&span, category, &raw, kind, attempts, total_delay)
                                .via_fallback()
                        }
                    };
                }
                RecoveryStrategy::UserIntervention => {
                    return give_up(&span, category, &raw, kind, attempts, total_delay);
                }
                RecoveryStrategy::Abort => {
                    span.record_gave_up(attempts, category, strategy);
                    return RecoveryResult::failure(
                        failure_message(category, &raw),
                        vec![ABORT_SUGGESTION.to_owned()],
                        None,
                    )
                    .with_category(category)
                    .with_attempts(attempts, total_delay);
                }
            }
        }
    }
}

/// Removes the execution's attempt record when dropped.
struct RecordGuard<'a> {
    registry: &'a AttemptRegistry,
    operation_id: &'a str,
}

impl Drop for RecordGuard<'_> {
    fn drop(&mut self) {
        self.registry.clear(self.operation_id);
    }
}

/// Sleep for `delay`; `false` when `cancel` fired first.
async fn sleep_unless_cancelled(delay: Duration, cancel: Option<&CancellationToken>) -> bool {
    match cancel {
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => false,
            () = tokio::time::sleep(delay) => true,
        },
        None => {
            tokio::time::sleep(delay).await;
            true
        }
    }
}

fn give_up<T>(
    span: &RecoverySpan<'_>,
    category: ErrorCategory,
    raw: &str,
    kind: OperationKind,
    attempts: u32,
    total_delay: Duration,
) -> RecoveryResult<T> {
    span.record_gave_up(attempts, category, RecoveryStrategy::UserIntervention);
    RecoveryResult::failure(
        failure_message(category, raw),
        suggestions(category, kind),
        Some(RecoveryStrategy::UserIntervention),
    )
    .with_category(category)
    .with_attempts(attempts, total_delay)
}

fn cancelled<T>(
    span: &RecoverySpan<'_>,
    operation_id: &str,
    attempts: u32,
    total_delay: Duration,
) -> RecoveryResult<T> {
    span.record_cancelled(attempts);
    RecoveryResult::failure(
        CommonError::cancelled(operation_id).to_string(),
        vec![CANCELLED_SUGGESTION.to_owned()],
        None,
    )
    .with_attempts(attempts, total_delay)
}

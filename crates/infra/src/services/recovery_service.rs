//! Recovery service with per-kind retry configs.
//!
//! Resolves [`RecoverySettings`] into one [`RetryConfig`] per
//! [`OperationKind`] when constructed, then delegates every run to a shared
//! [`RetryOrchestrator`]. An invalid preset name or override therefore fails
//! at startup instead of on the first failing save.
//!
//! # Example
//!
//! ```no_run
//! use recipebox_common::recovery::OperationKind;
//! use recipebox_domain::RecoverySettings;
//! use recipebox_infra::errors::InfraError;
//! use recipebox_infra::services::RecoveryService;
//!
//! # async fn example() -> recipebox_domain::Result<()> {
//! let service = RecoveryService::new(RecoverySettings::default())?;
//!
//! let result = service
//!     .run(OperationKind::Load, "load_recipe_42", || async {
//!         Ok::<_, InfraError>("Shakshuka".to_string())
//!     })
//!     .await;
//!
//! if let Some(title) = result.data() {
//!     println!("loaded {title}");
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use recipebox_common::recovery::{
    CategorizedError, OperationKind, RecoveryPolicy, RecoveryResult, RetryConfig,
    RetryOrchestrator, StrategySelector,
};
use recipebox_domain::{Config, RecoverySettings, Result as DomainResult};
use tokio_util::sync::CancellationToken;

use crate::config::{resolve_retry_config, validate_recovery_settings};

/// Every kind is resolved at construction; this only backs the lookup.
const UNRESOLVED: RetryConfig = RetryConfig::standard();

/// Runs fallible operations under the retry config of their kind.
pub struct RecoveryService<P = StrategySelector> {
    orchestrator: Arc<RetryOrchestrator<P>>,
    settings: RecoverySettings,
    configs: HashMap<OperationKind, RetryConfig>,
}

impl RecoveryService {
    /// Create a service with its own orchestrator and the default recovery
    /// rules.
    ///
    /// # Errors
    /// Returns `RecipeBoxError::Config` if a preset or operation kind name is
    /// unknown, or the custom overrides produce an invalid retry config.
    pub fn new(settings: RecoverySettings) -> DomainResult<Self> {
        Self::with_orchestrator(Arc::new(RetryOrchestrator::new()), settings)
    }

    /// Create a service from a loaded application config.
    ///
    /// # Errors
    /// See [`RecoveryService::new`].
    pub fn from_config(config: &Config) -> DomainResult<Self> {
        Self::new(config.recovery.clone())
    }
}

impl<P: RecoveryPolicy> RecoveryService<P> {
    /// Create a service that shares `orchestrator` (and its attempt
    /// registry) with other callers.
    ///
    /// # Errors
    /// See [`RecoveryService::new`].
    pub fn with_orchestrator(
        orchestrator: Arc<RetryOrchestrator<P>>,
        settings: RecoverySettings,
    ) -> DomainResult<Self> {
        validate_recovery_settings(&settings)?;

        let configs = OperationKind::ALL
            .into_iter()
            .map(|kind| resolve_retry_config(&settings, kind).map(|config| (kind, config)))
            .collect::<DomainResult<HashMap<_, _>>>()?;

        tracing::info!(
            preset = %settings.preset,
            overrides = settings.overrides.len(),
            custom = settings.custom.is_some(),
            "Recovery service configured"
        );

        Ok(Self { orchestrator, settings, configs })
    }

    pub fn orchestrator(&self) -> &Arc<RetryOrchestrator<P>> {
        &self.orchestrator
    }

    pub fn settings(&self) -> &RecoverySettings {
        &self.settings
    }

    /// Retry config used for operations of `kind`.
    pub fn config_for(&self, kind: OperationKind) -> &RetryConfig {
        self.configs.get(&kind).unwrap_or(&UNRESOLVED)
    }

    /// Run `operation` with the retry config of `kind`.
    pub async fn run<T, E, F, Fut>(
        &self,
        kind: OperationKind,
        operation_id: &str,
        operation: F,
    ) -> RecoveryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: CategorizedError,
    {
        self.orchestrator.execute(operation_id, kind, self.config_for(kind), operation).await
    }

    /// Run `operation`, escalating to `fallback` when the recovery rules
    /// choose it.
    pub async fn run_with_fallback<T, E, F, Fut, G, GFut, GE>(
        &self,
        kind: OperationKind,
        operation_id: &str,
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
        self.orchestrator
            .execute_with_fallback(operation_id, kind, self.config_for(kind), operation, fallback)
            .await
    }

    /// [`run`](Self::run) that stops before the next attempt or during a
    /// backoff sleep once `cancel` fires.
    pub async fn run_cancellable<T, E, F, Fut>(
        &self,
        kind: OperationKind,
        operation_id: &str,
        operation: F,
        cancel: &CancellationToken,
    ) -> RecoveryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: CategorizedError,
    {
        self.orchestrator
            .execute_cancellable(operation_id, kind, self.config_for(kind), operation, cancel)
            .await
    }
}

impl<P> std::fmt::Debug for RecoveryService<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryService")
            .field("settings", &self.settings)
            .field("configs", &self.configs)
            .finish_non_exhaustive()
    }
}

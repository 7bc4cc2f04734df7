//! Retry and recovery orchestration.
//!
//! Wraps fallible save, load, delete, upload and download operations with
//! bounded retry, category-driven strategy selection, backoff, fallback
//! execution and per-operation attempt bookkeeping.
//!
//! ## Pieces
//!
//! | Type | Role |
//! |------|------|
//! | [`RetryConfig`] | Immutable retry budget and delay policy, with presets |
//! | [`ErrorClassifier`] | Maps a failure to an [`ErrorCategory`] |
//! | [`BackoffCalculator`] | Delay before the next attempt |
//! | [`AttemptRegistry`] | In-flight attempt counts per operation id |
//! | [`StrategySelector`] | Default [`RecoveryPolicy`] |
//! | [`RetryOrchestrator`] | Drives an operation to a [`RecoveryResult`] |
//!
//! ## Categories and strategies
//!
//! Permission and validation failures stop after the first attempt.
//! Network, storage, transient and unknown failures consume the retry budget
//! and, where configured, fall back before the failure reaches the caller.
//! Errors that report themselves as critical abort without touching the
//! fallback.

pub mod backoff;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod error;
pub mod messages;
pub mod orchestrator;
pub mod registry;
pub mod result;
pub mod strategy;
pub mod tracing;
pub mod types;

pub use backoff::BackoffCalculator;
pub use classifier::{CategorizedError, ErrorClassifier};
pub use config::{RetryConfig, RetryConfigBuilder, RetryPreset};
pub use error::{RecoveryConfigResult, RecoveryError};
pub use orchestrator::RetryOrchestrator;
pub use registry::{AttemptRecord, AttemptRegistry};
pub use result::{RecoveryFailure, RecoveryResult};
pub use strategy::{FailureContext, PolicyFn, RecoveryPolicy, StrategySelector};
pub use types::{ErrorCategory, OperationId, OperationKind, RecoveryStrategy};

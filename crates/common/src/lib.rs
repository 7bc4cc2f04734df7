//! Common building blocks shared across RecipeBox crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: errors, serde helpers, clock abstraction
//! - `observability`: tracing events (pulled in by `runtime`)
//! - `runtime`: the retry and recovery engine (tokio, cancellation, registry)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
pub mod time;
#[cfg(feature = "foundation")]
pub mod utils;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod recovery;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult, ErrorClassification, ErrorSeverity};
#[cfg(feature = "runtime")]
pub use recovery::{
    CategorizedError, ErrorCategory, OperationId, OperationKind, RecoveryPolicy, RecoveryResult,
    RecoveryStrategy, RetryConfig, RetryOrchestrator, RetryPreset,
};
#[cfg(feature = "foundation")]
pub use time::{Clock, MockClock, SystemClock};
#[cfg(feature = "foundation")]
pub use utils::serde::duration_millis;

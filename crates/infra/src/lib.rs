//! # RecipeBox Infrastructure
//!
//! Infrastructure side of the recovery engine.
//!
//! This crate contains:
//! - Configuration loading (environment, TOML and JSON files)
//! - Logging initialization (`tracing-subscriber`)
//! - Conversions from SQLite, filesystem and HTTP errors into
//!   `RecipeBoxError`, with structured recovery categories
//! - `RecoveryService`, which runs operations under per-kind retry configs
//!
//! ## Architecture
//! - Depends on `recipebox-common` (recovery engine) and `recipebox-domain`
//!   (error and config types)
//! - Contains all "impure" code (environment, files, global subscriber)

pub mod config;
pub mod errors;
pub mod observability;
pub mod services;

// Re-export commonly used items
pub use config::{load, resolve_retry_config};
pub use errors::InfraError;
pub use observability::init_logging;
pub use services::RecoveryService;

//! Service layer implementations.
//!
//! Services combine configuration with the recovery engine so callers only
//! name the operation kind and identity of the work they run.

pub mod recovery_service;

pub use recovery_service::RecoveryService;

//! Constants for the recovery engine.

/// Smallest accepted `max_attempts`.
pub const MIN_MAX_ATTEMPTS: u32 = 1;

/// Largest accepted `max_attempts`.
pub const MAX_MAX_ATTEMPTS: u32 = 100;

/// Default growth factor between consecutive backoff delays.
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Largest exponent handed to `f64::powi`. Larger attempt numbers saturate
/// here; the result is already infinite or clamped to `max_delay` by then.
pub const MAX_BACKOFF_EXPONENT: u32 = i32::MAX as u32;

/// Sole suggestion attached to an aborted operation.
pub const ABORT_SUGGESTION: &str = "Operation aborted due to critical error";

/// Sole suggestion attached to a cancelled operation.
pub const CANCELLED_SUGGESTION: &str = "Operation cancelled before completion";

//! Common error types shared across RecipeBox crates
//!
//! Three pieces make up the error layer:
//!
//! 1. **`CommonError`**: the error patterns every collaborator produces
//!    (storage failures, timeouts, validation, permission problems, ...).
//! 2. **`ErrorClassification`**: a uniform way to ask an error whether it is
//!    retryable, how severe it is and whether it is critical.
//! 3. **`ErrorSeverity`**: the severity scale used for logging decisions.
//!
//! Module-specific errors compose with `CommonError` instead of repeating its
//! variants:
//!
//! ```rust,ignore
//! #[derive(Debug, Error)]
//! pub enum PhotoError {
//!     #[error("Photo too large: {0} bytes")]
//!     TooLarge(u64),
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//!
//! impl_error_classification!(PhotoError, Common,
//!     Self::TooLarge(_) => {
//!         retryable: false,
//!         severity: ErrorSeverity::Error,
//!         critical: false,
//!     }
//! );
//! ```
//!
//! | Pattern | Variant | Retryable |
//! |---------|---------|-----------|
//! | Invalid settings | `Config` | no |
//! | Mutex contention | `Lock` | yes |
//! | JSON / TOML | `Serialization` | no |
//! | File I/O | `Persistence` | no |
//! | Database | `Storage` | no |
//! | Deadlines | `Timeout` | yes |
//! | Remote services | `Backend` | per error |
//! | Bad input | `Validation` | no |
//! | Missing rows/files | `NotFound` | no |
//! | Access denied | `Unauthorized` | no |
//! | Locked/busy resource | `Busy` | yes |
//! | Invariant violations | `Internal` | no (critical) |
//! | Caller gave up | `Cancelled` | no |

use std::fmt;
use std::time::Duration;

/// Standard result type using CommonError
pub type CommonResult<T> = Result<T, CommonError>;

/// Common error variants that appear across multiple modules
#[derive(Debug, Clone, PartialEq)]
pub enum CommonError {
    /// Configuration-related errors
    Config { message: String, field: Option<String> },

    /// Lock acquisition or concurrency errors
    Lock { message: String, resource: Option<String> },

    /// Serialization or deserialization errors
    Serialization { message: String, format: Option<String> },

    /// File persistence errors (photo files, exported data)
    Persistence { message: String, operation: Option<String> },

    /// Database errors
    Storage { message: String, operation: Option<String> },

    /// Timeout errors
    Timeout { operation: String, duration: Duration },

    /// Network or remote service errors
    Backend { service: String, message: String, is_retryable: bool },

    /// Validation errors
    Validation { field: String, message: String, value: Option<String> },

    /// Resource not found errors
    NotFound { resource_type: String, identifier: Option<String> },

    /// Permission or authorization errors
    Unauthorized { operation: String, required_permission: Option<String> },

    /// A resource is temporarily busy or locked by someone else
    Busy { resource: String, retry_after: Option<Duration> },

    /// Internal errors that shouldn't normally occur
    Internal { message: String, context: Option<String> },

    /// The operation was cancelled before it finished
    Cancelled { operation: String, reason: Option<String> },
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { message, field } => match field {
                Some(field) => write!(f, "Configuration error in field '{field}': {message}"),
                None => write!(f, "Configuration error: {message}"),
            },
            Self::Lock { message, resource } => match resource {
                Some(resource) => write!(f, "Lock error for '{resource}': {message}"),
                None => write!(f, "Lock error: {message}"),
            },
            Self::Serialization { message, format } => match format {
                Some(format) => write!(f, "Serialization error ({format}): {message}"),
                None => write!(f, "Serialization error: {message}"),
            },
            Self::Persistence { message, operation } => match operation {
                Some(op) => write!(f, "File error during '{op}': {message}"),
                None => write!(f, "File error: {message}"),
            },
            Self::Storage { message, operation } => match operation {
                Some(op) => write!(f, "Storage error during '{op}': {message}"),
                None => write!(f, "Storage error: {message}"),
            },
            Self::Timeout { operation, duration } => {
                write!(f, "Operation '{operation}' timed out after {duration:?}")
            }
            Self::Backend { service, message, .. } => {
                write!(f, "Network error from '{service}': {message}")
            }
            Self::Validation { field, message, value } => match value {
                Some(value) => write!(
                    f,
                    "Validation error for field '{field}' (value: '{value}'): {message}"
                ),
                None => write!(f, "Validation error for field '{field}': {message}"),
            },
            Self::NotFound { resource_type, identifier } => match identifier {
                Some(id) => write!(f, "{resource_type} not found: '{id}'"),
                None => write!(f, "{resource_type} not found"),
            },
            Self::Unauthorized { operation, required_permission } => match required_permission {
                Some(perm) => {
                    write!(f, "Permission denied for '{operation}' (requires: {perm})")
                }
                None => write!(f, "Permission denied for '{operation}'"),
            },
            Self::Busy { resource, retry_after } => match retry_after {
                Some(retry) => write!(f, "Resource '{resource}' is busy (retry in {retry:?})"),
                None => write!(f, "Resource '{resource}' is busy"),
            },
            Self::Internal { message, context } => match context {
                Some(ctx) => write!(f, "Internal error in '{ctx}': {message}"),
                None => write!(f, "Internal error: {message}"),
            },
            Self::Cancelled { operation, reason } => match reason {
                Some(reason) => write!(f, "Operation '{operation}' cancelled: {reason}"),
                None => write!(f, "Operation '{operation}' cancelled"),
            },
        }
    }
}

impl std::error::Error for CommonError {}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Lock { .. } | Self::Timeout { .. } | Self::Busy { .. } => true,
            Self::Backend { is_retryable, .. } => *is_retryable,
            _ => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound { .. } | Self::Cancelled { .. } => ErrorSeverity::Info,
            Self::Lock { .. } | Self::Timeout { .. } | Self::Busy { .. } => {
                ErrorSeverity::Warning
            }
            Self::Unauthorized { .. } => ErrorSeverity::Warning,
            Self::Internal { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Busy { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl CommonError {
    /// Create a simple configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), field: None }
    }

    /// Create a configuration error for a specific field
    pub fn config_field<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::Config { message: message.into(), field: Some(field.into()) }
    }

    /// Create a lock error for a specific resource
    pub fn lock_resource<R: Into<String>, S: Into<String>>(resource: R, message: S) -> Self {
        Self::Lock { message: message.into(), resource: Some(resource.into()) }
    }

    /// Create a serialization error with format information
    pub fn serialization_format<F: Into<String>, S: Into<String>>(format: F, message: S) -> Self {
        Self::Serialization { message: message.into(), format: Some(format.into()) }
    }

    /// Create a simple file persistence error
    pub fn persistence<S: Into<String>>(message: S) -> Self {
        Self::Persistence { message: message.into(), operation: None }
    }

    /// Create a database error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage { message: message.into(), operation: None }
    }

    /// Create a database error for a specific operation
    pub fn storage_op<O: Into<String>, S: Into<String>>(operation: O, message: S) -> Self {
        Self::Storage { message: message.into(), operation: Some(operation.into()) }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S, duration: Duration) -> Self {
        Self::Timeout { operation: operation.into(), duration }
    }

    /// Create a network/backend error
    pub fn backend<S: Into<String>, M: Into<String>>(
        service: S,
        message: M,
        is_retryable: bool,
    ) -> Self {
        Self::Backend { service: service.into(), message: message.into(), is_retryable }
    }

    /// Create a validation error
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation { field: field.into(), message: message.into(), value: None }
    }

    /// Create a not found error with identifier
    pub fn not_found_with_id<T: Into<String>, I: Into<String>>(
        resource_type: T,
        identifier: I,
    ) -> Self {
        Self::NotFound { resource_type: resource_type.into(), identifier: Some(identifier.into()) }
    }

    /// Create an unauthorized error
    pub fn unauthorized<O: Into<String>>(operation: O) -> Self {
        Self::Unauthorized { operation: operation.into(), required_permission: None }
    }

    /// Create a busy-resource error
    pub fn busy<R: Into<String>>(resource: R) -> Self {
        Self::Busy { resource: resource.into(), retry_after: None }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal { message: message.into(), context: None }
    }

    /// Create a cancellation error
    pub fn cancelled<S: Into<String>>(operation: S) -> Self {
        Self::Cancelled { operation: operation.into(), reason: None }
    }

    /// Stable label for the variant, used as a structured logging field.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Lock { .. } => "lock",
            Self::Serialization { .. } => "serialization",
            Self::Persistence { .. } => "persistence",
            Self::Storage { .. } => "storage",
            Self::Timeout { .. } => "timeout",
            Self::Backend { .. } => "backend",
            Self::Validation { .. } => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Busy { .. } => "busy",
            Self::Internal { .. } => "internal",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}

/// Error classification trait for consistent error handling across modules
pub trait ErrorClassification {
    /// Whether another attempt could plausibly succeed (timeouts, lock
    /// contention, busy resources, flaky backends).
    fn is_retryable(&self) -> bool;

    /// Severity used for logging decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Whether the error indicates broken invariants or corrupted state.
    fn is_critical(&self) -> bool;

    /// Suggested delay before retrying, when the error carries one.
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Degraded but operational
    Warning,
    /// Failure requiring attention
    Error,
    /// Data integrity at risk
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_format("JSON", err.to_string())
    }
}

impl From<toml::de::Error> for CommonError {
    fn from(err: toml::de::Error) -> Self {
        Self::serialization_format("TOML", err.to_string())
    }
}

impl From<std::io::Error> for CommonError {
    fn from(err: std::io::Error) -> Self {
        Self::persistence(err.to_string())
    }
}

/// Implement `ErrorClassification` for a module error that embeds
/// `CommonError`, delegating the embedded variant and spelling out the rest.
///
/// ```rust,ignore
/// impl_error_classification!(RecoveryError, Common,
///     Self::UnknownPreset(_) => {
///         retryable: false,
///         severity: ErrorSeverity::Error,
///         critical: false,
///     }
/// );
/// ```
#[macro_export]
macro_rules! impl_error_classification {
    (
        $error_type:ty,
        $common_variant:ident
        $(,
            $variant:pat => {
                retryable: $retryable:expr,
                severity: $severity:expr,
                critical: $critical:expr
                $(, retry_after: $retry_after:expr)?
                $(,)?
            }
        )*
        $(,)?
    ) => {
        impl $crate::error::ErrorClassification for $error_type {
            fn is_retryable(&self) -> bool {
                match self {
                    Self::$common_variant(e) => e.is_retryable(),
                    $(
                        $variant => $retryable,
                    )*
                }
            }

            fn severity(&self) -> $crate::error::ErrorSeverity {
                match self {
                    Self::$common_variant(e) => e.severity(),
                    $(
                        $variant => $severity,
                    )*
                }
            }

            fn is_critical(&self) -> bool {
                match self {
                    Self::$common_variant(e) => e.is_critical(),
                    $(
                        $variant => $critical,
                    )*
                }
            }

            fn retry_after(&self) -> Option<std::time::Duration> {
                match self {
                    Self::$common_variant(e) => e.retry_after(),
                    $(
                        $(
                            $variant => $retry_after,
                        )?
                    )*
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };
}

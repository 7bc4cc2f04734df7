//! Logging initialization
//!
//! Logs go to stderr, either human-readable or as JSON lines. The filter
//! comes from `RUST_LOG` when set, otherwise from [`LoggingConfig::level`].

use std::io;

use recipebox_domain::{LoggingConfig, RecipeBoxError, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the event filter for `config`.
///
/// # Errors
/// Returns `RecipeBoxError::Config` if `RUST_LOG` is unset and the
/// configured level is not a valid filter directive.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.level).map_err(|e| {
        RecipeBoxError::Config(format!("Invalid log level '{}': {}", config.level, e))
    })
}

/// Install the global subscriber.
///
/// Returns `Ok(false)` when a global subscriber was already installed, which
/// is the normal case for the second caller in a test binary.
///
/// # Errors
/// Returns `RecipeBoxError::Config` for an invalid filter directive.
pub fn init_logging(config: &LoggingConfig) -> Result<bool> {
    let filter = build_filter(config)?;
    let subscriber = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        subscriber.with(fmt::layer().json().with_writer(io::stderr)).try_init()
    } else {
        subscriber.with(fmt::layer().with_writer(io::stderr)).try_init()
    };

    match installed {
        Ok(()) => {
            tracing::debug!(level = %config.level, json = config.json, "Logging initialized");
            Ok(true)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Global subscriber already set");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig { level: "recipebox=verbose".to_string(), json: false };
        assert!(matches!(build_filter(&config), Err(RecipeBoxError::Config(_))));
    }

    #[test]
    fn test_accepts_module_directives() {
        let config =
            LoggingConfig { level: "warn,recipebox_common=debug".to_string(), json: true };
        assert!(build_filter(&config).is_ok());
    }
}

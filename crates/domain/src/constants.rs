//! Application constants
//!
//! Centralized location for domain-level defaults used throughout the
//! application.

// Recovery defaults
pub const DEFAULT_RETRY_PRESET: &str = "standard";

// Logging defaults
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration files, probed in this order in every searched directory
pub const CONFIG_FILE_NAMES: [&str; 4] =
    ["recipebox.toml", "recipebox.json", "config.toml", "config.json"];

//! Global subscriber installation.
//!
//! Kept in its own test binary: the first `init_logging` call in a process
//! wins, and other test binaries must not depend on which test ran first.

use recipebox_domain::LoggingConfig;
use recipebox_infra::observability::init_logging;

#[test]
fn second_initialization_is_a_no_op() {
    let config = LoggingConfig { level: "warn".to_string(), json: true };

    assert!(init_logging(&config).expect("first init"));
    assert!(!init_logging(&LoggingConfig::default()).expect("second init"));

    tracing::warn!(target: "recipebox_infra", "logging initialized in test");
}

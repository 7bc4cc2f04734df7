//! Integration tests for the configuration data types
//!
//! Parses realistic TOML and JSON documents the way the infra loader does.

use recipebox_domain::{Config, RecipeBoxError, RetryOverrides};

#[test]
fn parses_full_toml_document() {
    let config: Config = toml::from_str(
        r#"
        [recovery]
        preset = "quick"

        [recovery.overrides]
        upload = "persistent"
        download = "persistent"

        [recovery.custom]
        max_attempts = 4
        initial_delay_ms = 250
        backoff_multiplier = 1.5

        [logging]
        level = "recipebox_infra=debug,warn"
        json = true
        "#,
    )
    .unwrap();

    assert_eq!(config.recovery.preset, "quick");
    assert_eq!(config.recovery.preset_for("upload"), "persistent");
    assert_eq!(config.recovery.preset_for("delete"), "quick");
    assert_eq!(
        config.recovery.custom,
        Some(RetryOverrides {
            max_attempts: Some(4),
            initial_delay_ms: Some(250),
            backoff_multiplier: Some(1.5),
            ..Default::default()
        })
    );
    assert_eq!(config.logging.level, "recipebox_infra=debug,warn");
    assert!(config.logging.json);
}

#[test]
fn partial_json_document_fills_defaults() {
    let config: Config =
        serde_json::from_str(r#"{ "recovery": { "overrides": { "save": "persistent" } } }"#)
            .unwrap();

    assert_eq!(config.recovery.preset, "standard");
    assert_eq!(config.recovery.preset_for("save"), "persistent");
    assert_eq!(config.recovery.custom, None);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn wrong_field_type_is_rejected() {
    let result = toml::from_str::<Config>("[recovery]\npreset = 3\n");
    assert!(result.is_err());
}

#[test]
fn errors_serialize_for_the_ui() {
    let err = RecipeBoxError::PermissionDenied("photo library".to_string());
    let json = serde_json::to_string(&err).unwrap();
    assert_eq!(json, r#"{"type":"PermissionDenied","message":"photo library"}"#);
}

//! Loading controller configuration from TOML and JSON files.
//!
//! Run:
//!   cargo test -p chatkit-runtime --features config-files --test config_files

use std::io::Write;

use chatkit_core::{LifecycleState, Platform};
use chatkit_runtime::{BehaviorVariant, ConfigError, ControllerConfig};

#[test]
fn toml_with_host_aliases() {
    let config = ControllerConfig::from_toml_str(
        r#"
platform = "android"
behavior = "height"
vertical_offset = 48.0
min_animation_duration_ms = 16
initial_lifecycle = "background"
"#,
    )
    .expect("valid config");

    assert_eq!(config.platform, Platform::Android);
    assert_eq!(config.resolved_behavior(), BehaviorVariant::Resize);
    assert_eq!(config.vertical_offset, 48.0);
    assert_eq!(config.min_animation_duration_ms, 16);
    assert_eq!(config.initial_lifecycle, LifecycleState::Background);
    assert!(config.enabled);
}

#[test]
fn empty_toml_is_default() {
    let config = ControllerConfig::from_toml_str("").expect("empty config");
    assert_eq!(config, ControllerConfig::default());
}

#[test]
fn json_round_trip_through_file() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(
        file,
        r#"{{"platform": "ios", "behavior": "padding", "enabled": false}}"#
    )
    .expect("write");

    let config = ControllerConfig::from_json_file(file.path()).expect("valid config");
    assert_eq!(config.platform, Platform::Ios);
    assert_eq!(config.behavior, Some(BehaviorVariant::Pad));
    assert!(!config.enabled);
    assert_eq!(config.vertical_offset, 66.5);
}

#[test]
fn toml_file_and_serialization_agree() {
    let original = ControllerConfig::new(Platform::Android)
        .behavior(BehaviorVariant::Passthrough)
        .vertical_offset(12.5);
    let text = original.to_toml_string().expect("serialize");

    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(text.as_bytes()).expect("write");
    let loaded = ControllerConfig::from_toml_file(file.path()).expect("load");
    assert_eq!(loaded, original);
}

#[test]
fn unknown_behavior_is_a_parse_error() {
    let err = ControllerConfig::from_toml_str(r#"behavior = "float""#).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err}");
}

#[test]
fn out_of_range_values_fail_validation() {
    let err = ControllerConfig::from_json_str(r#"{"min_animation_duration_ms": 120000}"#)
        .unwrap_err();
    match err {
        ConfigError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("min_animation_duration_ms"));
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = ControllerConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    assert!(err.to_string().starts_with("I/O error"));
}

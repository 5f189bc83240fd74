// tests/config_loading.rs
//! Configuration files and environment overrides feeding a running engine

use biofusion_core::config::{ConfigLoader, DriftBoundPolicy, EngineConfig};
use biofusion_core::{EngineError, EngineState};
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes()).expect("Failed to write config");
    file
}

#[test]
#[serial]
fn test_file_config_drives_engine() {
    let file = write_config(
        r#"
[engine]
tick_interval_ms = 20
buffer_capacity = 50
seed = 1234

[drift]
bound_policy = "clamp"
"#,
    );

    let config = ConfigLoader::with_paths(vec![file.path().to_path_buf()])
        .without_environment()
        .load()
        .expect("Failed to load config");
    assert_eq!(config.drift.bound_policy, DriftBoundPolicy::Clamp);

    let mut state = EngineState::new(config).expect("Failed to create engine");
    state.run_ticks(80);

    let samples = state.samples();
    assert_eq!(samples.len(), 50);
    assert!((samples[1].t - samples[0].t - 0.02).abs() < 1e-12);
}

#[test]
#[serial]
fn test_invalid_file_rejected_before_engine_starts() {
    let file = write_config(
        r#"
[engine]
tick_interval_ms = 100
"#,
    );

    // 10 Hz band sits at the 5 Hz Nyquist limit of a 100 ms tick
    let result = ConfigLoader::with_paths(vec![file.path().to_path_buf()])
        .without_environment()
        .load();
    assert!(result.is_err());
}

#[test]
fn test_engine_rejects_unvalidated_config() {
    let mut config = EngineConfig::default();
    config.artifacts.probability = 1.5;

    let err = EngineState::new(config).unwrap_err();
    assert!(matches!(err, EngineError::InvalidConfig(_)));
}

#[test]
#[serial]
fn test_environment_override_changes_seed() {
    std::env::set_var("BIOFUSION_ENGINE__SEED", "99");
    let overridden = ConfigLoader::with_paths(Vec::new()).load();
    std::env::remove_var("BIOFUSION_ENGINE__SEED");

    let overridden = overridden.expect("Failed to load config");
    assert_eq!(overridden.engine.seed, 99);

    let mut a = EngineState::new(overridden).unwrap();
    let mut b = EngineState::new(EngineConfig::default()).unwrap();
    a.run_ticks(20);
    b.run_ticks(20);
    assert_ne!(a.samples(), b.samples());
}

#[test]
#[serial]
fn test_exported_config_reloads_identically() {
    let mut config = EngineConfig::default();
    config.engine.seed = 77;
    config.drift.bound_policy = DriftBoundPolicy::Reset;

    let file = NamedTempFile::new().expect("Failed to create temp file");
    ConfigLoader::export_config(&config, file.path()).expect("Failed to export");

    let reloaded = ConfigLoader::with_paths(vec![file.path().to_path_buf()])
        .without_environment()
        .load()
        .expect("Failed to reload");
    assert_eq!(reloaded, config);
}

// src/config/loader.rs
//! Layered configuration loader
//!
//! Precedence, lowest first: built-in defaults, each TOML file in the order
//! given, then `BIOFUSION_<SECTION>__<KEY>` environment variables.

use crate::config::{constants::paths, validation::ValidationError, EngineConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Configuration validation error: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Configuration loader merging defaults, files and environment
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    use_environment: bool,
}

impl ConfigLoader {
    /// Create loader with the conventional search paths
    pub fn new() -> Self {
        Self {
            config_paths: Self::discover_config_paths(),
            use_environment: true,
        }
    }

    /// Create loader with custom paths
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            use_environment: true,
        }
    }

    /// Disable `BIOFUSION_*` environment overrides
    pub fn without_environment(mut self) -> Self {
        self.use_environment = false;
        self
    }

    /// Paths searched, in merge order
    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Load, merge and validate the engine configuration
    pub fn load(&self) -> Result<EngineConfig, ConfigError> {
        let mut merged = toml::Value::try_from(EngineConfig::default())?;

        for config_path in &self.config_paths {
            if !config_path.exists() {
                debug!(path = %config_path.display(), "config file absent, skipping");
                continue;
            }
            let file_config = self.load_config_file(config_path)?;
            merge_toml_values(&mut merged, file_config);
            info!(path = %config_path.display(), "merged configuration file");
        }

        if self.use_environment {
            apply_environment_overrides(&mut merged, std::env::vars());
        }

        let config: EngineConfig = merged.try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate a single file without merging it
    pub fn validate_config_file<P: AsRef<Path>>(&self, path: P) -> Result<EngineConfig, ConfigError> {
        let value = self.load_config_file(path.as_ref())?;
        let config: EngineConfig = value.try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Export a configuration to a TOML file
    pub fn export_config<P: AsRef<Path>>(config: &EngineConfig, path: P) -> Result<(), ConfigError> {
        let toml_content = toml::to_string_pretty(config)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    fn load_config_file(&self, path: &Path) -> Result<toml::Value, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: toml::Value = toml::from_str(&content)?;

        Ok(config)
    }

    fn discover_config_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from(paths::DEFAULT_CONFIG_FILE),
            PathBuf::from(paths::LOCAL_CONFIG_FILE),
        ]
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_toml_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml_values(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

/// `BIOFUSION_ENGINE__TICK_INTERVAL_MS=20` sets `engine.tick_interval_ms`
fn apply_environment_overrides<I>(config: &mut toml::Value, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in vars {
        let Some(stripped) = key.strip_prefix(paths::ENV_PREFIX) else {
            continue;
        };
        let config_key: Vec<String> = stripped
            .to_lowercase()
            .split(paths::ENV_SECTION_SEPARATOR)
            .map(str::to_string)
            .collect();
        if config_key.iter().any(String::is_empty) {
            continue;
        }

        debug!(variable = %key, "applying environment override");
        set_nested_value(config, &config_key, parse_env_value(&value));
    }
}

fn parse_env_value(value: &str) -> toml::Value {
    if let Ok(int_val) = value.parse::<i64>() {
        toml::Value::Integer(int_val)
    } else if let Ok(float_val) = value.parse::<f64>() {
        toml::Value::Float(float_val)
    } else if let Ok(bool_val) = value.parse::<bool>() {
        toml::Value::Boolean(bool_val)
    } else {
        toml::Value::String(value.to_string())
    }
}

fn set_nested_value(config: &mut toml::Value, path: &[String], value: toml::Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = config;
    for part in parents {
        let toml::Value::Table(table) = current else {
            return;
        };
        current = table
            .entry(part.clone())
            .or_insert_with(|| toml::Value::Table(toml::value::Table::new()));
    }

    if let toml::Value::Table(table) = current {
        // Integers given for float keys must stay floats or deserialization fails
        let value = match (table.get(last), value) {
            (Some(toml::Value::Float(_)), toml::Value::Integer(i)) => toml::Value::Float(i as f64),
            (_, value) => value,
        };
        table.insert(last.clone(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DriftBoundPolicy;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file
    }

    #[test]
    fn test_load_defaults_when_no_files() {
        let loader = ConfigLoader::with_paths(vec![PathBuf::from("/nonexistent/biofusion.toml")])
            .without_environment();
        let config = loader.load().unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_files_merge_in_order() {
        let first = write_temp(
            r#"
[engine]
seed = 11
buffer_capacity = 400
"#,
        );
        let second = write_temp(
            r#"
[engine]
seed = 12

[drift]
bound_policy = "reset"
"#,
        );

        let loader = ConfigLoader::with_paths(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ])
        .without_environment();
        let config = loader.load().unwrap();

        assert_eq!(config.engine.seed, 12);
        assert_eq!(config.engine.buffer_capacity, 400);
        assert_eq!(config.drift.bound_policy, DriftBoundPolicy::Reset);
    }

    #[test]
    fn test_invalid_config_validation() {
        let loader = ConfigLoader::new();
        let temp_file = write_temp(
            r#"
[artifacts]
probability = 1.5
"#,
        );

        let result = loader.validate_config_file(temp_file.path());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp_file = write_temp("[engine\nseed = ");
        let loader = ConfigLoader::with_paths(vec![temp_file.path().to_path_buf()]).without_environment();
        assert!(matches!(loader.load(), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file_validation() {
        let loader = ConfigLoader::new();
        let result = loader.validate_config_file("/nonexistent/config.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_environment_override_parsing() {
        let mut merged = toml::Value::try_from(EngineConfig::default()).unwrap();
        apply_environment_overrides(
            &mut merged,
            vec![
                ("BIOFUSION_ENGINE__TICK_INTERVAL_MS".to_string(), "20".to_string()),
                ("BIOFUSION_DRIFT__CEILING".to_string(), "1".to_string()),
                ("UNRELATED_VAR".to_string(), "x".to_string()),
            ],
        );

        let config: EngineConfig = merged.try_into().unwrap();
        assert_eq!(config.engine.tick_interval_ms, 20);
        assert_eq!(config.drift.ceiling, 1.0);
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        std::env::set_var("BIOFUSION_ENGINE__SEED", "4242");

        let loader = ConfigLoader::with_paths(Vec::new());
        let config = loader.load().unwrap();

        std::env::remove_var("BIOFUSION_ENGINE__SEED");

        assert_eq!(config.engine.seed, 4242);
    }

    #[test]
    fn test_config_export() {
        let temp_file = NamedTempFile::new().unwrap();
        ConfigLoader::export_config(&EngineConfig::default(), temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("[engine]"));

        let loader = ConfigLoader::new();
        let reloaded = loader.validate_config_file(temp_file.path()).unwrap();
        assert_eq!(reloaded, EngineConfig::default());
    }
}

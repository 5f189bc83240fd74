// src/error.rs
//! Crate-level error type
//!
//! The tick path never fails: numeric edge cases are resolved by clamping.
//! Errors only surface when an engine is built from a bad configuration or
//! when the scheduler task cannot be joined.

use crate::acquisition::WindowError;
use crate::config::{ConfigError, ValidationError};
use thiserror::Error;

/// Convenience result alias
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine construction and lifecycle errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration rejected by validation
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(#[from] ValidationError),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A sample window could not be allocated
    #[error("Window allocation failed: {0}")]
    Window(#[from] WindowError),

    /// The scheduler task panicked or was aborted
    #[error("Scheduler task failed: {0}")]
    Scheduler(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_conversion() {
        let validation = ValidationError::OutOfRange {
            field: "engine.buffer_capacity".to_string(),
            value: "0".to_string(),
            min: "1".to_string(),
            max: "100000".to_string(),
        };
        let err: EngineError = validation.into();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
        assert!(err.to_string().contains("engine.buffer_capacity"));
    }

    #[test]
    fn test_window_error_conversion() {
        let err: EngineError = WindowError::InvalidCapacity.into();
        assert!(matches!(err, EngineError::Window(_)));
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: EngineError = ConfigError::FileNotFound("a.toml".to_string()).into();
        assert_eq!(err.to_string(), "Configuration file not found: a.toml");
    }
}

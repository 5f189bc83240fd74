// src/config/validation.rs
//! Validation helpers for engine configuration
//!
//! Range checks return [`ValidationError`] values that name the offending
//! field with its dotted TOML path, so a rejected file points straight at
//! the key that needs fixing.

use std::fmt::Display;
use thiserror::Error;

/// Validation result type
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of valid range
    #[error("Field '{field}' value '{value}' is out of range [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },

    /// Value is NaN or infinite
    #[error("Field '{field}' must be a finite number, got '{value}'")]
    NotFinite { field: String, value: String },

    /// Array size violation
    #[error("Field '{field}' array size {actual} is outside [{min}, {max}]")]
    InvalidArraySize {
        field: String,
        actual: usize,
        min: usize,
        max: usize,
    },

    /// Cross-field validation failure
    #[error("Constraint violation for fields [{}]: {message}", fields.join(", "))]
    ConstraintViolation { fields: Vec<String>, message: String },
}

/// Check that a numeric value lies inside `[min, max]`
pub fn validate_range<T>(field: &str, value: T, min: T, max: T) -> ValidationResult<()>
where
    T: PartialOrd + Display + Copy,
{
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Check that a float is finite and inside `[min, max]`
pub fn validate_finite_range(field: &str, value: f64, min: f64, max: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    validate_range(field, value, min, max)
}

/// Check a probability lies in `[0, 1]`
pub fn validate_probability(field: &str, value: f64) -> ValidationResult<()> {
    validate_finite_range(field, value, 0.0, 1.0)
}

/// Check that `low <= high` for a pair of bound fields
pub fn validate_ordered<T>(low_field: &str, low: T, high_field: &str, high: T) -> ValidationResult<()>
where
    T: PartialOrd + Display,
{
    if low > high {
        return Err(ValidationError::ConstraintViolation {
            fields: vec![low_field.to_string(), high_field.to_string()],
            message: format!("{} ({}) must not exceed {} ({})", low_field, low, high_field, high),
        });
    }
    Ok(())
}

/// Check a list length lies inside `[min, max]`
pub fn validate_len(field: &str, actual: usize, min: usize, max: usize) -> ValidationResult<()> {
    if actual < min || actual > max {
        return Err(ValidationError::InvalidArraySize {
            field: field.to_string(),
            actual,
            min,
            max,
        });
    }
    Ok(())
}

//! Configuration validation for fixture verification.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{CompareConfig, MatchingConfig, OutputConfig, ToleranceConfig, VerifyConfig};
use crate::error::{FixtureError, Result};
use thiserror::Error;

/// Narrowest value column a text report can still render.
const MIN_VALUE_WIDTH: usize = 8;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, Error)]
#[error("{field}: {message}")]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// Fail with every validation message joined when `config` is invalid.
pub(crate) fn ensure_valid(config: &impl Validatable) -> Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    Err(FixtureError::validation(messages.join("; ")))
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for VerifyConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.compare.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for CompareConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.tolerance.validate());
        errors.extend(self.matching.validate());
        errors
    }
}

impl Validatable for ToleranceConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for (field, value) in [("relative", self.relative), ("absolute", self.absolute)] {
            if !value.is_finite() || !(0.0..1.0).contains(&value) {
                errors.push(ConfigError {
                    field: format!("compare.tolerance.{field}"),
                    message: format!("Tolerance must be finite and in [0.0, 1.0), got {value}"),
                });
            }
        }
        errors
    }
}

impl Validatable for MatchingConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.hungarian_threshold == 0 {
            errors.push(ConfigError {
                field: "compare.matching.hungarian_threshold".to_string(),
                message: "Hungarian threshold must be at least 1".to_string(),
            });
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.max_value_width < MIN_VALUE_WIDTH {
            errors.push(ConfigError {
                field: "output.max_value_width".to_string(),
                message: format!(
                    "Value width must be at least {MIN_VALUE_WIDTH}, got {}",
                    self.max_value_width
                ),
            });
        }
        errors
    }
}

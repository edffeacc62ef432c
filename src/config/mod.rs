//! Configuration module for fixture-verify.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common use cases
//! - YAML config files, layered user then project
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fixture_verify::config::{ConfigPreset, VerifyConfig};
//!
//! // Use defaults
//! let config = VerifyConfig::default();
//!
//! // Use a preset
//! let config = VerifyConfig::from_preset(ConfigPreset::FailFast);
//!
//! // Use builder
//! let config = VerifyConfig::builder()
//!     .absolute_tolerance(1e-6)
//!     .color(true)
//!     .build();
//!
//! // Load the files that apply to the current directory
//! use fixture_verify::config::load_layered;
//! let (config, files) = load_layered(&std::env::current_dir()?)?;
//! ```
//!
//! # Configuration File
//!
//! Place a `.fixture-verify.yaml` file in your project (the nearest one above
//! the working directory applies) or in `~/.config/fixture-verify/`:
//!
//! ```yaml
//! compare:
//!   stop_at_first_difference: false
//!   tolerance:
//!     relative: 1.0e-9
//!     absolute: 1.0e-9
//! output:
//!   format: text
//!   color: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::ConfigPreset;
pub use types::{
    CompareConfig, MatchingConfig, OutputConfig, ToleranceConfig, VerifyConfig,
    VerifyConfigBuilder,
};
pub(crate) use validation::ensure_valid;
pub use validation::{ConfigError, Validatable};

pub use file::{
    find_project_config, generate_example_config, load_config_file, load_layered,
    load_or_default, user_config_file, CONFIG_FILE_NAMES,
};

use crate::error::Result;

/// Generate a JSON Schema for the `VerifyConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.fixture-verify.yaml` config files. It can be used by editors for
/// validation and autocompletion.
pub fn generate_json_schema() -> Result<String> {
    let schema = schemars::schema_for!(VerifyConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}

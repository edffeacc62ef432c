//! Configuration types for fixture verification.
//!
//! Provides structured configuration for comparison behavior and report output.

use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Unified Configuration
// ============================================================================

/// Top-level configuration for a [`DiffEngine`](crate::diff::DiffEngine).
///
/// Can be built in code, taken from a preset, or loaded from a
/// `.fixture-verify.yaml` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct VerifyConfig {
    /// How values are compared
    pub compare: CompareConfig,
    /// How differences are rendered
    pub output: OutputConfig,
}

impl VerifyConfig {
    /// Create a `VerifyConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a `VerifyConfig` builder.
    pub fn builder() -> VerifyConfigBuilder {
        VerifyConfigBuilder::default()
    }
}

// ============================================================================
// Builder for VerifyConfig
// ============================================================================

/// Builder for constructing `VerifyConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct VerifyConfigBuilder {
    config: VerifyConfig,
}

impl VerifyConfigBuilder {
    /// Stop at the first difference instead of reporting all of them.
    pub const fn stop_at_first_difference(mut self, stop: bool) -> Self {
        self.config.compare.stop_at_first_difference = stop;
        self
    }

    /// Set the relative numeric tolerance.
    pub const fn relative_tolerance(mut self, relative: f64) -> Self {
        self.config.compare.tolerance.relative = relative;
        self
    }

    /// Set the absolute numeric tolerance.
    pub const fn absolute_tolerance(mut self, absolute: f64) -> Self {
        self.config.compare.tolerance.absolute = absolute;
        self
    }

    /// Set the largest unordered collection matched with the Hungarian algorithm.
    pub const fn hungarian_threshold(mut self, threshold: usize) -> Self {
        self.config.compare.matching.hungarian_threshold = threshold;
        self
    }

    /// Set the report format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Enable ANSI colors in text reports.
    pub const fn color(mut self, color: bool) -> Self {
        self.config.output.color = color;
        self
    }

    /// Set the display width after which rendered values are truncated.
    pub const fn max_value_width(mut self, width: usize) -> Self {
        self.config.output.max_value_width = width;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> VerifyConfig {
        self.config
    }
}

// ============================================================================
// Comparison Configuration
// ============================================================================

/// Comparison behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CompareConfig {
    /// Stop at the first difference (default: report all)
    pub stop_at_first_difference: bool,
    /// Numeric tolerance
    pub tolerance: ToleranceConfig,
    /// Unordered collection matching
    pub matching: MatchingConfig,
}

/// Tolerance applied when comparing non-integral numbers.
///
/// Two numbers are equal when their distance is within `absolute`, or within
/// `relative` times the larger magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ToleranceConfig {
    pub relative: f64,
    pub absolute: f64,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            relative: 1e-9,
            absolute: 1e-9,
        }
    }
}

impl ToleranceConfig {
    /// Exact comparison.
    #[must_use]
    pub const fn exact() -> Self {
        Self {
            relative: 0.0,
            absolute: 0.0,
        }
    }
}

/// Unordered collection matching.
///
/// Greedy assignment is only exact when "compares equal" is transitive. A
/// numeric tolerance makes it non-transitive (1.0 ~ 1.5 and 1.5 ~ 2.0, but
/// not 1.0 ~ 2.0), so above the threshold a collection of near-equal numbers
/// can be reported as different even though a perfect pairing exists. Raise
/// the threshold for large collections compared under a loose tolerance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MatchingConfig {
    /// Largest collection size matched with the Hungarian algorithm;
    /// larger collections use greedy assignment, which may miss pairings
    /// under a tolerance
    pub hungarian_threshold: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            hungarian_threshold: 256,
        }
    }
}

// ============================================================================
// Output Configuration
// ============================================================================

/// Report rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format
    pub format: ReportFormat,
    /// ANSI colors in text reports
    pub color: bool,
    /// Display width after which rendered values are truncated
    pub max_value_width: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            color: false,
            max_value_width: 80,
        }
    }
}

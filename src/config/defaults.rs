//! Default configurations and presets for fixture verification.
//!
//! Provides named presets for common use cases.

use super::types::{CompareConfig, MatchingConfig, OutputConfig, ToleranceConfig, VerifyConfig};
use crate::reports::ReportFormat;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Report every difference with the default numeric tolerance
    Default,
    /// Exact numeric comparison
    Strict,
    /// Abort at the first difference
    FailFast,
    /// Machine-readable output for pipelines
    Ci,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Strict => "strict",
            Self::FailFast => "fail-fast",
            Self::Ci => "ci",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "balanced" => Some(Self::Default),
            "strict" | "exact" => Some(Self::Strict),
            "fail-fast" | "failfast" | "first" => Some(Self::FailFast),
            "ci" | "ci-cd" | "pipeline" => Some(Self::Ci),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Report every difference, absorbing floating-point noise",
            Self::Strict => "Report every difference, numbers must match exactly",
            Self::FailFast => "Stop at the first difference found",
            Self::Ci => "JSON output without colors for CI pipelines",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Strict, Self::FailFast, Self::Ci]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl VerifyConfig {
    /// Create a `VerifyConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::Strict => Self::strict_preset(),
            ConfigPreset::FailFast => Self::fail_fast_preset(),
            ConfigPreset::Ci => Self::ci_preset(),
        }
    }

    /// Exact numeric comparison, every difference reported.
    #[must_use]
    pub fn strict_preset() -> Self {
        Self {
            compare: CompareConfig {
                stop_at_first_difference: false,
                tolerance: ToleranceConfig::exact(),
                matching: MatchingConfig::default(),
            },
            output: OutputConfig::default(),
        }
    }

    /// Stop at the first difference.
    #[must_use]
    pub fn fail_fast_preset() -> Self {
        Self {
            compare: CompareConfig {
                stop_at_first_difference: true,
                ..CompareConfig::default()
            },
            output: OutputConfig::default(),
        }
    }

    /// JSON output without colors.
    #[must_use]
    pub fn ci_preset() -> Self {
        Self {
            compare: CompareConfig::default(),
            output: OutputConfig {
                format: ReportFormat::Json,
                color: false,
                ..OutputConfig::default()
            },
        }
    }
}

//! Configuration files.
//!
//! A project keeps its settings in `.fixture-verify.yaml` (or one of the other
//! [`CONFIG_FILE_NAMES`]) next to its tests. The nearest such file at or above
//! the starting directory applies, layered over an optional file in the user
//! config directory (`~/.config/fixture-verify/` on Linux).

use super::types::{MatchingConfig, OutputConfig, ToleranceConfig, VerifyConfig};
use super::validation::ensure_valid;
use crate::error::{ErrorContext, FixtureError, Result};
use std::path::{Path, PathBuf};

/// File names recognized as configuration, in order of preference.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".fixture-verify.yaml",
    ".fixture-verify.yml",
    "fixture-verify.yaml",
    "fixture-verify.yml",
];

/// Nearest config file in `start` or one of its ancestors.
#[must_use]
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(find_config_in_dir)
}

/// Config file in the user configuration directory, if any.
#[must_use]
pub fn user_config_file() -> Option<PathBuf> {
    dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("fixture-verify")))
}

fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Read, parse and validate a single config file.
pub fn load_config_file(path: &Path) -> Result<VerifyConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| FixtureError::io(path, e))?;
    let config: VerifyConfig = serde_yaml::from_str(&content)
        .map_err(|e| FixtureError::config(format!("{}: {e}", path.display())))?;
    ensure_valid(&config).with_context(|| path.display().to_string())?;
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Load the user config, then the nearest project config on top of it.
///
/// Returns the merged configuration and the files it was read from, user
/// file first. With no config files at all this is the default config.
pub fn load_layered(start: &Path) -> Result<(VerifyConfig, Vec<PathBuf>)> {
    let layers: Vec<PathBuf> = user_config_file()
        .into_iter()
        .chain(find_project_config(start))
        .collect();
    load_layers(&layers).map(|config| (config, layers))
}

fn load_layers(layers: &[PathBuf]) -> Result<VerifyConfig> {
    let mut config = VerifyConfig::default();
    for path in layers {
        config.merge(&load_config_file(path)?);
    }
    ensure_valid(&config).context("merging configuration files")?;
    Ok(config)
}

/// [`load_layered`], falling back to defaults when a file cannot be used.
#[must_use]
pub fn load_or_default(start: &Path) -> (VerifyConfig, Vec<PathBuf>) {
    load_layered(start).unwrap_or_else(|e| {
        tracing::warn!("Ignoring configuration files: {}", e);
        (VerifyConfig::default(), Vec::new())
    })
}

impl VerifyConfig {
    /// Merge another config into this one, with `other` taking precedence
    /// wherever it differs from the defaults.
    pub fn merge(&mut self, other: &Self) {
        if other.compare.stop_at_first_difference {
            self.compare.stop_at_first_difference = true;
        }
        let default_tolerance = ToleranceConfig::default();
        if other.compare.tolerance.relative.to_bits() != default_tolerance.relative.to_bits() {
            self.compare.tolerance.relative = other.compare.tolerance.relative;
        }
        if other.compare.tolerance.absolute.to_bits() != default_tolerance.absolute.to_bits() {
            self.compare.tolerance.absolute = other.compare.tolerance.absolute;
        }
        if other.compare.matching != MatchingConfig::default() {
            self.compare.matching = other.compare.matching.clone();
        }

        let default_output = OutputConfig::default();
        if other.output.format != default_output.format {
            self.output.format = other.output.format;
        }
        if other.output.color {
            self.output.color = true;
        }
        if other.output.max_value_width != default_output.max_value_width {
            self.output.max_value_width = other.output.max_value_width;
        }
    }
}

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = VerifyConfig::default();
    format!(
        r"# Fixture verification configuration
# Place this file at .fixture-verify.yaml in your project root or ~/.config/fixture-verify/

{}
",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::ReportFormat;
    use tempfile::TempDir;

    #[test]
    fn test_project_config_found_in_ancestor() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".fixture-verify.yaml");
        std::fs::write(&config_path, "compare:\n  stop_at_first_difference: true\n").unwrap();
        let nested = tmp.path().join("tests").join("fixtures");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_config(&nested), Some(config_path));
    }

    #[test]
    fn test_nearest_project_config_wins() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("fixture-verify.yml"), "output:\n  color: true\n").unwrap();
        let nested = tmp.path().join("sub");
        std::fs::create_dir(&nested).unwrap();
        let near = nested.join(".fixture-verify.yml");
        std::fs::write(&near, "output:\n  format: json\n").unwrap();

        assert_eq!(find_project_config(&nested), Some(near));
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");

        let yaml = r"
compare:
  stop_at_first_difference: true
  tolerance:
    absolute: 0.001
output:
  format: json
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert!(config.compare.stop_at_first_difference);
        assert_eq!(config.compare.tolerance.absolute, 0.001);
        assert_eq!(config.compare.tolerance.relative, 1e-9);
        assert_eq!(config.output.format, ReportFormat::Json);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = load_config_file(Path::new("/nonexistent/config.yaml")).unwrap_err();
        match err {
            FixtureError::Io { path, .. } => {
                assert_eq!(path, Some(PathBuf::from("/nonexistent/config.yaml")));
            }
            other => panic!("expected IO error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_is_a_config_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("broken.yaml");
        std::fs::write(&config_path, "compare: [not, a, map]\n").unwrap();

        let err = load_config_file(&config_path).unwrap_err();
        assert!(matches!(err, FixtureError::Config(ref msg) if msg.contains("broken.yaml")));
    }

    #[test]
    fn test_invalid_values_are_rejected_on_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        std::fs::write(&config_path, "output:\n  max_value_width: 2\n").unwrap();

        let err = load_config_file(&config_path).unwrap_err();
        match err {
            FixtureError::Validation(msg) => {
                assert!(msg.contains("config.yaml"));
                assert!(msg.contains("output.max_value_width"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_layers_merge_in_order() {
        let tmp = TempDir::new().unwrap();
        let user = tmp.path().join("user.yaml");
        std::fs::write(&user, "output:\n  color: true\n  format: json\n").unwrap();
        let project = tmp.path().join("project.yaml");
        std::fs::write(&project, "compare:\n  tolerance:\n    absolute: 0.01\n").unwrap();

        let config = load_layers(&[user, project]).unwrap();
        assert!(config.output.color);
        assert_eq!(config.output.format, ReportFormat::Json);
        assert_eq!(config.compare.tolerance.absolute, 0.01);
    }

    #[test]
    fn test_config_merge() {
        let mut base = VerifyConfig::default();
        let overrides = VerifyConfig::builder()
            .stop_at_first_difference(true)
            .absolute_tolerance(0.01)
            .output_format(ReportFormat::Json)
            .build();

        base.merge(&overrides);

        assert!(base.compare.stop_at_first_difference);
        assert_eq!(base.compare.tolerance.absolute, 0.01);
        assert_eq!(base.compare.tolerance.relative, 1e-9);
        assert_eq!(base.output.format, ReportFormat::Json);
    }

    #[test]
    fn test_generate_example_config() {
        let example = generate_example_config();
        assert!(example.contains("compare:"));
        assert!(example.contains("hungarian_threshold"));
    }
}

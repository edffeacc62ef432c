//! Report type definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Indented plain-text listing
    #[default]
    Text,
    /// Structured JSON output
    Json,
}

impl ReportFormat {
    /// Parse a format name. Returns None for unrecognized values.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_agree() {
        for format in [ReportFormat::Text, ReportFormat::Json] {
            assert_eq!(ReportFormat::parse(&format.to_string()), Some(format));
        }
        assert_eq!(ReportFormat::parse("JSON"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::parse("sarif"), None);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ReportFormat::Json).unwrap();
        assert_eq!(json, "\"json\"");
    }
}

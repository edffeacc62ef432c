//! Rendering of difference trees and reconciliation outcomes.
//!
//! Reporters only read the captured [`Difference`] tree: every value in it
//! was turned into a [`Snapshot`](crate::diff::Snapshot) during comparison,
//! so rendering never walks the compared graphs and cannot fail on them.
//!
//! - Text: indented `path: expected vs actual` listing for test output
//! - JSON: structured data for tooling

mod json;
mod text;
mod types;

pub use json::JsonReporter;
pub use text::TextReporter;
pub use types::ReportFormat;

use crate::config::OutputConfig;
use crate::diff::Difference;
use crate::error::{FixtureError, ReportErrorKind};
use crate::reconcile::ReconcileReport;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<ReportError> for FixtureError {
    fn from(err: ReportError) -> Self {
        let kind = match err {
            ReportError::SerializationError(message) => {
                ReportErrorKind::JsonSerializationError(message)
            }
            ReportError::FormatError(e) => ReportErrorKind::FormatError(e.to_string()),
        };
        Self::report("rendering report", kind)
    }
}

/// Trait for report generators
pub trait DifferenceReporter {
    /// Render a difference tree
    fn render(&self, difference: &Difference) -> Result<String, ReportError>;

    /// Render the outcome of a reconciliation
    fn render_reconciliation(&self, report: &ReconcileReport) -> Result<String, ReportError>;

    /// Get the format this reporter produces
    fn format(&self) -> ReportFormat;
}

/// Create a reporter for the configured output
#[must_use]
pub fn create_reporter(config: &OutputConfig) -> Box<dyn DifferenceReporter> {
    match config.format {
        ReportFormat::Text => Box::new(
            TextReporter::new()
                .with_colors(config.color)
                .max_value_width(config.max_value_width),
        ),
        ReportFormat::Json => Box::new(JsonReporter::new()),
    }
}

/// "1 difference", "3 differences".
pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

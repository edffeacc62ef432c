//! JSON report generator.

use super::{DifferenceReporter, ReportError, ReportFormat};
use crate::diff::Difference;
use crate::reconcile::ReconcileReport;
use serde::Serialize;

/// JSON report generator
#[derive(Debug, Clone)]
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Result<String, ReportError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonDifferenceReport<'a> {
    tool: ToolInfo,
    count: usize,
    paths: Vec<String>,
    difference: &'a Difference,
}

#[derive(Serialize)]
struct JsonReconcileReport<'a> {
    tool: ToolInfo,
    success: bool,
    failure_count: usize,
    #[serde(flatten)]
    outcome: &'a ReconcileReport,
}

#[derive(Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}

impl ToolInfo {
    const fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

impl DifferenceReporter for JsonReporter {
    fn render(&self, difference: &Difference) -> Result<String, ReportError> {
        self.to_json(&JsonDifferenceReport {
            tool: ToolInfo::current(),
            count: difference.count(),
            paths: difference.paths(),
            difference,
        })
    }

    fn render_reconciliation(&self, report: &ReconcileReport) -> Result<String, ReportError> {
        self.to_json(&JsonReconcileReport {
            tool: ToolInfo::current(),
            success: report.is_success(),
            failure_count: report.failure_count(),
            outcome: report,
        })
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

//! Comparison orchestrator.

use super::{CompareContext, Difference};
use crate::config::file::load_layered;
use crate::config::{ensure_valid, OutputConfig, ToleranceConfig, VerifyConfig};
use crate::error::{FixtureError, Result};
use crate::model::{EntityGraph, Value};
use crate::reconcile::ReconcileReport;
use crate::reports::create_reporter;
use crate::schema::SchemaRegistry;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Failure of an assertion.
///
/// Separates data failures (the graphs differ) from harness faults (the
/// schema, a collaborator or the record graph itself is broken).
#[derive(Error, Debug)]
pub enum AssertionError {
    /// The compared values are not equivalent
    #[error("{report}")]
    Mismatch {
        report: String,
        difference: Difference,
    },

    /// Reconciliation against the live store failed
    #[error("{report}")]
    Unreconciled {
        report: String,
        outcome: ReconcileReport,
    },

    /// The comparison could not be carried out
    #[error(transparent)]
    Fault(#[from] FixtureError),
}

impl AssertionError {
    /// Whether this is a data failure rather than a fault.
    #[must_use]
    pub const fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch { .. } | Self::Unreconciled { .. })
    }

    #[must_use]
    pub const fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }

    /// The difference tree of a structural mismatch.
    #[must_use]
    pub const fn difference(&self) -> Option<&Difference> {
        match self {
            Self::Mismatch { difference, .. } => Some(difference),
            _ => None,
        }
    }
}

/// Deep-equality engine for record graphs.
///
/// The engine itself is stateless across calls: every comparison gets a fresh
/// [`CompareContext`]. The schema registry is shared read-only and may be
/// used by any number of engines at once.
#[derive(Debug, Clone)]
pub struct DiffEngine {
    registry: Arc<SchemaRegistry>,
    config: VerifyConfig,
}

impl DiffEngine {
    /// Create an engine with default settings.
    #[must_use]
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            config: VerifyConfig::default(),
        }
    }

    /// Create an engine from a validated configuration.
    pub fn from_config(registry: Arc<SchemaRegistry>, config: &VerifyConfig) -> Result<Self> {
        ensure_valid(config)?;
        Ok(Self::new(registry).with_config(config.clone()))
    }

    /// Create an engine configured from the config files that apply to
    /// `start` (see [`load_layered`]).
    pub fn from_config_files(registry: Arc<SchemaRegistry>, start: &Path) -> Result<Self> {
        let (config, files) = load_layered(start)?;
        tracing::debug!("Engine configured from {} file(s)", files.len());
        Ok(Self::new(registry).with_config(config))
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: VerifyConfig) -> Self {
        self.config = config;
        self
    }

    /// Stop at the first difference instead of collecting all of them.
    #[must_use]
    pub const fn stop_at_first_difference(mut self, stop: bool) -> Self {
        self.config.compare.stop_at_first_difference = stop;
        self
    }

    /// Set the numeric tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: ToleranceConfig) -> Self {
        self.config.compare.tolerance = tolerance;
        self
    }

    /// Set report rendering options.
    #[must_use]
    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.config.output = output;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn config(&self) -> &VerifyConfig {
        &self.config
    }

    /// Compare two values. `None` means they are equivalent.
    pub fn diff(&self, expected: &Value, actual: &Value) -> Result<Option<Difference>> {
        let mut ctx = CompareContext::new(&self.registry, &self.config.compare);
        let outcome = ctx.diff(expected, actual)?;
        match &outcome {
            Some(difference) => {
                tracing::debug!("Comparison found {} differences", difference.count());
            }
            None => tracing::debug!("Values are equivalent"),
        }
        Ok(outcome)
    }

    /// Compare the top-level records of two graphs, regardless of order.
    pub fn diff_graphs(
        &self,
        expected: &EntityGraph,
        actual: &EntityGraph,
    ) -> Result<Option<Difference>> {
        tracing::debug!(
            "Comparing graphs with {} and {} top-level records",
            expected.roots().len(),
            actual.roots().len()
        );
        self.diff(&expected.roots_value(), &actual.roots_value())
    }

    /// Succeed silently when the values are equivalent; otherwise fail with a
    /// rendered report.
    pub fn assert_graphs_equal(
        &self,
        expected: &Value,
        actual: &Value,
    ) -> std::result::Result<(), AssertionError> {
        match self.diff(expected, actual)? {
            None => Ok(()),
            Some(difference) => Err(self.mismatch(difference)?),
        }
    }

    /// [`assert_graphs_equal`](Self::assert_graphs_equal) over the top-level
    /// records of two graphs.
    pub fn assert_entity_graphs_equal(
        &self,
        expected: &EntityGraph,
        actual: &EntityGraph,
    ) -> std::result::Result<(), AssertionError> {
        match self.diff_graphs(expected, actual)? {
            None => Ok(()),
            Some(difference) => Err(self.mismatch(difference)?),
        }
    }

    /// Render a difference tree in the configured format.
    pub fn render(&self, difference: &Difference) -> Result<String> {
        Ok(create_reporter(&self.config.output).render(difference)?)
    }

    /// Render a reconciliation outcome in the configured format.
    pub fn render_reconciliation(&self, report: &ReconcileReport) -> Result<String> {
        Ok(create_reporter(&self.config.output).render_reconciliation(report)?)
    }

    fn mismatch(&self, difference: Difference) -> Result<AssertionError> {
        let report = self.render(&difference)?;
        Ok(AssertionError::Mismatch { report, difference })
    }
}

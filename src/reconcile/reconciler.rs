//! Reconciliation of expected records against the live store.

use super::{wrap_all, IdentityLookup, LiveLookup, RecordIdentity};
use crate::diff::{AssertionError, DiffEngine, Difference, MismatchReason, Snapshot};
use crate::error::{ErrorContext, Result};
use crate::model::{RecordRef, Value};
use serde::Serialize;

/// A record whose live counterpart differs from the expected one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordMismatch {
    /// `Kind#identifier` of the record
    pub identity: String,
    pub difference: Difference,
}

/// Outcome of one reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Expected records looked up and compared
    pub checked: usize,
    /// Setup records whose identity does not appear among the expected ones
    pub expected_removed: Vec<String>,
    /// Records expected to be removed but still found in the live store
    pub still_present: Vec<String>,
    /// Expected records that are missing from the store or differ from it
    pub mismatches: Vec<RecordMismatch>,
}

impl ReconcileReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.still_present.is_empty() && self.mismatches.is_empty()
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.still_present.len() + self.mismatches.len()
    }
}

/// Checks the live store against the records a test set up and the records
/// it expects to remain.
///
/// Records are matched by persistent identity, so a record mutated by the
/// test is recognized as changed rather than as removed and re-added.
pub struct Reconciler<'a> {
    engine: &'a DiffEngine,
    identity: &'a dyn IdentityLookup,
    live: &'a dyn LiveLookup,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        engine: &'a DiffEngine,
        identity: &'a dyn IdentityLookup,
        live: &'a dyn LiveLookup,
    ) -> Self {
        Self {
            engine,
            identity,
            live,
        }
    }

    /// Compare the live store against `setup` and `expected`, collecting
    /// every failure.
    ///
    /// Records present in `setup` but not in `expected` must be gone from the
    /// store; every record in `expected` must be found and must compare equal
    /// to its live counterpart.
    pub fn reconcile(
        &self,
        setup: &[RecordRef],
        expected: &[RecordRef],
    ) -> Result<ReconcileReport> {
        let stop_at_first = self.engine.config().compare.stop_at_first_difference;
        let setup_ids = wrap_all(self.identity, setup).context("wrapping setup records")?;
        let expected_ids =
            wrap_all(self.identity, expected).context("wrapping expected records")?;

        let mut report = ReconcileReport::default();

        for identity in setup_ids.difference(&expected_ids) {
            report.expected_removed.push(identity.to_string());
            if self.lookup(identity)?.is_some() {
                tracing::debug!("Expected {} to be removed, but it was present", identity);
                report.still_present.push(identity.to_string());
                if stop_at_first {
                    return Ok(report);
                }
            }
        }

        for identity in &expected_ids {
            report.checked += 1;
            let expected_value = Value::from(identity.record());
            let difference = match self.lookup(identity)? {
                None => Some(Difference::leaf(
                    Snapshot::capture(&expected_value, self.engine.registry()),
                    Snapshot::absent(),
                    MismatchReason::Missing,
                )),
                Some(live) => self
                    .engine
                    .diff(&expected_value, &live)
                    .with_context(|| format!("comparing {identity} with its live counterpart"))?,
            };
            if let Some(difference) = difference {
                report.mismatches.push(RecordMismatch {
                    identity: identity.to_string(),
                    difference,
                });
                if stop_at_first {
                    break;
                }
            }
        }

        tracing::debug!(
            "Reconciled {} records: {} expected removed, {} failures",
            report.checked,
            report.expected_removed.len(),
            report.failure_count()
        );
        Ok(report)
    }

    /// Reconcile and fail with a rendered report when anything is off.
    pub fn verify(
        &self,
        setup: &[RecordRef],
        expected: &[RecordRef],
    ) -> std::result::Result<(), AssertionError> {
        let outcome = self.reconcile(setup, expected)?;
        if outcome.is_success() {
            return Ok(());
        }
        let report = self.engine.render_reconciliation(&outcome)?;
        Err(AssertionError::Unreconciled { report, outcome })
    }

    fn lookup(&self, identity: &RecordIdentity) -> Result<Option<Value>> {
        tracing::debug!(
            "Looking up entity {} with ID {}",
            identity.kind(),
            identity.identifier()
        );
        self.live
            .find(identity.kind(), identity.identifier())
            .with_context(|| format!("looking up {identity}"))
    }
}

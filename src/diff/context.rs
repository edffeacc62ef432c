//! Per-comparison state and category dispatch.

use super::comparators::comparator_for;
use super::{classify, Category, Difference, MismatchReason, Snapshot};
use crate::config::CompareConfig;
use crate::error::Result;
use crate::model::{RecordRef, Value};
use crate::schema::SchemaRegistry;
use std::collections::HashSet;

/// State of one orchestrated comparison.
///
/// Created fresh for every top-level call; nothing here outlives it. Holds the
/// read-only schema and settings plus the set of record pairs currently being
/// compared on the recursion path.
pub struct CompareContext<'a> {
    registry: &'a SchemaRegistry,
    config: &'a CompareConfig,
    stop_at_first: bool,
    probing: bool,
    in_progress: HashSet<(usize, usize)>,
}

impl<'a> CompareContext<'a> {
    pub fn new(registry: &'a SchemaRegistry, config: &'a CompareConfig) -> Self {
        Self {
            registry,
            config,
            stop_at_first: config.stop_at_first_difference,
            probing: false,
            in_progress: HashSet::new(),
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    #[must_use]
    pub const fn config(&self) -> &'a CompareConfig {
        self.config
    }

    /// Whether comparators should return after the first difference.
    #[must_use]
    pub const fn stop_at_first(&self) -> bool {
        self.stop_at_first
    }

    /// Whether the current comparison only needs a yes/no answer.
    #[must_use]
    pub const fn is_probing(&self) -> bool {
        self.probing
    }

    /// Compare two values of any category.
    pub fn diff(&mut self, expected: &Value, actual: &Value) -> Result<Option<Difference>> {
        let category = classify(expected);
        if !matches!(category, Category::Lazy | Category::Null) {
            if matches!(actual, Value::Lazy(_)) {
                return comparator_for(Category::Lazy).diff(expected, actual, self);
            }
            if actual.is_null() {
                return Ok(Some(self.leaf(expected, actual, MismatchReason::Null)));
            }
        }
        comparator_for(category).diff(expected, actual, self)
    }

    /// Whether two values are equivalent, stopping at the first difference.
    ///
    /// Faults still propagate.
    pub fn probe_equal(&mut self, expected: &Value, actual: &Value) -> Result<bool> {
        let saved = (self.stop_at_first, self.probing);
        self.stop_at_first = true;
        self.probing = true;
        let outcome = self.diff(expected, actual);
        (self.stop_at_first, self.probing) = saved;
        Ok(outcome?.is_none())
    }

    /// Mark a record pair as in progress. Returns `false` when the pair is
    /// already being compared further up the recursion path.
    pub(crate) fn enter(&mut self, expected: &RecordRef, actual: &RecordRef) -> bool {
        self.in_progress.insert((expected.address(), actual.address()))
    }

    pub(crate) fn leave(&mut self, expected: &RecordRef, actual: &RecordRef) {
        self.in_progress.remove(&(expected.address(), actual.address()));
    }

    /// Capture a value for the difference tree.
    #[must_use]
    pub fn snapshot(&self, value: &Value) -> Snapshot {
        Snapshot::capture(value, self.registry)
    }

    /// A leaf recording both values.
    #[must_use]
    pub fn leaf(&self, expected: &Value, actual: &Value, reason: MismatchReason) -> Difference {
        Difference::leaf(self.snapshot(expected), self.snapshot(actual), reason)
    }

    /// A leaf for values of incompatible categories.
    #[must_use]
    pub fn category_mismatch(&self, expected: &Value, actual: &Value) -> Difference {
        self.leaf(
            expected,
            actual,
            MismatchReason::Category {
                expected: classify(expected),
                actual: classify(actual),
            },
        )
    }
}

//! Trait definitions for category comparators.

use super::{Category, CompareContext, Difference};
use crate::error::Result;
use crate::model::Value;

/// Comparison behavior for one [`Category`].
///
/// `expected` is always of the comparator's category; `actual` may be
/// anything, and a comparator that cannot make sense of it reports a
/// [`MismatchReason::Category`](super::MismatchReason::Category) leaf.
/// Nested values are compared by calling back into
/// [`CompareContext::diff`].
pub trait CategoryComparator: Send + Sync {
    /// The category this comparator handles.
    fn category(&self) -> Category;

    /// `Ok(None)` when the values are equivalent, a difference tree otherwise,
    /// and an error only for faults.
    fn diff(
        &self,
        expected: &Value,
        actual: &Value,
        ctx: &mut CompareContext<'_>,
    ) -> Result<Option<Difference>>;
}

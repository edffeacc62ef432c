//! Ordered sequence comparison.

use super::unordered::diff_unordered;
use crate::diff::{
    Category, CategoryComparator, CompareContext, Difference, MismatchReason, Snapshot,
};
use crate::error::Result;
use crate::model::Value;
use std::collections::BTreeMap;

/// Compares sequences position by position.
///
/// Positions present on one side only are reported individually. A sequence
/// compared against an unordered collection is compared as unordered.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceComparator;

impl CategoryComparator for SequenceComparator {
    fn category(&self) -> Category {
        Category::Sequence
    }

    fn diff(
        &self,
        expected: &Value,
        actual: &Value,
        ctx: &mut CompareContext<'_>,
    ) -> Result<Option<Difference>> {
        let Value::List(expected_items) = expected else {
            return Ok(Some(ctx.category_mismatch(expected, actual)));
        };
        match actual {
            Value::List(actual_items) => diff_ordered(expected_items, actual_items, ctx),
            Value::Bag(actual_items) => diff_unordered(expected_items, actual_items, ctx),
            _ => Ok(Some(ctx.category_mismatch(expected, actual))),
        }
    }
}

fn diff_ordered(
    expected: &[Value],
    actual: &[Value],
    ctx: &mut CompareContext<'_>,
) -> Result<Option<Difference>> {
    let mut elements = BTreeMap::new();

    for index in 0..expected.len().max(actual.len()) {
        let child = match (expected.get(index), actual.get(index)) {
            (Some(e), Some(a)) => ctx.diff(e, a)?,
            (Some(e), None) => Some(Difference::leaf(
                ctx.snapshot(e),
                Snapshot::absent(),
                MismatchReason::Missing,
            )),
            (None, Some(a)) => Some(Difference::leaf(
                Snapshot::absent(),
                ctx.snapshot(a),
                MismatchReason::Unexpected,
            )),
            (None, None) => None,
        };
        if let Some(difference) = child {
            elements.insert(index, difference);
            if ctx.stop_at_first() {
                break;
            }
        }
    }

    if elements.is_empty() && expected.len() == actual.len() {
        return Ok(None);
    }
    Ok(Some(Difference::Sequence {
        expected_len: expected.len(),
        actual_len: actual.len(),
        elements,
    }))
}

//! Lazy reference comparison.

use crate::diff::{Category, CategoryComparator, CompareContext, Difference, MismatchReason};
use crate::error::Result;
use crate::model::Value;

/// Materializes lazy references on either side, then compares what they
/// resolve to.
///
/// A reference whose target cannot be found is a mismatch; a loader failure
/// is a fault and aborts the comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct LazyComparator;

impl CategoryComparator for LazyComparator {
    fn category(&self) -> Category {
        Category::Lazy
    }

    fn diff(
        &self,
        expected: &Value,
        actual: &Value,
        ctx: &mut CompareContext<'_>,
    ) -> Result<Option<Difference>> {
        if let (Value::Lazy(e), Value::Lazy(a)) = (expected, actual) {
            if e.ptr_eq(a) {
                return Ok(None);
            }
        }

        match (resolve(expected)?, resolve(actual)?) {
            (Some(e), Some(a)) => ctx.diff(&e, &a),
            _ => Ok(Some(ctx.leaf(
                expected,
                actual,
                MismatchReason::UnresolvedReference,
            ))),
        }
    }
}

/// The materialized value, `None` for a reference to an absent record.
fn resolve(value: &Value) -> Result<Option<Value>> {
    match value {
        Value::Lazy(lazy) => lazy.resolve(),
        other => Ok(Some(other.clone())),
    }
}

//! Null comparison.

use crate::diff::{Category, CategoryComparator, CompareContext, Difference, MismatchReason};
use crate::error::Result;
use crate::model::Value;

/// Null equals only null.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullComparator;

impl CategoryComparator for NullComparator {
    fn category(&self) -> Category {
        Category::Null
    }

    fn diff(
        &self,
        expected: &Value,
        actual: &Value,
        ctx: &mut CompareContext<'_>,
    ) -> Result<Option<Difference>> {
        if expected.is_null() && actual.is_null() {
            Ok(None)
        } else {
            Ok(Some(ctx.leaf(expected, actual, MismatchReason::Null)))
        }
    }
}

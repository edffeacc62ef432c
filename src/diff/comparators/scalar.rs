//! Scalar comparison by canonical form.

use crate::diff::{Category, CategoryComparator, CompareContext, Difference, MismatchReason};
use crate::error::Result;
use crate::model::{Canonical, Scalar, Value};

/// Compares strings, booleans, dates, enums and wrapped identifiers by their
/// canonical form.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarComparator;

impl CategoryComparator for ScalarComparator {
    fn category(&self) -> Category {
        Category::Scalar
    }

    fn diff(
        &self,
        expected: &Value,
        actual: &Value,
        ctx: &mut CompareContext<'_>,
    ) -> Result<Option<Difference>> {
        let Value::Scalar(expected_scalar) = expected else {
            return Ok(Some(ctx.category_mismatch(expected, actual)));
        };

        let actual_canonical = match actual {
            Value::Scalar(actual_scalar) => actual_scalar.canonical(),
            // A wrapped identifier may stand for its raw number.
            Value::Number(n) if matches!(expected_scalar, Scalar::Wrapped { .. }) => {
                Canonical::Text(n.canonical_text())
            }
            _ => return Ok(Some(ctx.category_mismatch(expected, actual))),
        };

        if expected_scalar.canonical() == actual_canonical {
            Ok(None)
        } else {
            Ok(Some(ctx.leaf(expected, actual, MismatchReason::Value)))
        }
    }
}

//! Numeric comparison with tolerance.

use crate::config::ToleranceConfig;
use crate::diff::{Category, CategoryComparator, CompareContext, Difference, MismatchReason};
use crate::error::Result;
use crate::model::{Number, Scalar, Value};

/// Compares numbers of any boxed representation.
///
/// Integers compare exactly; anything involving a float compares within the
/// configured tolerance. A wrapped scalar on the actual side compares by
/// canonical form.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericComparator;

impl CategoryComparator for NumericComparator {
    fn category(&self) -> Category {
        Category::Numeric
    }

    fn diff(
        &self,
        expected: &Value,
        actual: &Value,
        ctx: &mut CompareContext<'_>,
    ) -> Result<Option<Difference>> {
        let Value::Number(expected_number) = expected else {
            return Ok(Some(ctx.category_mismatch(expected, actual)));
        };

        let (equal, reason) = match actual {
            Value::Number(actual_number) => (
                numbers_equal(*expected_number, *actual_number, &ctx.config().tolerance),
                MismatchReason::Numeric,
            ),
            Value::Scalar(wrapped @ Scalar::Wrapped { .. }) => (
                expected.canonical_primitive() == wrapped.canonical(),
                MismatchReason::Value,
            ),
            _ => return Ok(Some(ctx.category_mismatch(expected, actual))),
        };

        Ok((!equal).then(|| ctx.leaf(expected, actual, reason)))
    }
}

/// Whether two numbers denote the same value under `tolerance`.
///
/// NaN equals NaN so that every value equals itself.
#[must_use]
pub fn numbers_equal(expected: Number, actual: Number, tolerance: &ToleranceConfig) -> bool {
    if let (Some(x), Some(y)) = (expected.as_integer(), actual.as_integer()) {
        return x == y;
    }

    let (x, y) = (expected.as_f64(), actual.as_f64());
    if x.is_nan() || y.is_nan() {
        return x.is_nan() && y.is_nan();
    }
    if x == y {
        return true;
    }
    if !x.is_finite() || !y.is_finite() {
        return false;
    }

    let distance = (x - y).abs();
    distance <= tolerance.absolute || distance <= tolerance.relative * x.abs().max(y.abs())
}

//! Key-value mapping comparison.

use crate::diff::{Category, CategoryComparator, CompareContext, Difference};
use crate::error::{ErrorContext, Result};
use crate::model::Value;
use indexmap::IndexMap;

/// Compares mappings key by key. Keys present on one side only are reported
/// individually; values under shared keys are compared recursively.
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingComparator;

impl CategoryComparator for MappingComparator {
    fn category(&self) -> Category {
        Category::Mapping
    }

    fn diff(
        &self,
        expected: &Value,
        actual: &Value,
        ctx: &mut CompareContext<'_>,
    ) -> Result<Option<Difference>> {
        let (Value::Map(expected_entries), Value::Map(actual_entries)) = (expected, actual) else {
            return Ok(Some(ctx.category_mismatch(expected, actual)));
        };

        let mut missing = IndexMap::new();
        let mut unexpected = IndexMap::new();
        let mut values = IndexMap::new();

        for (key, expected_value) in expected_entries {
            match actual_entries.get(key) {
                Some(actual_value) => {
                    let child = ctx
                        .diff(expected_value, actual_value)
                        .with_context(|| format!("comparing key {key:?}"))?;
                    if let Some(difference) = child {
                        values.insert(key.clone(), difference);
                    }
                }
                None => {
                    missing.insert(key.clone(), ctx.snapshot(expected_value));
                }
            }
            if ctx.stop_at_first() && !(missing.is_empty() && values.is_empty()) {
                break;
            }
        }

        let found_any = !(missing.is_empty() && values.is_empty());
        if !(ctx.stop_at_first() && found_any) {
            for (key, actual_value) in actual_entries {
                if !expected_entries.contains_key(key) {
                    unexpected.insert(key.clone(), ctx.snapshot(actual_value));
                    if ctx.stop_at_first() {
                        break;
                    }
                }
            }
        }

        if missing.is_empty() && unexpected.is_empty() && values.is_empty() {
            return Ok(None);
        }
        Ok(Some(Difference::Mapping {
            missing,
            unexpected,
            values,
        }))
    }
}

//! Ownership-aware record traversal.
//!
//! Records are compared field by field along their kind chain. Two rules keep
//! traversal of bidirectional graphs finite and free of double reporting:
//!
//! - Non-owning fields are never compared. The owning side of the
//!   relationship reaches the same records, and the mirror adds nothing.
//! - A record pair already being compared further up the recursion path is
//!   treated as equal when reached again. This covers cycles that ownership
//!   metadata alone does not break (two owning fields forming a loop).

use super::{Category, CategoryComparator, CompareContext, Difference, MismatchReason};
use crate::error::{ErrorContext, FaultKind, FixtureError, Result};
use crate::model::{RecordRef, Value};
use crate::reconcile::identifier_of;
use crate::schema::KindSchema;
use indexmap::IndexMap;

/// Comparator for composite records.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphWalker;

impl CategoryComparator for GraphWalker {
    fn category(&self) -> Category {
        Category::Record
    }

    fn diff(
        &self,
        expected: &Value,
        actual: &Value,
        ctx: &mut CompareContext<'_>,
    ) -> Result<Option<Difference>> {
        let (Value::Record(e), Value::Record(a)) = (expected, actual) else {
            return Ok(Some(ctx.category_mismatch(expected, actual)));
        };
        if e.ptr_eq(a) {
            return Ok(None);
        }
        if e.kind() != a.kind() {
            return Ok(Some(ctx.leaf(expected, actual, MismatchReason::Kind)));
        }

        let chain = ctx.registry().kind_chain(e.kind())?;
        self.diff_record(e, a, &chain, ctx)
    }
}

impl GraphWalker {
    /// Compare two records of the same kind.
    ///
    /// `chain` is the record's kind followed by its ancestors; fields are
    /// compared in that order.
    pub fn diff_record(
        &self,
        expected: &RecordRef,
        actual: &RecordRef,
        chain: &[&KindSchema],
        ctx: &mut CompareContext<'_>,
    ) -> Result<Option<Difference>> {
        check_declared(expected, chain)?;
        check_declared(actual, chain)?;

        if !ctx.enter(expected, actual) {
            tracing::trace!(
                "Pair {:?} / {:?} already in progress, treating as equal",
                expected,
                actual
            );
            return Ok(None);
        }
        let outcome = diff_fields(expected, actual, chain, ctx);
        ctx.leave(expected, actual);

        let fields = outcome?;
        if fields.is_empty() {
            return Ok(None);
        }
        let identity = identifier_of(ctx.registry(), expected)
            .ok()
            .map(|id| format!("{}#{id}", expected.kind()));
        Ok(Some(Difference::Record {
            kind: expected.kind().to_string(),
            identity,
            fields,
        }))
    }
}

fn diff_fields(
    expected: &RecordRef,
    actual: &RecordRef,
    chain: &[&KindSchema],
    ctx: &mut CompareContext<'_>,
) -> Result<IndexMap<String, Difference>> {
    let mut fields = IndexMap::new();

    for schema in chain {
        for field in &schema.fields {
            if field.is_skipped() {
                let why = if field.transient { "transient" } else { "non-owning" };
                tracing::trace!("Skipping {} field {}.{}", why, schema.name, field.name);
                continue;
            }

            let e = expected.get(&field.name).unwrap_or_default();
            let a = actual.get(&field.name).unwrap_or_default();
            let child = ctx
                .diff(&e, &a)
                .with_context(|| format!("comparing {}.{}", schema.name, field.name))?;
            if let Some(difference) = child {
                fields.insert(field.name.clone(), difference);
                if ctx.stop_at_first() {
                    return Ok(fields);
                }
            }
        }
    }

    Ok(fields)
}

/// Every field a record holds must be declared along its kind chain.
fn check_declared(record: &RecordRef, chain: &[&KindSchema]) -> Result<()> {
    for name in record.field_names() {
        if !chain.iter().any(|schema| schema.declared_field(&name).is_some()) {
            return Err(FixtureError::fault(
                "reading record fields",
                FaultKind::UndeclaredField {
                    kind: record.kind().to_string(),
                    field: name,
                },
            ));
        }
    }
    Ok(())
}

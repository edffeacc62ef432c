//! Unordered collection comparison.
//!
//! Elements are paired by maximum bipartite matching over the "compares
//! equal" relation, so collections of composite records are matched by deep
//! comparison rather than by hashing. Elements left over are then paired with
//! their closest counterpart so a changed field is reported by path.

use crate::diff::{
    classify, Category, CategoryComparator, ClosestMatch, CompareContext, Difference,
};
use crate::error::Result;
use crate::model::{Identifier, Value};
use crate::reconcile::identifier_of;

/// Compares bags: every expected element must pair with exactly one actual
/// element it compares equal to, and vice versa.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnorderedComparator;

impl CategoryComparator for UnorderedComparator {
    fn category(&self) -> Category {
        Category::Unordered
    }

    fn diff(
        &self,
        expected: &Value,
        actual: &Value,
        ctx: &mut CompareContext<'_>,
    ) -> Result<Option<Difference>> {
        let Value::Bag(expected_items) = expected else {
            return Ok(Some(ctx.category_mismatch(expected, actual)));
        };
        match actual {
            Value::Bag(actual_items) | Value::List(actual_items) => {
                diff_unordered(expected_items, actual_items, ctx)
            }
            _ => Ok(Some(ctx.category_mismatch(expected, actual))),
        }
    }
}

/// Match `expected` against `actual` regardless of order.
pub(crate) fn diff_unordered(
    expected: &[Value],
    actual: &[Value],
    ctx: &mut CompareContext<'_>,
) -> Result<Option<Difference>> {
    let empty = || {
        Some(Difference::Unordered {
            expected_len: expected.len(),
            actual_len: actual.len(),
            unmatched_expected: Vec::new(),
            unmatched_actual: Vec::new(),
            closest: Vec::new(),
        })
    };

    // A probe only needs to know whether a perfect matching exists.
    if ctx.is_probing() && expected.len() != actual.len() {
        return Ok(empty());
    }

    let mut equal = vec![vec![false; actual.len()]; expected.len()];
    for (i, e) in expected.iter().enumerate() {
        for (j, a) in actual.iter().enumerate() {
            equal[i][j] = ctx.probe_equal(e, a)?;
        }
        if ctx.is_probing() && !equal[i].iter().any(|&eq| eq) {
            return Ok(empty());
        }
    }

    let size = expected.len().max(actual.len());
    let pairs = if size <= ctx.config().matching.hungarian_threshold {
        hungarian_assignment(&equal, actual.len())
    } else {
        tracing::debug!(
            "Unordered collection of {} elements exceeds Hungarian threshold, using greedy matching",
            size
        );
        greedy_assignment(&equal)
    };

    let mut expected_matched = vec![false; expected.len()];
    let mut actual_matched = vec![false; actual.len()];
    for (i, j) in pairs {
        expected_matched[i] = true;
        actual_matched[j] = true;
    }

    let leftover_expected: Vec<usize> = (0..expected.len())
        .filter(|&i| !expected_matched[i])
        .collect();
    let leftover_actual: Vec<usize> = (0..actual.len()).filter(|&j| !actual_matched[j]).collect();
    if leftover_expected.is_empty() && leftover_actual.is_empty() {
        return Ok(None);
    }
    if ctx.is_probing() {
        return Ok(empty());
    }

    let closest = pair_leftovers(
        expected,
        actual,
        &leftover_expected,
        &leftover_actual,
        ctx,
        &mut expected_matched,
        &mut actual_matched,
    )?;

    let unmatched_expected: Vec<_> = expected
        .iter()
        .zip(&expected_matched)
        .filter(|(_, matched)| !**matched)
        .map(|(value, _)| ctx.snapshot(value))
        .collect();
    let unmatched_actual: Vec<_> = actual
        .iter()
        .zip(&actual_matched)
        .filter(|(_, matched)| !**matched)
        .map(|(value, _)| ctx.snapshot(value))
        .collect();

    if unmatched_expected.is_empty() && unmatched_actual.is_empty() && closest.is_empty() {
        return Ok(None);
    }
    Ok(Some(Difference::Unordered {
        expected_len: expected.len(),
        actual_len: actual.len(),
        unmatched_expected,
        unmatched_actual,
        closest,
    }))
}

/// Pair leftover elements with their nearest counterpart so the report can
/// show what differs inside them.
///
/// Records pair by kind and identifier first. Remaining composite elements
/// pair with the same-shaped actual element that has the fewest nested
/// differences. Primitives are never paired. Paired elements are marked as
/// matched.
fn pair_leftovers(
    expected: &[Value],
    actual: &[Value],
    leftover_expected: &[usize],
    leftover_actual: &[usize],
    ctx: &mut CompareContext<'_>,
    expected_matched: &mut [bool],
    actual_matched: &mut [bool],
) -> Result<Vec<ClosestMatch>> {
    let mut closest = Vec::new();

    for &i in leftover_expected {
        if ctx.stop_at_first() && !closest.is_empty() {
            break;
        }
        let Some(key) = identity_key(&expected[i], ctx) else {
            continue;
        };
        let partner = leftover_actual
            .iter()
            .copied()
            .find(|&j| !actual_matched[j] && identity_key(&actual[j], ctx).as_ref() == Some(&key));
        if let Some(j) = partner {
            expected_matched[i] = true;
            actual_matched[j] = true;
            if let Some(difference) = ctx.diff(&expected[i], &actual[j])? {
                closest.push(ClosestMatch {
                    element: ctx.snapshot(&expected[i]),
                    difference,
                });
            }
        }
    }

    // Nearest-by-difference pairing costs a full comparison per candidate
    // pair, so it is bounded by the matching threshold.
    let candidates = leftover_expected.len() * leftover_actual.len();
    if candidates > ctx.config().matching.hungarian_threshold {
        return Ok(closest);
    }

    'expected: for &i in leftover_expected {
        if expected_matched[i] || !is_composite(&expected[i]) {
            continue;
        }
        if ctx.stop_at_first() && !closest.is_empty() {
            break;
        }
        let mut best: Option<(usize, Difference)> = None;
        for &j in leftover_actual {
            if actual_matched[j] || !same_shape(&expected[i], &actual[j]) {
                continue;
            }
            let Some(difference) = ctx.diff(&expected[i], &actual[j])? else {
                // Greedy matching left an equal pair behind.
                expected_matched[i] = true;
                actual_matched[j] = true;
                continue 'expected;
            };
            if best.as_ref().map_or(true, |(_, b)| difference.count() < b.count()) {
                best = Some((j, difference));
            }
        }
        if let Some((j, difference)) = best {
            expected_matched[i] = true;
            actual_matched[j] = true;
            closest.push(ClosestMatch {
                element: ctx.snapshot(&expected[i]),
                difference,
            });
        }
    }

    Ok(closest)
}

/// `(kind, identifier)` of a record element whose kind declares one.
fn identity_key(value: &Value, ctx: &CompareContext<'_>) -> Option<(String, Identifier)> {
    let Value::Record(record) = value else {
        return None;
    };
    identifier_of(ctx.registry(), record)
        .ok()
        .map(|id| (record.kind().to_string(), id))
}

fn is_composite(value: &Value) -> bool {
    matches!(
        classify(value),
        Category::Record | Category::Sequence | Category::Unordered | Category::Mapping
    )
}

fn same_shape(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Record(e), Value::Record(a)) => e.kind() == a.kind(),
        _ => classify(expected) == classify(actual),
    }
}

/// Maximum matching with the Hungarian algorithm (Kuhn-Munkres).
///
/// Returns `(expected, actual)` index pairs that compare equal.
fn hungarian_assignment(equal: &[Vec<bool>], actual_len: usize) -> Vec<(usize, usize)> {
    use pathfinding::kuhn_munkres::kuhn_munkres;
    use pathfinding::matrix::Matrix;

    let expected_len = equal.len();
    let n = expected_len.max(actual_len);
    if expected_len == 0 || actual_len == 0 {
        return Vec::new();
    }

    // Square weight matrix: 1 for an equal pair, 0 for a non-edge or padding.
    let weights: Vec<Vec<i64>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| i64::from(i < expected_len && j < actual_len && equal[i][j]))
                .collect()
        })
        .collect();

    let Ok(matrix) = Matrix::from_rows(weights) else {
        return greedy_assignment(equal);
    };
    let (_, assignment) = kuhn_munkres(&matrix);

    assignment
        .into_iter()
        .enumerate()
        .filter(|&(i, j)| i < expected_len && j < actual_len && equal[i][j])
        .collect()
}

/// First-fit matching, used above the Hungarian threshold.
fn greedy_assignment(equal: &[Vec<bool>]) -> Vec<(usize, usize)> {
    let mut used = Vec::new();
    let mut pairs = Vec::new();
    for (i, row) in equal.iter().enumerate() {
        if used.len() < row.len() {
            used.resize(row.len(), false);
        }
        if let Some(j) = (0..row.len()).find(|&j| row[j] && !used[j]) {
            used[j] = true;
            pairs.push((i, j));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompareConfig;
    use crate::diff::Snapshot;
    use crate::model::RecordRef;
    use crate::schema::{KindSchema, SchemaRegistry};

    fn diff_with(expected: Value, actual: Value, config: &CompareConfig) -> Option<Difference> {
        let registry = SchemaRegistry::default();
        let mut ctx = CompareContext::new(&registry, config);
        ctx.diff(&expected, &actual).unwrap()
    }

    fn diff(expected: Value, actual: Value) -> Option<Difference> {
        diff_with(expected, actual, &CompareConfig::default())
    }

    #[test]
    fn test_permuted_multiset_is_equal() {
        assert!(diff(Value::bag([1, 2, 2]), Value::bag([2, 1, 2])).is_none());
    }

    #[test]
    fn test_extra_actual_element_reported_once() {
        match diff(Value::bag([1, 2]), Value::bag([1, 2, 2])) {
            Some(Difference::Unordered {
                unmatched_expected,
                unmatched_actual,
                closest,
                ..
            }) => {
                assert!(unmatched_expected.is_empty());
                assert_eq!(unmatched_actual, vec![Snapshot::new("2")]);
                assert!(closest.is_empty());
            }
            other => panic!("expected unordered node, got {other:?}"),
        }
    }

    #[test]
    fn test_multiplicity_matters() {
        assert!(diff(Value::bag([1, 1, 2]), Value::bag([1, 2, 2])).is_some());
    }

    #[test]
    fn test_nested_collections_match_deeply() {
        let expected = Value::bag([Value::list([1, 2]), Value::list([3])]);
        let actual = Value::bag([Value::list([3]), Value::list([1, 2])]);
        assert!(diff(expected, actual).is_none());
    }

    #[test]
    fn test_matching_beats_first_fit() {
        // Under a loose tolerance 1.0 equals both 1.0 and 1.5, while 1.6 only
        // equals 1.5; first fit would pair 1.0 with 1.5 and strand 1.6.
        let config = CompareConfig {
            tolerance: crate::config::ToleranceConfig {
                relative: 0.0,
                absolute: 0.55,
            },
            ..CompareConfig::default()
        };
        let expected = Value::bag([1.0, 1.6]);
        let actual = Value::bag([1.5, 1.0]);
        assert!(diff_with(expected, actual, &config).is_none());
    }

    #[test]
    fn test_greedy_can_miss_pairing_under_tolerance() {
        let mut config = CompareConfig {
            tolerance: crate::config::ToleranceConfig {
                relative: 0.0,
                absolute: 0.55,
            },
            ..CompareConfig::default()
        };
        config.matching.hungarian_threshold = 1;
        let expected = Value::bag([1.0, 1.6]);
        let actual = Value::bag([1.5, 1.0]);
        assert!(diff_with(expected, actual, &config).is_some());
    }

    #[test]
    fn test_greedy_above_threshold() {
        let mut config = CompareConfig::default();
        config.matching.hungarian_threshold = 1;
        assert!(diff_with(Value::bag([3, 1, 2]), Value::bag([1, 2, 3]), &config).is_none());
        assert!(diff_with(Value::bag([3, 1, 2]), Value::bag([1, 2, 4]), &config).is_some());
    }

    fn accounts() -> SchemaRegistry {
        SchemaRegistry::builder()
            .kind(
                KindSchema::new("Account")
                    .identifier("id")
                    .scalar("id")
                    .scalar("owner"),
            )
            .kind(KindSchema::new("Note").scalar("text").scalar("n"))
            .build()
            .unwrap()
    }

    fn diff_records(expected: Value, actual: Value) -> Option<Difference> {
        let registry = accounts();
        let config = CompareConfig::default();
        let mut ctx = CompareContext::new(&registry, &config);
        ctx.diff(&expected, &actual).unwrap()
    }

    fn account(id: i64, owner: &str) -> Value {
        Value::from(RecordRef::new("Account").with("id", id).with("owner", owner))
    }

    #[test]
    fn test_changed_record_pairs_by_identity() {
        let expected = Value::bag([account(1, "ann"), account(2, "cy")]);
        let actual = Value::bag([account(2, "cy"), account(1, "bob")]);

        let difference = diff_records(expected, actual).unwrap();
        assert_eq!(difference.paths(), vec!["${Account#1}.owner"]);
        assert_eq!(difference.count(), 1);
        match difference {
            Difference::Unordered {
                unmatched_expected,
                unmatched_actual,
                closest,
                ..
            } => {
                assert!(unmatched_expected.is_empty());
                assert!(unmatched_actual.is_empty());
                assert_eq!(closest[0].element, Snapshot::new("Account#1"));
            }
            other => panic!("expected unordered node, got {other:?}"),
        }
    }

    #[test]
    fn test_unidentified_records_pair_by_fewest_differences() {
        let note = |text: &str, n: i64| {
            Value::from(RecordRef::new("Note").with("text", text).with("n", n))
        };
        let expected = Value::bag([note("a", 1)]);
        let actual = Value::bag([note("b", 2), note("a", 3)]);

        let difference = diff_records(expected, actual).unwrap();
        assert_eq!(difference.paths(), vec!["$", "${Note{..}}.n"]);
        match difference {
            Difference::Unordered {
                unmatched_actual, ..
            } => assert_eq!(unmatched_actual, vec![Snapshot::new("Note{..}")]),
            other => panic!("expected unordered node, got {other:?}"),
        }
    }

    #[test]
    fn test_greedy_assignment_pairs() {
        let equal = vec![vec![false, true], vec![true, true]];
        assert_eq!(greedy_assignment(&equal), vec![(0, 1), (1, 0)]);
    }
}

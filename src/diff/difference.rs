//! The difference tree.
//!
//! A comparison produces `Option<Difference>`: `None` means the values are
//! equivalent, `Some` holds a non-empty tree. Branch nodes only exist when at
//! least one child differs. Every value in the tree is captured as text at
//! comparison time, so rendering never touches the compared graphs again.

use super::Category;
use crate::model::{RecordRef, Value};
use crate::reconcile::identifier_of;
use crate::schema::SchemaRegistry;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

/// Largest collection of primitives rendered inline in a snapshot.
const INLINE_ITEMS: usize = 8;

/// Textual capture of a value taken while it was being compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Placeholder for a side that holds nothing at this position.
    #[must_use]
    pub fn absent() -> Self {
        Self("<absent>".to_string())
    }

    /// Capture a value.
    ///
    /// Records render as `Kind#identifier` when their kind declares an
    /// identifier, otherwise as `Kind{..}`; their fields are never visited.
    #[must_use]
    pub fn capture(value: &Value, registry: &SchemaRegistry) -> Self {
        match value {
            Value::Record(record) => Self(record_label(record, registry)),
            Value::List(items) if is_inline(items) => Self(format!("[{}]", inline(items))),
            Value::Bag(items) if is_inline(items) => Self(format!("bag[{}]", inline(items))),
            other => Self(other.summary()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn record_label(record: &RecordRef, registry: &SchemaRegistry) -> String {
    match identifier_of(registry, record) {
        Ok(id) => format!("{}#{id}", record.kind()),
        Err(_) => format!("{}{{..}}", record.kind()),
    }
}

fn is_inline(items: &[Value]) -> bool {
    items.len() <= INLINE_ITEMS
        && items
            .iter()
            .all(|v| matches!(v, Value::Null | Value::Number(_) | Value::Scalar(_)))
}

fn inline(items: &[Value]) -> String {
    items
        .iter()
        .map(Value::summary)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why two values disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MismatchReason {
    /// Scalars with different canonical forms
    Value,
    /// Numbers further apart than the tolerance allows
    Numeric,
    /// Values of incompatible categories
    Category { expected: Category, actual: Category },
    /// Exactly one side is null
    Null,
    /// Records of different kinds
    Kind,
    /// A lazy reference whose target does not exist
    UnresolvedReference,
    /// Present on the expected side only
    Missing,
    /// Present on the actual side only
    Unexpected,
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value => f.write_str("values differ"),
            Self::Numeric => f.write_str("numbers differ beyond tolerance"),
            Self::Category { expected, actual } => write!(f, "expected {expected}, found {actual}"),
            Self::Null => f.write_str("null mismatch"),
            Self::Kind => f.write_str("record kinds differ"),
            Self::UnresolvedReference => f.write_str("reference cannot be resolved"),
            Self::Missing => f.write_str("missing"),
            Self::Unexpected => f.write_str("unexpected"),
        }
    }
}

/// A node of the difference tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Difference {
    /// Two concrete values disagree
    Leaf {
        expected: Snapshot,
        actual: Snapshot,
        reason: MismatchReason,
    },
    /// Differing fields of a record, in declaration order
    Record {
        kind: String,
        /// `Kind#identifier` of the expected record, when it has one
        identity: Option<String>,
        fields: IndexMap<String, Difference>,
    },
    /// Differing positions of an ordered sequence
    Sequence {
        expected_len: usize,
        actual_len: usize,
        elements: BTreeMap<usize, Difference>,
    },
    /// Elements of an unordered collection left without a partner
    ///
    /// Leftover elements that could be paired with a near counterpart (same
    /// identity, or the fewest nested differences) are listed in `closest`
    /// with their nested difference instead of as bare snapshots.
    Unordered {
        expected_len: usize,
        actual_len: usize,
        unmatched_expected: Vec<Snapshot>,
        unmatched_actual: Vec<Snapshot>,
        closest: Vec<ClosestMatch>,
    },
    /// Key differences of a mapping
    Mapping {
        missing: IndexMap<String, Snapshot>,
        unexpected: IndexMap<String, Snapshot>,
        values: IndexMap<String, Difference>,
    },
}

/// An expected element of an unordered collection paired with the actual
/// element nearest to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosestMatch {
    /// Snapshot of the expected element
    pub element: Snapshot,
    pub difference: Difference,
}

impl Difference {
    /// A leaf node.
    #[must_use]
    pub const fn leaf(expected: Snapshot, actual: Snapshot, reason: MismatchReason) -> Self {
        Self::Leaf {
            expected,
            actual,
            reason,
        }
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Number of individual disagreements in the tree.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Record { fields, .. } => fields.values().map(Self::count).sum(),
            Self::Sequence {
                expected_len,
                actual_len,
                elements,
            } => {
                let nested: usize = elements.values().map(Self::count).sum();
                if nested == 0 && expected_len != actual_len {
                    1
                } else {
                    nested
                }
            }
            Self::Unordered {
                unmatched_expected,
                unmatched_actual,
                closest,
                ..
            } => {
                let nested: usize = closest.iter().map(|c| c.difference.count()).sum();
                (unmatched_expected.len() + unmatched_actual.len() + nested).max(1)
            }
            Self::Mapping {
                missing,
                unexpected,
                values,
            } => {
                let nested: usize = values.values().map(Self::count).sum();
                missing.len() + unexpected.len() + nested
            }
        }
    }

    /// Paths of every disagreement, rooted at `$`.
    ///
    /// Fields append `.name`, sequence positions `[index]` and mapping keys
    /// `["key"]`. An unordered collection contributes its own path once for
    /// its unpaired elements, and `{element}` segments for closest matches.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_paths("$", &mut out);
        out
    }

    fn collect_paths(&self, path: &str, out: &mut Vec<String>) {
        match self {
            Self::Leaf { .. } => out.push(path.to_string()),
            Self::Unordered {
                unmatched_expected,
                unmatched_actual,
                closest,
                ..
            } => {
                let unpaired = !unmatched_expected.is_empty() || !unmatched_actual.is_empty();
                if unpaired || closest.is_empty() {
                    out.push(path.to_string());
                }
                for pair in closest {
                    let element = element_path(path, &pair.element);
                    pair.difference.collect_paths(&element, out);
                }
            }
            Self::Record { fields, .. } => {
                for (name, child) in fields {
                    child.collect_paths(&field_path(path, name), out);
                }
            }
            Self::Sequence { elements, .. } => {
                if elements.is_empty() {
                    out.push(path.to_string());
                }
                for (index, child) in elements {
                    child.collect_paths(&index_path(path, *index), out);
                }
            }
            Self::Mapping {
                missing,
                unexpected,
                values,
            } => {
                for key in missing.keys().chain(unexpected.keys()) {
                    out.push(key_path(path, key));
                }
                for (key, child) in values {
                    child.collect_paths(&key_path(path, key), out);
                }
            }
        }
    }
}

pub(crate) fn field_path(parent: &str, name: &str) -> String {
    format!("{parent}.{name}")
}

pub(crate) fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

pub(crate) fn element_path(parent: &str, element: &Snapshot) -> String {
    format!("{parent}{{{element}}}")
}

pub(crate) fn key_path(parent: &str, key: &str) -> String {
    let mut path = String::with_capacity(parent.len() + key.len() + 4);
    path.push_str(parent);
    // Debug formatting quotes and escapes the key.
    let _ = write!(path, "[{key:?}]");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(e: &str, a: &str) -> Difference {
        Difference::leaf(Snapshot::new(e), Snapshot::new(a), MismatchReason::Value)
    }

    #[test]
    fn test_paths_of_nested_tree() {
        let mut elements = BTreeMap::new();
        elements.insert(1, leaf("\"a\"", "\"b\""));
        let mut fields = IndexMap::new();
        fields.insert("name".to_string(), leaf("\"x\"", "\"y\""));
        fields.insert(
            "tags".to_string(),
            Difference::Sequence {
                expected_len: 2,
                actual_len: 2,
                elements,
            },
        );
        let tree = Difference::Record {
            kind: "Parent".to_string(),
            identity: Some("Parent#1".to_string()),
            fields,
        };

        assert_eq!(tree.paths(), vec!["$.name", "$.tags[1]"]);
        assert_eq!(tree.count(), 2);
    }

    #[test]
    fn test_mapping_paths_and_count() {
        let mut missing = IndexMap::new();
        missing.insert("b".to_string(), Snapshot::new("2"));
        let mut unexpected = IndexMap::new();
        unexpected.insert("c".to_string(), Snapshot::new("2"));
        let tree = Difference::Mapping {
            missing,
            unexpected,
            values: IndexMap::new(),
        };
        assert_eq!(tree.paths(), vec!["$[\"b\"]", "$[\"c\"]"]);
        assert_eq!(tree.count(), 2);
    }

    #[test]
    fn test_closest_match_paths_and_count() {
        let mut fields = IndexMap::new();
        fields.insert("owner".to_string(), leaf("\"ann\"", "\"bob\""));
        let tree = Difference::Unordered {
            expected_len: 2,
            actual_len: 2,
            unmatched_expected: Vec::new(),
            unmatched_actual: Vec::new(),
            closest: vec![ClosestMatch {
                element: Snapshot::new("Account#1"),
                difference: Difference::Record {
                    kind: "Account".to_string(),
                    identity: Some("Account#1".to_string()),
                    fields,
                },
            }],
        };
        assert_eq!(tree.paths(), vec!["${Account#1}.owner"]);
        assert_eq!(tree.count(), 1);
    }

    #[test]
    fn test_snapshot_inlines_small_primitive_lists() {
        let registry = SchemaRegistry::default();
        assert_eq!(
            Snapshot::capture(&Value::list([1, 2]), &registry).as_str(),
            "[1, 2]"
        );
        assert_eq!(
            Snapshot::capture(&Value::bag(["a"]), &registry).as_str(),
            "bag[\"a\"]"
        );
        assert_eq!(
            Snapshot::capture(&Value::list(0..20), &registry).as_str(),
            "[20 items]"
        );
    }

    #[test]
    fn test_reason_display() {
        let reason = MismatchReason::Category {
            expected: Category::Numeric,
            actual: Category::Scalar,
        };
        assert_eq!(reason.to_string(), "expected number, found scalar");
    }
}

//! Composite records and the graphs that own them.

use super::Value;
use indexmap::IndexMap;
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A composite record: a kind name plus named field values.
///
/// Which fields a kind declares, and how they relate to other kinds, is
/// described by the [`SchemaRegistry`](crate::schema::SchemaRegistry), not by
/// the record itself.
pub struct Record {
    kind: String,
    fields: RefCell<IndexMap<String, Value>>,
}

/// Shared handle to a [`Record`].
///
/// Handles are cheap to clone; two handles to the same record have the same
/// [`address`](Self::address), which is what the cycle guard keys on.
#[derive(Clone)]
pub struct RecordRef(Rc<Record>);

impl RecordRef {
    /// Create a standalone record with no fields set.
    ///
    /// Records that take part in reference cycles should be created through
    /// [`EntityGraph::new_record`] so the cycle is broken when the graph drops.
    pub fn new(kind: impl Into<String>) -> Self {
        Self(Rc::new(Record {
            kind: kind.into(),
            fields: RefCell::new(IndexMap::new()),
        }))
    }

    /// Kind name of the record.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.0.kind
    }

    /// Stable address of the underlying record.
    #[must_use]
    pub fn address(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// Whether both handles point at the same record.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Current value of a field, `None` when the field was never set.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<Value> {
        self.0.fields.borrow().get(field).cloned()
    }

    /// Set a field, replacing any previous value.
    pub fn set(&self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.fields.borrow_mut().insert(field.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Append an element to a list or bag field, creating a list if unset.
    pub fn push(&self, field: &str, value: impl Into<Value>) {
        let mut fields = self.0.fields.borrow_mut();
        let slot = fields
            .entry(field.to_string())
            .or_insert_with(|| Value::List(Vec::new()));
        match slot {
            Value::List(items) | Value::Bag(items) => items.push(value.into()),
            other => *other = Value::List(vec![value.into()]),
        }
    }

    /// Borrow all field values.
    ///
    /// The borrow is shared; a record may be borrowed again while this guard
    /// lives, which happens whenever a comparison walks a cycle.
    pub fn fields(&self) -> Ref<'_, IndexMap<String, Value>> {
        self.0.fields.borrow()
    }

    /// Names of the fields that currently hold a value.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.0.fields.borrow().keys().cloned().collect()
    }

    /// Drop every field value, releasing references to other records.
    pub fn clear(&self) {
        self.0.fields.borrow_mut().clear();
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Shallow on purpose: fields may point back at this record.
        write!(f, "{}@{:x}", self.kind(), self.address())
    }
}

/// An object graph of records, as produced by a fixture loader or read back
/// from a live store.
///
/// The graph owns every record created through it. When dropped it breaks the
/// reference cycles among records that are no longer reachable from outside
/// the graph. A record still held elsewhere (a root handle kept by the
/// caller, a store entry, a loaded lazy reference) keeps its fields, and so
/// does every record reachable from it.
#[derive(Default)]
pub struct EntityGraph {
    roots: Vec<RecordRef>,
    owned: Vec<RecordRef>,
}

impl EntityGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record owned by this graph. The record is not a root.
    pub fn new_record(&mut self, kind: impl Into<String>) -> RecordRef {
        let record = RecordRef::new(kind);
        self.owned.push(record.clone());
        record
    }

    /// Create a record owned by this graph and register it as a root.
    pub fn new_root(&mut self, kind: impl Into<String>) -> RecordRef {
        let record = self.new_record(kind);
        self.roots.push(record.clone());
        record
    }

    /// Register an existing record as a top-level record of the graph.
    pub fn add_root(&mut self, record: RecordRef) {
        if !self.owned.iter().any(|r| r.ptr_eq(&record)) {
            self.owned.push(record.clone());
        }
        self.roots.push(record);
    }

    /// Top-level records, in insertion order.
    #[must_use]
    pub fn roots(&self) -> &[RecordRef] {
        &self.roots
    }

    /// Top-level records as an unordered collection value.
    #[must_use]
    pub fn roots_value(&self) -> Value {
        Value::Bag(self.roots.iter().cloned().map(Value::Record).collect())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl Drop for EntityGraph {
    fn drop(&mut self) {
        let index: HashMap<usize, usize> = self
            .owned
            .iter()
            .enumerate()
            .map(|(i, record)| (record.address(), i))
            .collect();

        // Handles the graph accounts for: its own lists plus references from
        // the fields of owned records. Anything above that is held outside.
        let mut internal = vec![0_usize; self.owned.len()];
        for record in self.owned.iter().chain(&self.roots) {
            if let Some(&i) = index.get(&record.address()) {
                internal[i] += 1;
            }
        }
        for record in &self.owned {
            for value in record.fields().values() {
                for_each_record(value, &mut |target| {
                    if let Some(&i) = index.get(&target.address()) {
                        internal[i] += 1;
                    }
                });
            }
        }

        let mut live = vec![false; self.owned.len()];
        let mut pending: Vec<usize> = (0..self.owned.len())
            .filter(|&i| Rc::strong_count(&self.owned[i].0) > internal[i])
            .collect();
        while let Some(i) = pending.pop() {
            if live[i] {
                continue;
            }
            live[i] = true;
            for value in self.owned[i].fields().values() {
                for_each_record(value, &mut |target| {
                    if let Some(&j) = index.get(&target.address()) {
                        if !live[j] {
                            pending.push(j);
                        }
                    }
                });
            }
        }

        let mut released = 0;
        for (record, live) in self.owned.iter().zip(live) {
            if !live {
                record.clear();
                released += 1;
            }
        }
        tracing::trace!(
            "Dropped entity graph: released {} of {} records",
            released,
            self.owned.len()
        );
    }
}

/// Visit every record handle held directly in `value`, through collections
/// and maps. Lazy references are opaque: the records they cache count as
/// held from outside the graph.
fn for_each_record(value: &Value, visit: &mut impl FnMut(&RecordRef)) {
    match value {
        Value::Record(record) => visit(record),
        Value::List(items) | Value::Bag(items) => {
            for item in items {
                for_each_record(item, visit);
            }
        }
        Value::Map(entries) => {
            for item in entries.values() {
                for_each_record(item, visit);
            }
        }
        Value::Null | Value::Number(_) | Value::Scalar(_) | Value::Lazy(_) => {}
    }
}

impl fmt::Debug for EntityGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityGraph")
            .field("roots", &self.roots)
            .field("records", &self.owned.len())
            .finish()
    }
}

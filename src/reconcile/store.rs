//! In-memory live store.

use super::lookup::identifier_of;
use super::LiveLookup;
use crate::error::Result;
use crate::model::{EntityGraph, Identifier, RecordRef, Value};
use crate::schema::SchemaRegistry;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::sync::Arc;

/// A [`LiveLookup`] over records held in memory, keyed by kind and identifier.
///
/// Lookups by an ancestor kind also find records of derived kinds. The store
/// uses interior mutability so it can be shared (as `Rc<InMemoryStore>`) with
/// lazy references while a test keeps inserting and removing records.
#[derive(Debug)]
pub struct InMemoryStore {
    registry: Arc<SchemaRegistry>,
    records: RefCell<IndexMap<(String, Identifier), RecordRef>>,
}

impl InMemoryStore {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            records: RefCell::new(IndexMap::new()),
        }
    }

    /// A store holding every top-level record of `graph`.
    pub fn from_graph(registry: Arc<SchemaRegistry>, graph: &EntityGraph) -> Result<Self> {
        let store = Self::new(registry);
        for record in graph.roots() {
            store.insert(record.clone())?;
        }
        Ok(store)
    }

    /// Store a record under its identity, replacing any previous one.
    pub fn insert(&self, record: RecordRef) -> Result<Identifier> {
        let identifier = identifier_of(&self.registry, &record)?;
        tracing::debug!("Storing {}#{}", record.kind(), identifier);
        self.records
            .borrow_mut()
            .insert((record.kind().to_string(), identifier.clone()), record);
        Ok(identifier)
    }

    /// Remove the record of `kind` with `identifier`.
    pub fn remove(&self, kind: &str, identifier: &Identifier) -> Option<RecordRef> {
        self.records
            .borrow_mut()
            .shift_remove(&(kind.to_string(), identifier.clone()))
    }

    /// Every stored record whose kind is `kind` or derives from it.
    #[must_use]
    pub fn find_all(&self, kind: &str) -> Vec<RecordRef> {
        self.records
            .borrow()
            .iter()
            .filter(|((stored_kind, _), _)| self.registry.is_assignable(stored_kind, kind))
            .map(|(_, record)| record.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl LiveLookup for InMemoryStore {
    fn find(&self, kind: &str, identifier: &Identifier) -> Result<Option<Value>> {
        self.registry.kind_chain(kind)?;
        let records = self.records.borrow();
        let exact = records.get(&(kind.to_string(), identifier.clone()));
        let found = exact.or_else(|| {
            records
                .iter()
                .find(|((stored_kind, id), _)| {
                    id == identifier && self.registry.is_assignable(stored_kind, kind)
                })
                .map(|(_, record)| record)
        });
        Ok(found.cloned().map(Value::Record))
    }
}

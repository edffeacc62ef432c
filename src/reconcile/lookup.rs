//! Capabilities supplied by the surrounding persistence layer.

use crate::error::{FaultKind, FixtureError, Result};
use crate::model::{Identifier, RecordRef, Value};
use crate::schema::SchemaRegistry;
use std::sync::Arc;

/// Answers "what is this record's persistent identifier?".
pub trait IdentityLookup {
    /// Persistent identifier of `record`.
    ///
    /// Fails with a fault when the record's kind declares no identifier or
    /// the record holds no usable value for it.
    fn identifier_of(&self, record: &RecordRef) -> Result<Identifier>;
}

/// Answers "what does the live store currently hold under this identity?".
pub trait LiveLookup {
    /// The stored record of `kind` with `identifier`, or `None` when absent.
    fn find(&self, kind: &str, identifier: &Identifier) -> Result<Option<Value>>;
}

/// [`IdentityLookup`] backed by the identifier fields declared in a
/// [`SchemaRegistry`].
#[derive(Debug, Clone)]
pub struct SchemaIdentityLookup {
    registry: Arc<SchemaRegistry>,
}

impl SchemaIdentityLookup {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }
}

impl IdentityLookup for SchemaIdentityLookup {
    fn identifier_of(&self, record: &RecordRef) -> Result<Identifier> {
        identifier_of(&self.registry, record)
    }
}

/// Read the identifier field of `record` as declared by its kind schema.
pub(crate) fn identifier_of(registry: &SchemaRegistry, record: &RecordRef) -> Result<Identifier> {
    let kind = record.kind();
    registry.kind_chain(kind)?;
    let field = registry.identifier_field(kind).ok_or_else(|| {
        FixtureError::fault(
            "reading identifier",
            FaultKind::MissingIdentifierField {
                kind: kind.to_string(),
            },
        )
    })?;

    let value = match record.get(field) {
        Some(value) if !value.is_null() => value,
        _ => {
            return Err(FixtureError::fault(
                "reading identifier",
                FaultKind::UndefinedIdentifier {
                    kind: kind.to_string(),
                    field: field.to_string(),
                },
            ))
        }
    };

    Identifier::from_value(&value).ok_or_else(|| {
        FixtureError::fault(
            "reading identifier",
            FaultKind::InvalidIdentifier {
                kind: kind.to_string(),
                value: value.summary(),
            },
        )
    })
}

//! Records wrapped by persistent identity.

use super::IdentityLookup;
use crate::error::{ErrorContext, Result};
use crate::model::{Identifier, RecordRef};
use indexmap::IndexSet;
use std::hash::{Hash, Hasher};

/// A record keyed by its persistent identifier rather than its contents.
///
/// Two identities are equal when their records have the same kind and the
/// same identifier, whatever their field values. The hash covers the
/// identifier only.
#[derive(Debug, Clone)]
pub struct RecordIdentity {
    record: RecordRef,
    identifier: Identifier,
}

impl RecordIdentity {
    #[must_use]
    pub fn record(&self) -> &RecordRef {
        &self.record
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        self.record.kind()
    }

    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }
}

impl PartialEq for RecordIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.identifier == other.identifier
    }
}

impl Eq for RecordIdentity {}

impl Hash for RecordIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

impl std::fmt::Display for RecordIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.kind(), self.identifier)
    }
}

/// Wrap one record by its identity.
pub fn wrap(lookup: &dyn IdentityLookup, record: &RecordRef) -> Result<RecordIdentity> {
    let identifier = lookup.identifier_of(record)?;
    Ok(RecordIdentity {
        record: record.clone(),
        identifier,
    })
}

/// Wrap every record, collapsing records that share an identity.
///
/// The first record seen for an identity is kept; insertion order is preserved.
pub fn wrap_all<'a, I>(lookup: &dyn IdentityLookup, records: I) -> Result<IndexSet<RecordIdentity>>
where
    I: IntoIterator<Item = &'a RecordRef>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            wrap(lookup, record).with_context(|| format!("wrapping record {index}"))
        })
        .collect()
}

//! Lazily-materialized record references.

use super::{Identifier, Value};
use crate::error::{FaultKind, FixtureError, Result};
use crate::reconcile::LiveLookup;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

enum LazyState {
    Pending(Rc<dyn LiveLookup>),
    Loaded(Value),
    Missing,
}

struct LazyCell {
    kind: String,
    identifier: Identifier,
    state: RefCell<LazyState>,
}

/// Placeholder for a record that may not have been loaded yet.
///
/// Resolution goes through a [`LiveLookup`] and is cached: the loader is
/// consulted at most once per placeholder.
#[derive(Clone)]
pub struct LazyRef(Rc<LazyCell>);

impl LazyRef {
    /// A placeholder to be materialized on first access.
    pub fn pending(
        kind: impl Into<String>,
        identifier: impl Into<Identifier>,
        loader: Rc<dyn LiveLookup>,
    ) -> Self {
        Self::with_state(kind, identifier, LazyState::Pending(loader))
    }

    /// A placeholder whose target is already materialized.
    pub fn loaded(
        kind: impl Into<String>,
        identifier: impl Into<Identifier>,
        value: impl Into<Value>,
    ) -> Self {
        Self::with_state(kind, identifier, LazyState::Loaded(value.into()))
    }

    fn with_state(
        kind: impl Into<String>,
        identifier: impl Into<Identifier>,
        state: LazyState,
    ) -> Self {
        Self(Rc::new(LazyCell {
            kind: kind.into(),
            identifier: identifier.into(),
            state: RefCell::new(state),
        }))
    }

    /// Kind of the referenced record.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.0.kind
    }

    /// Identifier of the referenced record.
    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        &self.0.identifier
    }

    /// Whether both handles are the same placeholder.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Whether resolution has already happened (successfully or not).
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(*self.0.state.borrow(), LazyState::Pending(_))
    }

    /// Force materialization.
    ///
    /// Returns `Ok(None)` when the loader reports the record as absent, and a
    /// fault when the loader itself fails.
    pub fn resolve(&self) -> Result<Option<Value>> {
        let loader = match &*self.0.state.borrow() {
            LazyState::Loaded(value) => return Ok(Some(value.clone())),
            LazyState::Missing => return Ok(None),
            LazyState::Pending(loader) => Rc::clone(loader),
        };

        tracing::debug!(
            "Materializing lazy reference {}#{}",
            self.0.kind,
            self.0.identifier
        );
        let found = loader
            .find(&self.0.kind, &self.0.identifier)
            .map_err(|e| {
                FixtureError::fault(
                    "resolving lazy reference",
                    FaultKind::UnresolvedReference {
                        kind: self.0.kind.clone(),
                        identifier: self.0.identifier.to_string(),
                        reason: e.to_string(),
                    },
                )
            })?;

        *self.0.state.borrow_mut() = match &found {
            Some(value) => LazyState::Loaded(value.clone()),
            None => LazyState::Missing,
        };
        Ok(found)
    }
}

impl fmt::Debug for LazyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lazy({}#{}, resolved={})",
            self.0.kind,
            self.0.identifier,
            self.is_resolved()
        )
    }
}

//! Identity-based reconciliation against a live store.
//!
//! Records are wrapped by persistent identifier ([`RecordIdentity`]) so that
//! set operations treat two snapshots of the same logical record as one,
//! whatever their contents. The [`Reconciler`] uses this to decide which
//! records a test removed and which it changed.
//!
//! The persistence layer plugs in through two capabilities:
//! [`IdentityLookup`] and [`LiveLookup`]. [`SchemaIdentityLookup`] and
//! [`InMemoryStore`] implement them over a
//! [`SchemaRegistry`](crate::schema::SchemaRegistry).

mod identity;
mod lookup;
mod reconciler;
mod store;

pub use identity::{wrap, wrap_all, RecordIdentity};
pub use lookup::{IdentityLookup, LiveLookup, SchemaIdentityLookup};
pub use reconciler::{ReconcileReport, RecordMismatch, Reconciler};
pub use store::InMemoryStore;

pub(crate) use lookup::identifier_of;

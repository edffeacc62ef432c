//! Data model for values under comparison.
//!
//! Values are a closed set of shapes ([`Value`]); composite records are shared
//! handles ([`RecordRef`]) so graphs may contain bidirectional references.
//! Which fields a record kind declares lives in the
//! [`schema`](crate::schema) module.

mod identity;
mod lazy;
mod record;
mod value;

pub use identity::Identifier;
pub use lazy::LazyRef;
pub use record::{EntityGraph, Record, RecordRef};
pub use value::{Canonical, Number, Scalar, Value};

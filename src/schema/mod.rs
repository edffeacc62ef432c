//! Explicit kind schemas and relationship metadata.
//!
//! Every composite kind the engine compares is described by a [`KindSchema`]:
//! its ancestor, its identifier field and its declared fields. Relationship
//! fields carry an [`Arity`] and an [`Ownership`] flag; when the
//! [`SchemaRegistry`] is built the two sides of every bidirectional
//! relationship are checked against each other and exactly one side is left
//! owning. The graph walker only ever follows owning fields.
//!
//! # Example
//!
//! ```ignore
//! use fixture_verify::schema::{FieldDescriptor, KindSchema, SchemaRegistry};
//!
//! let registry = SchemaRegistry::builder()
//!     .kind(
//!         KindSchema::new("Parent")
//!             .identifier("id")
//!             .scalar("id")
//!             .field(FieldDescriptor::one_to_many("children", "Child").inverse("parent")),
//!     )
//!     .kind(
//!         KindSchema::new("Child")
//!             .identifier("id")
//!             .scalar("id")
//!             .field(FieldDescriptor::many_to_one("parent", "Parent").mapped_by("children")),
//!     )
//!     .build()?;
//! ```

mod descriptor;
mod registry;

pub use descriptor::{
    Arity, FieldDescriptor, KindSchema, Ownership, Relationship, RelationshipMetadata,
};
pub use registry::{SchemaRegistry, SchemaRegistryBuilder};

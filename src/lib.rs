//! **Deep comparison of persisted record graphs for fixture-driven tests.**
//!
//! `fixture-verify` checks that the records a test left behind in a store match
//! the records it expected. Graphs of records routinely contain bidirectional
//! references (a parent listing its children, each child pointing back at the
//! parent), so a naive structural comparison would either loop forever or report
//! every difference twice. This crate compares them with an engine that:
//!
//! - consults explicit relationship metadata and only follows the **owning**
//!   side of each bidirectional relationship;
//! - guards against cycles by tracking the record pairs under comparison;
//! - compares numbers across representations and within a tolerance, scalars by
//!   canonical form, sequences by position and unordered collections by maximum
//!   matching;
//! - reports every disagreement as a path in a [`Difference`] tree, rendered as a
//!   readable listing when an assertion fails.
//!
//! Independently, the [`Reconciler`] uses persistent identity to work out which
//! records a test removed and checks that the live store agrees.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the values under comparison. Records are shared handles
//!   ([`RecordRef`]) owned by an [`EntityGraph`].
//! - **[`schema`]**: the [`SchemaRegistry`] declaring each record kind's fields,
//!   identifier and relationship ownership.
//! - **[`diff`]**: the [`DiffEngine`] orchestrator, the category comparators and
//!   the ownership-aware graph walker.
//! - **[`reconcile`]**: identity wrapping and set reconciliation against a
//!   [`LiveLookup`].
//! - **[`reports`]**: text and JSON rendering of difference trees.
//! - **[`config`]**: typed settings, presets and YAML config files.
//!
//! ## Getting Started
//!
//! ```
//! use std::sync::Arc;
//! use fixture_verify::schema::{FieldDescriptor, KindSchema, SchemaRegistry};
//! use fixture_verify::{DiffEngine, EntityGraph};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = SchemaRegistry::builder()
//!         .kind(
//!             KindSchema::new("Parent")
//!                 .identifier("id")
//!                 .scalar("id")
//!                 .field(FieldDescriptor::one_to_many("children", "Child").inverse("parent")),
//!         )
//!         .kind(
//!             KindSchema::new("Child")
//!                 .identifier("id")
//!                 .scalar("id")
//!                 .field(FieldDescriptor::many_to_one("parent", "Parent").mapped_by("children")),
//!         )
//!         .build()?;
//!
//!     let family = |child_id: i64| {
//!         let mut graph = EntityGraph::new();
//!         let parent = graph.new_root("Parent").with("id", 1_i64);
//!         let child = graph.new_record("Child").with("id", child_id);
//!         child.set("parent", &parent);
//!         parent.push("children", &child);
//!         graph
//!     };
//!
//!     let engine = DiffEngine::new(Arc::new(registry));
//!     engine.assert_entity_graphs_equal(&family(2), &family(2))?;
//!
//!     let failure = engine
//!         .assert_entity_graphs_equal(&family(2), &family(3))
//!         .unwrap_err();
//!     assert!(failure.is_mismatch());
//!     Ok(())
//! }
//! ```
//!
//! ## Reconciling Against a Live Store
//!
//! ```ignore
//! use fixture_verify::{Reconciler, SchemaIdentityLookup};
//!
//! let identity = SchemaIdentityLookup::new(registry.clone());
//! let reconciler = Reconciler::new(&engine, &identity, &store);
//!
//! // Records in `setup` but not in `expected` must be gone from the store;
//! // every record in `expected` must be found there and compare equal.
//! reconciler.verify(&setup, &expected)?;
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Integer widening to i128/f64 in numeric comparison is intentional
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::similar_names
)]

pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod reports;
pub mod schema;
pub mod utils;

// Re-export main types for convenience
pub use config::{
    CompareConfig, ConfigPreset, MatchingConfig, OutputConfig, ToleranceConfig, VerifyConfig,
    VerifyConfigBuilder,
};
pub use config::{ConfigError, Validatable};
pub use diff::{AssertionError, DiffEngine, Difference, MismatchReason, Snapshot};
pub use error::{ErrorContext, FaultKind, FixtureError, Result};
pub use model::{EntityGraph, Identifier, LazyRef, RecordRef, Value};
pub use reconcile::{
    IdentityLookup, InMemoryStore, LiveLookup, ReconcileReport, Reconciler, RecordIdentity,
    SchemaIdentityLookup,
};
pub use reports::{DifferenceReporter, ReportFormat};
pub use schema::{FieldDescriptor, KindSchema, RelationshipMetadata, SchemaRegistry};
pub use utils::init_logging;

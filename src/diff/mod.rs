//! Cycle-safe, ownership-aware deep comparison.
//!
//! The engine compares two values of arbitrary shape and returns a
//! [`Difference`] tree, or `None` when they are equivalent.
//!
//! # Architecture
//!
//! - [`classify`] assigns every value a [`Category`]; the expected side decides
//!   which comparator runs.
//! - One [`CategoryComparator`] per category in [`comparators`], plus the
//!   [`GraphWalker`] for composite records. The walker consults the
//!   [`SchemaRegistry`](crate::schema::SchemaRegistry) to skip transient and
//!   non-owning fields, and guards against cycles by tracking record pairs on
//!   the recursion path.
//! - [`CompareContext`] carries the per-call state; [`DiffEngine`] creates one
//!   per top-level comparison.
//!
//! # Example
//!
//! ```ignore
//! use fixture_verify::diff::DiffEngine;
//!
//! let engine = DiffEngine::new(registry);
//! engine.assert_entity_graphs_equal(&expected_graph, &actual_graph)?;
//! ```

mod classify;
pub mod comparators;
mod context;
mod difference;
mod engine;
mod traits;
mod walker;

pub use classify::{classify, Category};
pub use comparators::{
    numbers_equal, LazyComparator, MappingComparator, NullComparator, NumericComparator,
    ScalarComparator, SequenceComparator, UnorderedComparator,
};
pub use context::CompareContext;
pub use difference::{ClosestMatch, Difference, MismatchReason, Snapshot};
pub(crate) use difference::{element_path, field_path, index_path, key_path};
pub use engine::{AssertionError, DiffEngine};
pub use traits::CategoryComparator;
pub use walker::GraphWalker;

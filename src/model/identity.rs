//! Persistent identifiers.

use super::{Canonical, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Persistent identifier of a record within its kind.
///
/// Stored in canonical text form, so the same identifier reached through
/// different representations (an `i32` and an `i64` key, a UUID and its
/// text) hashes and compares identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Create an identifier from already-canonical text.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Derive an identifier from a field value.
    ///
    /// Only numbers and scalars qualify; null, collections, records and lazy
    /// references return `None`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(_) | Value::Scalar(_) => match value.canonical_primitive() {
                Canonical::Text(text) => Some(Self(text)),
                Canonical::Bool(b) => Some(Self(b.to_string())),
            },
            _ => None,
        }
    }

    /// The canonical text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<i32> for Identifier {
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

impl From<Uuid> for Identifier {
    fn from(value: Uuid) -> Self {
        Self(value.hyphenated().to_string())
    }
}

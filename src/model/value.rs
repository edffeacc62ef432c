//! Runtime values under comparison.

use super::{LazyRef, RecordRef};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use indexmap::IndexMap;
use std::fmt;
use uuid::Uuid;

/// A numeric value in one of several boxed representations.
///
/// Two numbers of different representations still denote the same value when
/// they reduce to the same number (a 32-bit and a 64-bit encoding of `7` are
/// equal under comparison).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I32(i32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Number {
    /// Exact integral value, if this number is an integer representation.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i128> {
        match *self {
            Self::I32(v) => Some(v as i128),
            Self::I64(v) => Some(v as i128),
            Self::U64(v) => Some(v as i128),
            Self::F32(_) | Self::F64(_) => None,
        }
    }

    /// Value widened to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::I32(v) => f64::from(v),
            Self::I64(v) => v as f64,
            Self::U64(v) => v as f64,
            Self::F32(v) => f64::from(v),
            Self::F64(v) => v,
        }
    }

    /// Canonical decimal text: integers and integral floats print without a
    /// fractional part.
    #[must_use]
    pub fn canonical_text(&self) -> String {
        if let Some(i) = self.as_integer() {
            return i.to_string();
        }
        let f = self.as_f64();
        if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
            format!("{}", f as i64)
        } else {
            format!("{f}")
        }
    }

    /// Name of the boxed representation, used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
        }
    }
}

/// A non-numeric scalar.
#[derive(Debug, Clone)]
pub enum Scalar {
    Text(String),
    Bool(bool),
    Char(char),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Uuid(Uuid),
    /// A variant of a named enumeration
    Enum { type_name: String, variant: String },
    /// A typed wrapper around a raw scalar or number, e.g. a `UserId(42)`
    Wrapped { type_name: String, raw: Box<Value> },
}

/// Normalized form of a scalar used for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Canonical {
    Bool(bool),
    Text(String),
}

impl fmt::Display for Canonical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Scalar {
    /// Reduce this scalar to its canonical form.
    ///
    /// Distinct in-memory representations of the same scalar (a wrapped
    /// identifier and its raw value, a UUID and its hyphenated text) share a
    /// canonical form.
    #[must_use]
    pub fn canonical(&self) -> Canonical {
        match self {
            Self::Bool(b) => Canonical::Bool(*b),
            Self::Text(s) => Canonical::Text(s.clone()),
            Self::Char(c) => Canonical::Text(c.to_string()),
            Self::Date(d) => Canonical::Text(d.format("%Y-%m-%d").to_string()),
            Self::DateTime(dt) => {
                Canonical::Text(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Self::Uuid(u) => Canonical::Text(u.hyphenated().to_string()),
            Self::Enum { variant, .. } => Canonical::Text(variant.clone()),
            Self::Wrapped { raw, .. } => raw.canonical_primitive(),
        }
    }
}

/// Any datum under comparison.
///
/// `Record` and `Lazy` are shared handles, so cloning a value never copies a
/// record's contents.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Number(Number),
    Scalar(Scalar),
    Lazy(LazyRef),
    /// Ordered, index-addressable sequence
    List(Vec<Value>),
    /// Unordered collection (a bag: duplicates allowed)
    Bag(Vec<Value>),
    /// Key-value mapping, keys in canonical text form
    Map(IndexMap<String, Value>),
    Record(RecordRef),
}

impl Value {
    /// The null value.
    #[must_use]
    pub const fn null() -> Self {
        Self::Null
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Build an ordered sequence.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build an unordered collection.
    pub fn bag<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Self>,
    {
        Self::Bag(items.into_iter().map(Into::into).collect())
    }

    /// Build a key-value mapping. Later duplicates of a key replace earlier ones.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Self>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build an enumeration variant.
    pub fn enum_variant(type_name: impl Into<String>, variant: impl Into<String>) -> Self {
        Self::Scalar(Scalar::Enum {
            type_name: type_name.into(),
            variant: variant.into(),
        })
    }

    /// Build a typed wrapper around a raw scalar or number.
    pub fn wrapped(type_name: impl Into<String>, raw: impl Into<Self>) -> Self {
        Self::Scalar(Scalar::Wrapped {
            type_name: type_name.into(),
            raw: Box::new(raw.into()),
        })
    }

    /// Canonical form of a primitive (number or scalar).
    ///
    /// Non-primitive values fall back to their shallow summary so the
    /// function stays total.
    #[must_use]
    pub fn canonical_primitive(&self) -> Canonical {
        match self {
            Self::Number(n) => Canonical::Text(n.canonical_text()),
            Self::Scalar(s) => s.canonical(),
            other => Canonical::Text(other.summary()),
        }
    }

    /// Shallow one-line rendering that never descends into records.
    ///
    /// Records print as `Kind@address`; callers that know the schema render
    /// identifiers instead (see [`Snapshot`](crate::diff::Snapshot)).
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Number(n) => n.to_string(),
            Self::Scalar(Scalar::Text(s)) => format!("{s:?}"),
            Self::Scalar(Scalar::Char(c)) => format!("{c:?}"),
            Self::Scalar(Scalar::Enum { type_name, variant }) => {
                format!("{type_name}::{variant}")
            }
            Self::Scalar(Scalar::Wrapped { type_name, raw }) => {
                format!("{type_name}({})", raw.summary())
            }
            Self::Scalar(s) => s.canonical().to_string(),
            Self::Lazy(lazy) => format!("<lazy {}#{}>", lazy.kind(), lazy.identifier()),
            Self::List(items) => format!("[{} items]", items.len()),
            Self::Bag(items) => format!("{{{} items, unordered}}", items.len()),
            Self::Map(entries) => format!("{{{} entries}}", entries.len()),
            Self::Record(record) => format!("{}@{:x}", record.kind(), record.address()),
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(Number::I32(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Number(Number::I64(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Number(Number::U64(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Number(Number::F32(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(Number::F64(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Scalar(Scalar::Bool(v))
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::Scalar(Scalar::Char(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Scalar(Scalar::Text(v.to_string()))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Scalar(Scalar::Text(v))
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Scalar(Scalar::Date(v))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Scalar(Scalar::DateTime(v))
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Self::Scalar(Scalar::Uuid(v))
    }
}

impl From<Scalar> for Value {
    fn from(v: Scalar) -> Self {
        Self::Scalar(v)
    }
}

impl From<RecordRef> for Value {
    fn from(v: RecordRef) -> Self {
        Self::Record(v)
    }
}

impl From<&RecordRef> for Value {
    fn from(v: &RecordRef) -> Self {
        Self::Record(v.clone())
    }
}

impl From<LazyRef> for Value {
    fn from(v: LazyRef) -> Self {
        Self::Lazy(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::list(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_widths_share_canonical_text() {
        assert_eq!(Number::I32(7).canonical_text(), "7");
        assert_eq!(Number::I64(7).canonical_text(), "7");
        assert_eq!(Number::U64(7).canonical_text(), "7");
        assert_eq!(Number::F64(7.0).canonical_text(), "7");
        assert_eq!(Number::F64(7.5).canonical_text(), "7.5");
    }

    #[test]
    fn test_wrapped_identifier_canonicalizes_to_raw() {
        let wrapped = Value::wrapped("UserId", 42_i64);
        let Value::Scalar(scalar) = wrapped else {
            panic!("expected scalar");
        };
        assert_eq!(scalar.canonical(), Canonical::Text("42".to_string()));
    }

    #[test]
    fn test_uuid_canonical_is_hyphenated_lowercase() {
        let id = Uuid::parse_str("67E55044-10B1-426F-9247-BB680E5FE0C8").unwrap();
        assert_eq!(
            Scalar::Uuid(id).canonical(),
            Canonical::Text("67e55044-10b1-426f-9247-bb680e5fe0c8".to_string())
        );
    }

    #[test]
    fn test_enum_canonical_is_variant() {
        let Value::Scalar(s) = Value::enum_variant("Color", "Red") else {
            panic!("expected scalar");
        };
        assert_eq!(s.canonical(), Canonical::Text("Red".to_string()));
    }

    #[test]
    fn test_option_none_is_null() {
        let v: Value = Option::<i32>::None.into();
        assert!(v.is_null());
    }

    #[test]
    fn test_summary_is_shallow() {
        assert_eq!(Value::from("a").summary(), "\"a\"");
        assert_eq!(Value::list([1, 2, 3]).summary(), "[3 items]");
        assert_eq!(Value::enum_variant("Color", "Red").summary(), "Color::Red");
    }
}

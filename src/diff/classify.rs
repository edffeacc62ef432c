//! Value classification.

use crate::model::Value;
use serde::Serialize;
use std::fmt;

/// Comparison category of a value.
///
/// Declared in classification order; every value falls into exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Numeric,
    Scalar,
    Lazy,
    Sequence,
    Unordered,
    Mapping,
    Record,
    Null,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Numeric => "number",
            Self::Scalar => "scalar",
            Self::Lazy => "lazy reference",
            Self::Sequence => "sequence",
            Self::Unordered => "unordered collection",
            Self::Mapping => "mapping",
            Self::Record => "record",
            Self::Null => "null",
        };
        f.write_str(name)
    }
}

/// Category of `value`.
#[must_use]
pub const fn classify(value: &Value) -> Category {
    match value {
        Value::Number(_) => Category::Numeric,
        Value::Scalar(_) => Category::Scalar,
        Value::Lazy(_) => Category::Lazy,
        Value::List(_) => Category::Sequence,
        Value::Bag(_) => Category::Unordered,
        Value::Map(_) => Category::Mapping,
        Value::Record(_) => Category::Record,
        Value::Null => Category::Null,
    }
}

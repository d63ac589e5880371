//! Tagged value model for record fields.
//!
//! Records are JSON-compatible maps of field name to value. Type
//! classification works on [`TypeTag`], derived from the `serde_json::Value`
//! variant, so that "type mismatch" has one precise definition across the
//! pipeline: null, boolean, number, string, sequence, mapping. Null is its
//! own tag and is never folded into the mapping or sequence buckets.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record: an ordered map of field name to JSON-compatible value.
///
/// Backed by `serde_json::Map` with the `preserve_order` feature, so field
/// iteration follows insertion order. Difference reports depend on that
/// order being stable.
pub type Record = serde_json::Map<String, Value>;

// ---------------------------------------------------------------------------
// Type tags
// ---------------------------------------------------------------------------

/// The six type tags a field value can carry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    Null,
    Boolean,
    Number,
    String,
    Sequence,
    Mapping,
}

impl TypeTag {
    /// Classify a value by its variant.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Sequence,
            Value::Object(_) => Self::Mapping,
        }
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean => write!(f, "boolean"),
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
            Self::Sequence => write!(f, "sequence"),
            Self::Mapping => write!(f, "mapping"),
        }
    }
}

// ---------------------------------------------------------------------------
// Canonical equality
// ---------------------------------------------------------------------------

/// Canonical deep equality for two field values.
///
/// Tags must match. Sequences compare element by element, in order.
/// Mappings compare field by field, independent of key order, so two
/// semantically identical objects serialized with different key orders are
/// equal.
pub fn canonical_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| canonical_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).map_or(false, |y| canonical_eq(x, y)))
        }
        _ => false,
    }
}

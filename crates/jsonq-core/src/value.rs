//! The JSON value tree shared by the decoder, the evaluator, and the encoder.
//!
//! A [`Value`] is built once by [`crate::decode`] and only read afterwards.
//! Accessors that only make sense for one variant return a typed
//! [`EvalError`] when called on another, so evaluation code can propagate
//! them with `?`.
//!
//! Objects are backed by a `BTreeMap`: key order carries no meaning, and the
//! encoder prints keys in ascending byte order.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::EvalError;

/// Key/value storage for [`Value::Object`].
pub type Map = BTreeMap<String, Value>;

/// A parsed JSON datum.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Object(Map),
    Array(Vec<Value>),
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
}

/// The variant tag of a [`Value`], used in type-mismatch diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Object => "object",
            ValueKind::Array => "array",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Null => "null",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Expected-kind description for values that have a length.
pub(crate) const SIZED: &str = "object, array, or string";

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Object(_) => ValueKind::Object,
            Value::Array(_) => ValueKind::Array,
            Value::String(_) => ValueKind::String,
            Value::Number(_) => ValueKind::Number,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Null => ValueKind::Null,
        }
    }

    fn mismatch(&self, expected: &'static str) -> EvalError {
        EvalError::TypeMismatch {
            expected,
            actual: self.kind(),
        }
    }

    /// Look up `key` in an object.
    ///
    /// # Errors
    /// `TypeMismatch` if `self` is not an object, `FieldNotFound` if the key
    /// is absent.
    pub fn field(&self, key: &str) -> Result<&Value, EvalError> {
        match self {
            Value::Object(map) => map
                .get(key)
                .ok_or_else(|| EvalError::FieldNotFound(key.to_string())),
            other => Err(other.mismatch(ValueKind::Object.name())),
        }
    }

    /// Fetch element `i` of an array.
    ///
    /// # Errors
    /// `TypeMismatch` if `self` is not an array, `IndexOutOfBounds` if
    /// `i >= len`.
    pub fn index(&self, i: usize) -> Result<&Value, EvalError> {
        match self {
            Value::Array(items) => items.get(i).ok_or(EvalError::IndexOutOfBounds {
                index: i64::try_from(i).unwrap_or(i64::MAX),
                length: items.len(),
            }),
            other => Err(other.mismatch(ValueKind::Array.name())),
        }
    }

    /// Entry count of an object, element count of an array, or character
    /// count of a string.
    ///
    /// # Errors
    /// `TypeMismatch` for numbers, booleans, and null.
    pub fn len(&self) -> Result<usize, EvalError> {
        match self {
            Value::Object(map) => Ok(map.len()),
            Value::Array(items) => Ok(items.len()),
            Value::String(s) => Ok(s.chars().count()),
            other => Err(other.mismatch(SIZED)),
        }
    }

    pub fn is_empty(&self) -> Result<bool, EvalError> {
        self.len().map(|n| n == 0)
    }

    /// # Errors
    /// `TypeMismatch` unless `self` is a number.
    pub fn as_number(&self) -> Result<f64, EvalError> {
        match self {
            Value::Number(n) => Ok(*n),
            other => Err(other.mismatch(ValueKind::Number.name())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn get_index(&self, i: usize) -> Option<&Value> {
        match self {
            Value::Array(items) => items.get(i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    /// Compact JSON text, as produced by [`crate::encode`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::encoder::encode(self))
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

/// Numbers go through `f64`: integers beyond 2^53 round to the nearest
/// representable value, as they do when decoding JSON text.
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    /// Non-finite numbers have no JSON form and become `null`.
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        serde_json::Value::from(&value)
    }
}

/// Integral values within the exactly-representable range keep an integer
/// JSON form so `2.0` prints as `2`.
fn number_to_json(n: f64) -> serde_json::Value {
    if is_exact_integer(n) {
        serde_json::Value::Number(serde_json::Number::from(n as i64))
    } else {
        serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

/// True for finite integral values with magnitude below 2^53, where every
/// integer is exactly representable as f64.
pub(crate) fn is_exact_integer(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < (1u64 << 53) as f64
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Number(n) if is_exact_integer(*n) => serializer.serialize_i64(*n as i64),
            Value::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            Value::Number(_) => serializer.serialize_unit(),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

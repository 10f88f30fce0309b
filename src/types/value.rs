//! # Runtime Value Representation
//!
//! `Value` is the dynamic, schema-independent value tree that codecs encode
//! from and decode into. It mirrors a JSON document with two extra leaves
//! (blobs and dates) that JSON cannot express natively.
//!
//! ## Value Variants
//!
//! | Variant | Rust Type | Produced by decoding |
//! |---------|-----------|----------------------|
//! | Null | - | `null` payloads |
//! | Bool | bool | `bool` |
//! | Int | i64 | `bits`, `varint` |
//! | Float | f64 | `float` |
//! | Text | String | `string` |
//! | Blob | Vec<u8> | `blob` |
//! | Date | f64 | `date` (milliseconds since the Unix epoch) |
//! | Array | Vec<Value> | `array` |
//! | Object | IndexMap<String, Value> | `object`, `selectOne`, `selectMany` |
//!
//! ## Field Order
//!
//! Objects preserve insertion order, so a decoded object always lists fields
//! in schema declaration order. Equality compares entries, not order.
//!
//! ## JSON Conversion
//!
//! ```ignore
//! let value = Value::from_json(&serde_json::json!({"a": 1, "b": [true]}));
//! assert_eq!(value.to_json(), serde_json::json!({"a": 1, "b": [true]}));
//! ```
//!
//! Blobs convert to arrays of byte numbers and dates to plain numbers, so
//! `to_json` is lossy for those two variants.

use indexmap::IndexMap;
use serde_json::{Map, Number};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
    Date(f64),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    /// Builds an object from `(name, value)` pairs, keeping their order.
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Array(items.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Field lookup on objects; `None` for missing keys and non-objects.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) | Value::Date(f) => Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Blob(bytes) => serde_json::Value::Array(
                bytes.iter().map(|b| serde_json::Value::Number((*b).into())).collect(),
            ),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, serde_json::Value>>(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Object(map)
    }
}

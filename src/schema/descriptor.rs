//! # Schema Descriptors
//!
//! A `Descriptor` is the caller-authored description of a record's shape. It
//! is plain data: nothing is validated until [`crate::schema::compile`] turns it
//! into a [`crate::schema::CompiledSchema`].
//!
//! ## Node Kinds
//!
//! | Kind | Parameters | Wire form |
//! |------|------------|-----------|
//! | `bool` | - | 1 bit packed, 1 byte standalone |
//! | `bits(n)` | 1..=32 | n bits packed, 1/2/4 bytes standalone |
//! | `float(n)` | 16, 32, 64 | n/8 bytes |
//! | `varint` | - | 1, 2 or 4 bytes |
//! | `string(values?)` | closed value list | enum index, or varint length + UTF-8 |
//! | `blob(len?)` | fixed length | raw bytes, or varint length + bytes |
//! | `date(p?)` | 32 or 64 | float milliseconds |
//! | `array(el, len?)` | element, fixed length | varint length (unless fixed) + elements |
//! | `object(fields)` | ordered fields | packed words, then plain fields |
//! | `selectOne(variants)` | named payloads | variant index + payload |
//! | `selectMany(variants)` | named payloads | presence bitmasks + payloads |
//! | `null` | - | nothing |
//!
//! ## JSON Layout
//!
//! Descriptors travel as JSON so a schema can be shipped ahead of its data:
//!
//! ```text
//! {
//!   "id":    {"_type": "bits", "val": 12},
//!   "kind":  {"_type": "string", "val": ["", "user", "bot"]},
//!   "tags":  {"_type": "array", "val": {"_type": "string"}, "length": 3},
//!   "event": {"_type": "selectOne", "val": {"ping": null, "move": {"_type": "varint"}}}
//! }
//! ```
//!
//! A JSON object without a string `_type` key is an `object` node whose keys
//! are its fields, in document order. JSON `null` is the `null` node.

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Map};

use crate::error::SchemaError;

#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    Bool,
    Bits(u32),
    Float(u32),
    Varint,
    String(Option<Vec<String>>),
    Blob(Option<usize>),
    Date(Option<u32>),
    Array {
        element: Box<Descriptor>,
        length: Option<usize>,
    },
    Object(Vec<(String, Descriptor)>),
    SelectOne(Vec<(String, Descriptor)>),
    SelectMany(Vec<(String, Descriptor)>),
    Null,
}

fn named<K: Into<String>, I: IntoIterator<Item = (K, Descriptor)>>(
    items: I,
) -> Vec<(String, Descriptor)> {
    items.into_iter().map(|(k, d)| (k.into(), d)).collect()
}

impl Descriptor {
    pub fn bits(width: u32) -> Self {
        Descriptor::Bits(width)
    }

    pub fn float(width: u32) -> Self {
        Descriptor::Float(width)
    }

    pub fn string() -> Self {
        Descriptor::String(None)
    }

    /// A closed set of strings stored as an index.
    pub fn enumeration<S: Into<String>, I: IntoIterator<Item = S>>(values: I) -> Self {
        Descriptor::String(Some(values.into_iter().map(Into::into).collect()))
    }

    pub fn blob() -> Self {
        Descriptor::Blob(None)
    }

    pub fn fixed_blob(length: usize) -> Self {
        Descriptor::Blob(Some(length))
    }

    pub fn date(precision: u32) -> Self {
        Descriptor::Date(Some(precision))
    }

    pub fn array(element: Descriptor) -> Self {
        Descriptor::Array {
            element: Box::new(element),
            length: None,
        }
    }

    pub fn fixed_array(element: Descriptor, length: usize) -> Self {
        Descriptor::Array {
            element: Box::new(element),
            length: Some(length),
        }
    }

    pub fn object<K: Into<String>, I: IntoIterator<Item = (K, Descriptor)>>(fields: I) -> Self {
        Descriptor::Object(named(fields))
    }

    pub fn select_one<K: Into<String>, I: IntoIterator<Item = (K, Descriptor)>>(
        variants: I,
    ) -> Self {
        Descriptor::SelectOne(named(variants))
    }

    pub fn select_many<K: Into<String>, I: IntoIterator<Item = (K, Descriptor)>>(
        variants: I,
    ) -> Self {
        Descriptor::SelectMany(named(variants))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Descriptor::Bool => "bool",
            Descriptor::Bits(_) => "bits",
            Descriptor::Float(_) => "float",
            Descriptor::Varint => "varint",
            Descriptor::String(_) => "string",
            Descriptor::Blob(_) => "blob",
            Descriptor::Date(_) => "date",
            Descriptor::Array { .. } => "array",
            Descriptor::Object(_) => "object",
            Descriptor::SelectOne(_) => "selectOne",
            Descriptor::SelectMany(_) => "selectMany",
            Descriptor::Null => "null",
        }
    }

    /// Parses a descriptor from its JSON text form.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &serde_json::Value) -> Result<Self, SchemaError> {
        parse_node(json, "$")
    }

    pub fn to_json(&self) -> serde_json::Value {
        let tagged = |val: Option<serde_json::Value>| match val {
            Some(val) => json!({"_type": self.type_name(), "val": val}),
            None => json!({"_type": self.type_name()}),
        };
        match self {
            Descriptor::Null => serde_json::Value::Null,
            Descriptor::Bool | Descriptor::Varint => tagged(None),
            Descriptor::Bits(n) | Descriptor::Float(n) => tagged(Some(json!(n))),
            Descriptor::String(values) => tagged(values.as_ref().map(|v| json!(v))),
            Descriptor::Blob(length) => tagged(length.map(|n| json!(n))),
            Descriptor::Date(precision) => tagged(precision.map(|p| json!(p))),
            Descriptor::Array { element, length } => {
                let mut node = tagged(Some(element.to_json()));
                if let (Some(n), Some(map)) = (length, node.as_object_mut()) {
                    map.insert("length".to_string(), json!(n));
                }
                node
            }
            Descriptor::Object(fields) => serde_json::Value::Object(fields_to_json(fields)),
            Descriptor::SelectOne(variants) | Descriptor::SelectMany(variants) => {
                tagged(Some(serde_json::Value::Object(fields_to_json(variants))))
            }
        }
    }
}

fn fields_to_json(fields: &[(String, Descriptor)]) -> Map<String, serde_json::Value> {
    fields
        .iter()
        .map(|(name, d)| (name.clone(), d.to_json()))
        .collect()
}

fn malformed(path: &str, reason: impl Into<String>) -> SchemaError {
    SchemaError::Malformed {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn parse_node(json: &serde_json::Value, path: &str) -> Result<Descriptor, SchemaError> {
    let map = match json {
        serde_json::Value::Null => return Ok(Descriptor::Null),
        serde_json::Value::Object(map) => map,
        other => return Err(malformed(path, format!("expected object or null, got {other}"))),
    };

    let Some(tag) = map.get("_type").and_then(|t| t.as_str()) else {
        return Ok(Descriptor::Object(parse_fields(map, path)?));
    };

    let val = map.get("val").filter(|v| !v.is_null());
    let val_path = format!("{path}.val");
    let number = |v: Option<&serde_json::Value>| -> Result<Option<u64>, SchemaError> {
        v.map(|v| {
            v.as_u64()
                .ok_or_else(|| malformed(&val_path, format!("expected unsigned integer, got {v}")))
        })
        .transpose()
    };
    let required = |v: Option<u64>| v.ok_or_else(|| malformed(&val_path, format!("{tag} requires val")));
    let width = |v: u64| {
        u32::try_from(v).map_err(|_| malformed(&val_path, format!("{v} does not fit in 32 bits")))
    };

    Ok(match tag {
        "bool" => Descriptor::Bool,
        "varint" => Descriptor::Varint,
        "null" => Descriptor::Null,
        "bits" => Descriptor::Bits(width(required(number(val)?)?)?),
        "float" => Descriptor::Float(width(required(number(val)?)?)?),
        // a zero length means the length is carried on the wire
        "blob" => Descriptor::Blob(number(val)?.filter(|&n| n > 0).map(|n| n as usize)),
        "date" => Descriptor::Date(number(val)?.map(width).transpose()?),
        "string" => Descriptor::String(
            val.map(|v| parse_string_list(v, &val_path)).transpose()?,
        ),
        "array" => {
            let element = val.ok_or_else(|| malformed(&val_path, "array requires val"))?;
            let length = number(map.get("length").filter(|v| !v.is_null()))?.filter(|&n| n > 0);
            Descriptor::Array {
                element: Box::new(parse_node(element, &val_path)?),
                length: length.map(|n| n as usize),
            }
        }
        "object" | "selectOne" | "selectMany" => {
            let fields = match val {
                Some(serde_json::Value::Object(fields)) => parse_fields(fields, &val_path)?,
                _ => return Err(malformed(&val_path, format!("{tag} requires an object val"))),
            };
            match tag {
                "object" => Descriptor::Object(fields),
                "selectOne" => Descriptor::SelectOne(fields),
                _ => Descriptor::SelectMany(fields),
            }
        }
        other => return Err(SchemaError::UnknownType(other.to_string())),
    })
}

fn parse_fields(
    map: &Map<String, serde_json::Value>,
    path: &str,
) -> Result<Vec<(String, Descriptor)>, SchemaError> {
    map.iter()
        .map(|(name, child)| Ok((name.clone(), parse_node(child, &format!("{path}.{name}"))?)))
        .collect()
}

fn parse_string_list(json: &serde_json::Value, path: &str) -> Result<Vec<String>, SchemaError> {
    let items = json
        .as_array()
        .ok_or_else(|| malformed(path, "string values must be an array"))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| malformed(path, format!("expected string, got {item}")))
        })
        .collect()
}

impl FromStr for Descriptor {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Descriptor::parse(s)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

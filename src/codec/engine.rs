//! # Codec Engine
//!
//! Recursive encode and decode over a [`CompiledSchema`]. Both directions walk
//! the node arena in the same declaration-derived order, so the wire format
//! needs no tags or field names.
//!
//! ## Dispatch
//!
//! | Node | Encode input | Wire | Decode output |
//! |------|--------------|------|---------------|
//! | `bool` | Bool, Int | u8 0/1 | Bool |
//! | `bits(n)` | Int, Bool, integral Float | u8/u16/u32 | Int |
//! | enum `string` | Text | index u8/u16/u32 | Text |
//! | `string` | Text | varint len + UTF-8 | Text |
//! | `float(n)` | Float, Int | f16/f32/f64 | Float |
//! | `date(p)` | Date, Float, Int | f32/f64 | Date |
//! | `varint` | Int, Bool, integral Float | 1/2/4 bytes | Int |
//! | `blob` | Blob, Text, array of bytes | [varint len +] bytes | Blob |
//! | `null` | anything | nothing | Null |
//!
//! Composite nodes live in `object`, `array` and `variant`. `Null` input
//! encodes the kind's default everywhere.
//!
//! ## Packed Values
//!
//! `bool`, `bits` and enum strings are the only nodes with a bit width. Their
//! effective integer is computed by [`packed_value`], which is shared by
//! standalone fields, object word-groups and dense arrays, and range-checked
//! against the width so an out-of-range value names the field that caused it.

use std::borrow::Cow;

use eyre::Result;

use crate::buffer::{ReadBuffer, WriteBuffer};
use crate::config::MAX_ZERO_WIDTH_ELEMENTS;
use crate::encoding::{checked_varint, max_value, UintWidth};
use crate::error::EncodeError;
use crate::schema::{CompiledSchema, Node, NodeId, NodeKind};
use crate::types::Value;

/// Stand-in for missing object fields and array elements.
pub(super) static NULL: Value = Value::Null;

/// Name reported for values that are not inside any object field.
pub(crate) const ROOT: &str = "$";

pub(super) fn mismatch(expected: &'static str, found: &Value) -> EncodeError {
    EncodeError::TypeMismatch {
        expected,
        found: found.type_name(),
    }
}

/// Effective integer of a `bool`, `bits` or enum string node.
pub(super) fn packed_value(node: &Node, value: &Value, name: &str) -> Result<u32, EncodeError> {
    let raw = match (&node.kind, value) {
        (_, Value::Null) => 0,
        (NodeKind::Bool, Value::Bool(b)) => *b as i64,
        (NodeKind::Bool, Value::Int(i)) => (*i != 0) as i64,
        (NodeKind::Bits { .. }, Value::Int(i)) => *i,
        (NodeKind::Bits { .. }, Value::Bool(b)) => *b as i64,
        (NodeKind::Bits { .. }, Value::Float(f)) if f.fract() == 0.0 => *f as i64,
        (NodeKind::Enum(map), Value::Text(s)) => map.index_of(s).unwrap_or(0) as i64,
        (_, other) => return Err(mismatch(node.type_name(), other)),
    };
    let max = max_value(node.bits.unwrap_or(32));
    if raw < 0 || raw as u64 > max {
        return Err(EncodeError::OutOfRange {
            field: name.to_string(),
            value: raw,
            max,
        });
    }
    Ok(raw as u32)
}

/// Rebuilds the value of a `bool`, `bits` or enum string node.
pub(super) fn unpacked_value(node: &Node, raw: u32) -> Value {
    match &node.kind {
        NodeKind::Bool => Value::Bool(raw != 0),
        NodeKind::Enum(map) => Value::Text(map.key(raw).unwrap_or_default().to_string()),
        _ => Value::Int(raw as i64),
    }
}

fn standalone_width(node: &Node) -> UintWidth {
    match &node.kind {
        NodeKind::Bits { width } => *width,
        NodeKind::Enum(map) => map.width(),
        _ => UintWidth::U8,
    }
}

fn number_value(expected: &'static str, value: &Value) -> Result<f64, EncodeError> {
    match value {
        Value::Null => Ok(0.0),
        Value::Float(f) | Value::Date(f) => Ok(*f),
        Value::Int(i) => Ok(*i as f64),
        other => Err(mismatch(expected, other)),
    }
}

fn integer_value(value: &Value) -> Result<i64, EncodeError> {
    match value {
        Value::Null => Ok(0),
        Value::Int(i) => Ok(*i),
        Value::Bool(b) => Ok(*b as i64),
        Value::Float(f) if f.fract() == 0.0 => Ok(*f as i64),
        other => Err(mismatch("varint", other)),
    }
}

fn blob_bytes(value: &Value) -> Result<Cow<'_, [u8]>, EncodeError> {
    match value {
        Value::Null => Ok(Cow::Borrowed(&[])),
        Value::Blob(bytes) => Ok(Cow::Borrowed(bytes)),
        Value::Text(s) => Ok(Cow::Borrowed(s.as_bytes())),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Int(i) => u8::try_from(*i).map_err(|_| mismatch("byte", item)),
                other => Err(mismatch("byte", other)),
            })
            .collect::<Result<Vec<u8>, _>>()
            .map(Cow::Owned),
        other => Err(mismatch("blob", other)),
    }
}

/// Encode-side walker writing into a borrowed buffer.
pub(crate) struct Encoder<'a> {
    pub(super) schema: &'a CompiledSchema,
    pub(super) out: &'a mut WriteBuffer,
}

impl<'a> Encoder<'a> {
    pub(crate) fn new(schema: &'a CompiledSchema, out: &'a mut WriteBuffer) -> Self {
        Self { schema, out }
    }

    /// Encodes `value` as node `id`. `name` is the enclosing field, used in
    /// range errors.
    pub(crate) fn encode(&mut self, id: NodeId, value: &Value, name: &str) -> Result<(), EncodeError> {
        let schema = self.schema;
        let node = schema.node(id);
        match &node.kind {
            NodeKind::Bool | NodeKind::Bits { .. } | NodeKind::Enum(_) => {
                let raw = packed_value(node, value, name)?;
                self.out.write_uint(raw, standalone_width(node));
            }
            NodeKind::Float(width) => self.out.write_float(number_value("float", value)?, *width),
            NodeKind::Date(width) => self.out.write_float(number_value("date", value)?, *width),
            NodeKind::Varint => self.out.write_varint(checked_varint(integer_value(value)?)?),
            NodeKind::Text => {
                let text = match value {
                    Value::Null => "",
                    Value::Text(s) => s.as_str(),
                    other => return Err(mismatch("string", other)),
                };
                self.write_len(text.len())?;
                self.out.write_bytes(text.as_bytes());
            }
            NodeKind::Blob { length } => {
                let bytes = blob_bytes(value)?;
                match length {
                    Some(n) => {
                        let kept = bytes.len().min(*n);
                        self.out.write_bytes(&bytes[..kept]);
                        self.out.write_zeros(n - kept);
                    }
                    None => {
                        self.write_len(bytes.len())?;
                        self.out.write_bytes(&bytes);
                    }
                }
            }
            NodeKind::Array {
                element,
                length,
                packing,
            } => self.array(*element, *length, *packing, value, name)?,
            NodeKind::Object { fields, plan } => self.object(fields, *plan, value)?,
            NodeKind::SelectOne { variants, payloads } => self.select_one(variants, payloads, value)?,
            NodeKind::SelectMany { variants, payloads } => {
                self.select_many(variants, payloads, value)?
            }
            NodeKind::Null => {}
        }
        Ok(())
    }

    pub(super) fn write_len(&mut self, len: usize) -> Result<(), EncodeError> {
        let len = checked_varint(i64::try_from(len).unwrap_or(i64::MAX))?;
        self.out.write_varint(len);
        Ok(())
    }
}

/// Decode-side walker over caller bytes.
pub(crate) struct Decoder<'a, 'b> {
    pub(super) schema: &'a CompiledSchema,
    pub(super) input: ReadBuffer<'b>,
    /// Zero-width array elements this decode may still produce.
    pub(super) zero_width_budget: usize,
}

impl<'a, 'b> Decoder<'a, 'b> {
    pub(crate) fn new(schema: &'a CompiledSchema, bytes: &'b [u8]) -> Self {
        Self {
            schema,
            input: ReadBuffer::new(bytes),
            zero_width_budget: MAX_ZERO_WIDTH_ELEMENTS,
        }
    }

    pub(crate) fn decode(&mut self, id: NodeId) -> Result<Value> {
        let schema = self.schema;
        let node = schema.node(id);
        Ok(match &node.kind {
            NodeKind::Bool | NodeKind::Bits { .. } | NodeKind::Enum(_) => {
                let raw = self.input.read_uint(standalone_width(node))?;
                unpacked_value(node, raw)
            }
            NodeKind::Float(width) => Value::Float(self.input.read_float(*width)?),
            NodeKind::Date(width) => Value::Date(self.input.read_float(*width)?),
            NodeKind::Varint => Value::Int(self.input.read_varint()? as i64),
            NodeKind::Text => {
                let len = self.input.read_varint()? as usize;
                Value::Text(self.input.read_str(len)?.to_string())
            }
            NodeKind::Blob { length } => {
                let len = match length {
                    Some(n) => *n,
                    None => self.input.read_varint()? as usize,
                };
                Value::Blob(self.input.read_bytes(len)?.to_vec())
            }
            NodeKind::Array {
                element,
                length,
                packing,
            } => self.array(*element, *length, *packing)?,
            NodeKind::Object { fields, plan } => self.object(fields, *plan)?,
            NodeKind::SelectOne { variants, payloads } => self.select_one(variants, payloads)?,
            NodeKind::SelectMany { variants, payloads } => self.select_many(variants, payloads)?,
            NodeKind::Null => Value::Null,
        })
    }

    pub(crate) fn position(&self) -> usize {
        self.input.position()
    }
}

//! # Object Assembly
//!
//! An object is written as its packed word-groups followed by its plain
//! fields:
//!
//! ```text
//! object { a: bits(3), b: bool, c: string }   value { a: 5, b: true, c: "hi" }
//!
//! +-------------+------+-----+-----+
//! | 0b0000_1011 | 0x02 | 'h' | 'i' |
//! +-------------+------+-----+-----+
//!   u8 word       varint len + UTF-8
//!   a=101 b=1
//! ```
//!
//! Packed values go through a per-call scratch vector indexed by pack slot,
//! so the compiled schema is never written to. Word-groups are emitted in
//! plan order, plain fields in declaration order. Decoding fills the scratch
//! from the words first, then rebuilds the object in declaration order.

use eyre::Result;
use indexmap::IndexMap;
use smallvec::{smallvec, SmallVec};

use crate::encoding::{WordPacker, WordUnpacker};
use crate::error::EncodeError;
use crate::schema::{Field, PlanId};
use crate::types::Value;

use super::engine::{mismatch, packed_value, unpacked_value, Decoder, Encoder, NULL};

type Scratch = SmallVec<[u32; 16]>;

fn field_value<'v>(map: Option<&'v IndexMap<String, Value>>, name: &str) -> &'v Value {
    map.and_then(|map| map.get(name)).unwrap_or(&NULL)
}

impl Encoder<'_> {
    pub(super) fn object(
        &mut self,
        fields: &[Field],
        plan: Option<PlanId>,
        value: &Value,
    ) -> Result<(), EncodeError> {
        let map = match value {
            Value::Object(map) => Some(map),
            Value::Null => None,
            other => return Err(mismatch("object", other)),
        };
        let schema = self.schema;

        if let Some(plan) = plan {
            let plan = schema.plan(plan);
            let mut scratch: Scratch = smallvec![0; plan.slots];
            for field in fields {
                if let Some(slot) = field.slot {
                    let node = schema.node(field.node);
                    scratch[slot] = packed_value(node, field_value(map, &field.name), &field.name)?;
                }
            }
            for group in &plan.groups {
                let mut packer = WordPacker::new();
                for member in &group.members {
                    packer.push(scratch[member.slot], member.bits);
                }
                self.out.write_uint(packer.finish(), group.width);
            }
        }

        for field in fields.iter().filter(|field| field.slot.is_none()) {
            self.encode(field.node, field_value(map, &field.name), &field.name)?;
        }
        Ok(())
    }
}

impl Decoder<'_, '_> {
    pub(super) fn object(&mut self, fields: &[Field], plan: Option<PlanId>) -> Result<Value> {
        let schema = self.schema;
        let mut scratch = Scratch::new();

        if let Some(plan) = plan {
            let plan = schema.plan(plan);
            scratch.resize(plan.slots, 0);
            for group in &plan.groups {
                let mut unpacker = WordUnpacker::new(self.input.read_uint(group.width)?);
                for member in group.members.iter().rev() {
                    scratch[member.slot] = unpacker.pop(member.bits);
                }
            }
        }

        let mut object = IndexMap::with_capacity(fields.len());
        for field in fields {
            let value = match field.slot {
                Some(slot) => unpacked_value(schema.node(field.node), scratch[slot]),
                None => self.decode(field.node)?,
            };
            object.insert(field.name.clone(), value);
        }
        Ok(Value::Object(object))
    }
}

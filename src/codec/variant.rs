//! # Variant Codecs
//!
//! ## selectOne
//!
//! A tagged union: the variant index in the narrowest of 1, 2 or 4 bytes that
//! covers the variant count, followed by that variant's payload.
//!
//! ```text
//! selectOne { s1: null, s2: bits(3) }   { s2: 3 }   =>   01 03
//! ```
//!
//! The input must be an object with a variant key. When it has several keys
//! the first one in insertion order is encoded.
//!
//! ## selectMany
//!
//! Any subset of the variants. Variants are split into chunks of 32; every
//! chunk gets one presence bitmask (bit `i` for the chunk's `i`-th variant)
//! sized to the chunk. All bitmasks come first, then the payloads of the
//! present variants in declaration order.
//!
//! ```text
//! 40 variants, { v0, v35 } present
//!
//! | u32 mask 0x0000_0001 | u8 mask 0x08 | payload v0 | payload v35 |
//! ```

use eyre::{eyre, Result};
use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::config::SELECT_MANY_CHUNK;
use crate::encoding::UintWidth;
use crate::error::EncodeError;
use crate::schema::{EnumMap, NodeId};
use crate::types::Value;

use super::engine::{mismatch, Decoder, Encoder, NULL};

/// Storage width of the presence bitmask covering `variants` variants.
fn mask_width(variants: usize) -> UintWidth {
    UintWidth::for_bytes(variants.div_ceil(8))
}

impl Encoder<'_> {
    pub(super) fn select_one(
        &mut self,
        variants: &EnumMap,
        payloads: &[NodeId],
        value: &Value,
    ) -> Result<(), EncodeError> {
        let (key, payload) = match value {
            Value::Object(map) => {
                let (key, payload) = map.get_index(0).ok_or(EncodeError::EmptySelection)?;
                if map.len() > 1 {
                    debug!(keys = map.len(), selected = %key, "selectOne ignoring extra keys");
                }
                (key.as_str(), payload)
            }
            Value::Null => (variants.keys()[0].as_str(), &NULL),
            other => return Err(mismatch("selectOne", other)),
        };
        let index = variants
            .index_of(key)
            .ok_or_else(|| EncodeError::UnknownVariant(key.to_string()))?;

        self.out.write_uint(index, variants.width());
        self.encode(payloads[index as usize], payload, key)
    }

    pub(super) fn select_many(
        &mut self,
        variants: &EnumMap,
        payloads: &[NodeId],
        value: &Value,
    ) -> Result<(), EncodeError> {
        let map = match value {
            Value::Object(map) => Some(map),
            Value::Null => None,
            other => return Err(mismatch("selectMany", other)),
        };
        if let Some(unknown) = map
            .into_iter()
            .flat_map(|map| map.keys())
            .find(|key| variants.index_of(key).is_none())
        {
            return Err(EncodeError::UnknownVariant(unknown.clone()));
        }
        let present = |name: &str| map.is_some_and(|map| map.contains_key(name));

        for chunk in variants.keys().chunks(SELECT_MANY_CHUNK) {
            let mask = chunk
                .iter()
                .enumerate()
                .filter(|(_, name)| present(name))
                .fold(0u32, |mask, (bit, _)| mask | (1 << bit));
            self.out.write_uint(mask, mask_width(chunk.len()));
        }

        if let Some(map) = map {
            for (name, payload) in variants.keys().iter().zip(payloads) {
                if let Some(value) = map.get(name) {
                    self.encode(*payload, value, name)?;
                }
            }
        }
        Ok(())
    }
}

impl Decoder<'_, '_> {
    pub(super) fn select_one(&mut self, variants: &EnumMap, payloads: &[NodeId]) -> Result<Value> {
        let index = self.input.read_uint(variants.width())?;
        let key = variants.key(index).ok_or_else(|| {
            eyre!(
                "selectOne variant index {} out of range for {} variants",
                index,
                variants.len()
            )
        })?;
        let payload = self.decode(payloads[index as usize])?;

        let mut object = IndexMap::with_capacity(1);
        object.insert(key.to_string(), payload);
        Ok(Value::Object(object))
    }

    pub(super) fn select_many(&mut self, variants: &EnumMap, payloads: &[NodeId]) -> Result<Value> {
        let mut masks: SmallVec<[u32; 2]> = SmallVec::new();
        for chunk in variants.keys().chunks(SELECT_MANY_CHUNK) {
            masks.push(self.input.read_uint(mask_width(chunk.len()))?);
        }

        let mut object = IndexMap::new();
        for (i, (name, payload)) in variants.keys().iter().zip(payloads).enumerate() {
            let mask = masks[i / SELECT_MANY_CHUNK];
            if mask & (1 << (i % SELECT_MANY_CHUNK)) != 0 {
                object.insert(name.clone(), self.decode(*payload)?);
            }
        }
        Ok(Value::Object(object))
    }
}

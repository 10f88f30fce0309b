//! # Arrays
//!
//! An array is a varint element count (omitted for fixed-length arrays)
//! followed by its elements.
//!
//! ## Dense Layout
//!
//! When the element has a packable bit width, elements are folded into
//! shared words instead of one standalone word each:
//!
//! ```text
//! array(bits(2)) [1, 2, 3, 0, 1, 2, 3, 0, 1]
//!
//! 0x09 | 0b01_10_11_00 | 0b01_10_11_00 | 0b0000_0001
//! len    word 1          word 2          partial word (1 element)
//! ```
//!
//! A word is flushed every `per_word` elements and once more for a trailing
//! partial group. The decoder knows the count, so it unpacks the final word
//! with exactly the number of elements that remain.
//!
//! ## Fixed Length
//!
//! A fixed-length array rejects inputs of any other length. `Null` input
//! encodes the declared number of default elements.
//!
//! ## Zero-Width Elements
//!
//! Elements such as `null` or an empty object occupy no bytes, so their count
//! is not bounded by the input. Each decode draws such elements from a shared
//! budget of [`MAX_ZERO_WIDTH_ELEMENTS`] and fails once it is spent.

use eyre::{ensure, Result};

use crate::config::{ArrayPacking, MAX_ZERO_WIDTH_ELEMENTS};
use crate::encoding::{UintWidth, WordPacker, WordUnpacker};
use crate::error::EncodeError;
use crate::schema::NodeId;
use crate::types::Value;

use super::engine::{mismatch, packed_value, unpacked_value, Decoder, Encoder, NULL};

impl Encoder<'_> {
    pub(super) fn array(
        &mut self,
        element: NodeId,
        length: Option<usize>,
        packing: Option<ArrayPacking>,
        value: &Value,
        name: &str,
    ) -> Result<(), EncodeError> {
        let items: &[Value] = match value {
            Value::Null => &[],
            Value::Array(items) => items,
            other => return Err(mismatch("array", other)),
        };

        let count = match length {
            Some(expected) => {
                if !value.is_null() && items.len() != expected {
                    return Err(EncodeError::LengthMismatch {
                        expected,
                        actual: items.len(),
                    });
                }
                expected
            }
            None => {
                self.write_len(items.len())?;
                items.len()
            }
        };
        let item = |i: usize| items.get(i).unwrap_or(&NULL);

        let Some(packing) = packing else {
            for i in 0..count {
                self.encode(element, item(i), name)?;
            }
            return Ok(());
        };

        let node = self.schema.node(element);
        let width = UintWidth::for_bytes(packing.word_bytes);
        let mut packer = WordPacker::new();
        let mut filled = 0;
        for i in 0..count {
            packer.push(packed_value(node, item(i), name)?, packing.width);
            filled += 1;
            if filled == packing.per_word {
                self.out.write_uint(packer.finish(), width);
                packer = WordPacker::new();
                filled = 0;
            }
        }
        if filled > 0 {
            self.out.write_uint(packer.finish(), width);
        }
        Ok(())
    }
}

impl Decoder<'_, '_> {
    pub(super) fn array(
        &mut self,
        element: NodeId,
        length: Option<usize>,
        packing: Option<ArrayPacking>,
    ) -> Result<Value> {
        let count = match length {
            Some(n) => n,
            None => self.input.read_varint()? as usize,
        };
        if self.schema.node(element).min_len == 0 {
            ensure!(
                count <= self.zero_width_budget,
                "array of {} zero-width elements exceeds the decode limit of {}",
                count,
                MAX_ZERO_WIDTH_ELEMENTS
            );
            self.zero_width_budget -= count;
        }
        let mut items = Vec::with_capacity(count.min(self.input.remaining()));

        let Some(packing) = packing else {
            for _ in 0..count {
                items.push(self.decode(element)?);
            }
            return Ok(Value::Array(items));
        };

        let node = self.schema.node(element);
        let width = UintWidth::for_bytes(packing.word_bytes);
        let mut remaining = count;
        while remaining > 0 {
            let take = remaining.min(packing.per_word);
            let mut unpacker = WordUnpacker::new(self.input.read_uint(width)?);
            let start = items.len();
            for _ in 0..take {
                items.push(unpacked_value(node, unpacker.pop(packing.width)));
            }
            items[start..].reverse();
            remaining -= take;
        }
        Ok(Value::Array(items))
    }
}

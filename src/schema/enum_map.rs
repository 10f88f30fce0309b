//! # Enumeration Maps
//!
//! An `EnumMap` is a closed, ordered set of names with O(1) lookup in both
//! directions. It backs enum strings (`string([...])`) and the variant tables
//! of `selectOne`/`selectMany`.
//!
//! For enum strings index 0 is always the empty string: it is inserted when
//! the caller's list omits it, and it doubles as the fallback for unknown
//! input on encode and out-of-range indexes on decode.
//!
//! ```text
//! string(["red", "green"])  =>  0:""  1:"red"  2:"green"   (2 bits, 1 byte)
//! ```

use hashbrown::HashMap;

use crate::encoding::UintWidth;
use crate::error::SchemaError;

#[derive(Debug, Clone)]
pub struct EnumMap {
    keys: Vec<String>,
    index: HashMap<String, u32>,
    bits: u32,
    width: UintWidth,
}

/// Bits needed to store every index below `len` (at least 1).
fn index_bits(len: usize) -> u32 {
    let max_index = len.saturating_sub(1) as u32;
    (u32::BITS - max_index.leading_zeros()).max(1)
}

impl EnumMap {
    /// Builds the map for an enum string, forcing `""` to index 0 and
    /// dropping repeated values.
    pub fn for_strings<S: AsRef<str>>(values: &[S]) -> Self {
        let mut keys = vec![String::new()];
        let mut index = HashMap::with_capacity(values.len() + 1);
        index.insert(String::new(), 0);
        for value in values {
            let value = value.as_ref();
            if !index.contains_key(value) {
                index.insert(value.to_string(), keys.len() as u32);
                keys.push(value.to_string());
            }
        }
        Self::from_parts(keys, index)
    }

    /// Builds the map for variant names; a repeated name is a schema error.
    pub fn for_variants<S: AsRef<str>>(names: &[S]) -> Result<Self, SchemaError> {
        let mut keys = Vec::with_capacity(names.len());
        let mut index = HashMap::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if index.insert(name.to_string(), keys.len() as u32).is_some() {
                return Err(SchemaError::DuplicateField(name.to_string()));
            }
            keys.push(name.to_string());
        }
        Ok(Self::from_parts(keys, index))
    }

    fn from_parts(keys: Vec<String>, index: HashMap<String, u32>) -> Self {
        let bits = index_bits(keys.len());
        Self {
            keys,
            index,
            bits,
            width: UintWidth::for_bits(bits),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Bit width of an index.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Storage width of a standalone index.
    pub fn width(&self) -> UintWidth {
        self.width
    }

    pub fn index_of(&self, key: &str) -> Option<u32> {
        self.index.get(key).copied()
    }

    pub fn key(&self, index: u32) -> Option<&str> {
        self.keys.get(index as usize).map(String::as_str)
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

//! # packbytes Configuration Constants
//!
//! This module centralizes the numeric constants that shape the wire format and
//! the encoder's buffer behaviour. Constants that depend on each other are
//! co-located and their relationships are enforced by compile-time assertions.
//!
//! ## Dependency Graph
//!
//! ```text
//! PACK_WORD_BITS (32)
//!       │
//!       ├─> MAX_BIT_WIDTH (32, bits(n) upper bound)
//!       │     Fields narrower than PACK_WORD_BITS are packed, bits(32) is not.
//!       │
//!       ├─> SELECT_MANY_CHUNK (32)
//!       │     One presence bitmask never exceeds a single 32-bit word.
//!       │
//!       └─> ARRAY_PACKING word sizes (each <= PACK_WORD_BITS / 8 bytes)
//!
//! VARINT_1_BYTE_MAX (127) < VARINT_2_BYTE_MAX (16383) < VARINT_MAX (2^30 - 1)
//!       │
//!       └─> Tier tags live in the top two bits of the first byte, so every
//!           tier above the first keeps only 6 value bits in byte 0.
//!
//! DEFAULT_BUFFER_SIZE (4096)
//!       │
//!       └─> Growth always at least doubles the required capacity.
//!
//! MAX_ZERO_WIDTH_ELEMENTS (65536) <= VARINT_MAX
//!       │
//!       └─> Elements that occupy no bytes (null, empty objects) are not
//!           bounded by the input length, so one decode materializes at most
//!           this many of them across all its arrays.
//! ```
//!
//! ## Critical Invariants
//!
//! 1. `VARINT_MAX == (1 << 30) - 1` (6 + 8 + 16 value bits)
//! 2. every `ARRAY_PACKING` entry satisfies `width * per_word <= word_bytes * 8`
//! 3. `SELECT_MANY_CHUNK <= PACK_WORD_BITS`
//! 4. `MAX_ZERO_WIDTH_ELEMENTS <= VARINT_MAX`
//!
//! ## Usage
//!
//! ```ignore
//! use crate::config::{DEFAULT_BUFFER_SIZE, VARINT_MAX};
//! ```

// ============================================================================
// BUFFER CONFIGURATION
// ============================================================================

/// Initial capacity of a codec's write buffer in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Factor applied to the required size when the write buffer overflows.
pub const BUFFER_GROWTH_FACTOR: usize = 2;

const _: () = assert!(BUFFER_GROWTH_FACTOR >= 2, "buffer growth must at least double");

// ============================================================================
// VARINT TIERS
// Tag-prefix scheme: 0xxxxxxx | 10xxxxxx + 1 | 11xxxxxx + 3
// ============================================================================

/// Largest value stored in the 1-byte tier.
pub const VARINT_1_BYTE_MAX: u32 = 127;

/// Largest value stored in the 2-byte tier.
pub const VARINT_2_BYTE_MAX: u32 = 16_383;

/// Largest value any varint can carry.
pub const VARINT_MAX: u32 = 1_073_741_823;

/// Tag bits for the 2-byte tier.
pub const VARINT_TAG_2: u8 = 0x80;

/// Tag bits for the 4-byte tier.
pub const VARINT_TAG_4: u8 = 0xC0;

/// Mask for the value bits kept in the first byte of a multi-byte varint.
pub const VARINT_LOW_MASK: u8 = 0x3F;

const _: () = assert!(VARINT_MAX == (1 << 30) - 1);
const _: () = assert!(VARINT_2_BYTE_MAX == (1 << 14) - 1);
const _: () = assert!(VARINT_1_BYTE_MAX == (1 << 7) - 1);

// ============================================================================
// DECODE LIMITS
// ============================================================================

/// Most zero-width array elements a single decode will produce.
pub const MAX_ZERO_WIDTH_ELEMENTS: usize = 65_536;

const _: () = assert!(MAX_ZERO_WIDTH_ELEMENTS <= VARINT_MAX as usize);

// ============================================================================
// BIT PACKING
// ============================================================================

/// Bit budget of one planner word. Fields at or above this width are plain.
pub const PACK_WORD_BITS: u32 = 32;

/// Widest integer accepted by `bits(n)`.
pub const MAX_BIT_WIDTH: u32 = 32;

/// Largest number of selectMany variants covered by one presence bitmask.
pub const SELECT_MANY_CHUNK: usize = 32;

const _: () = assert!(MAX_BIT_WIDTH <= PACK_WORD_BITS);
const _: () = assert!(SELECT_MANY_CHUNK as u32 <= PACK_WORD_BITS);

/// Dense array layout for one element width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayPacking {
    pub width: u32,
    pub per_word: usize,
    pub word_bytes: usize,
}

/// Packable element widths and the word layout that wastes the fewest bits.
///
/// | Width | Per word | Word bytes | Bits used |
/// |-------|----------|------------|-----------|
/// | 1     | 8        | 1          | 8         |
/// | 2     | 4        | 1          | 8         |
/// | 3     | 5        | 2          | 15        |
/// | 4     | 2        | 1          | 8         |
/// | 5     | 3        | 2          | 15        |
/// | 6     | 5        | 4          | 30        |
/// | 9     | 3        | 4          | 27        |
/// | 10    | 3        | 4          | 30        |
pub const ARRAY_PACKING: [ArrayPacking; 8] = [
    ArrayPacking { width: 1, per_word: 8, word_bytes: 1 },
    ArrayPacking { width: 2, per_word: 4, word_bytes: 1 },
    ArrayPacking { width: 3, per_word: 5, word_bytes: 2 },
    ArrayPacking { width: 4, per_word: 2, word_bytes: 1 },
    ArrayPacking { width: 5, per_word: 3, word_bytes: 2 },
    ArrayPacking { width: 6, per_word: 5, word_bytes: 4 },
    ArrayPacking { width: 9, per_word: 3, word_bytes: 4 },
    ArrayPacking { width: 10, per_word: 3, word_bytes: 4 },
];

const fn array_packing_fits() -> bool {
    let mut i = 0;
    while i < ARRAY_PACKING.len() {
        let entry = ARRAY_PACKING[i];
        if entry.width as usize * entry.per_word > entry.word_bytes * 8 {
            return false;
        }
        if entry.word_bytes * 8 > PACK_WORD_BITS as usize {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = assert!(array_packing_fits(), "ARRAY_PACKING entry overflows its word");

/// Returns the dense array layout for `width`, if that width is packable.
pub fn array_packing(width: u32) -> Option<ArrayPacking> {
    ARRAY_PACKING.iter().copied().find(|p| p.width == width)
}

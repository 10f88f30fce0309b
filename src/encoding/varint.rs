//! # Variable-Length Integer Encoding
//!
//! This module provides the tiered varint used for every length prefix in the
//! wire format (strings, blobs, arrays) and for `varint` schema fields.
//!
//! ## Encoding Format
//!
//! The tier is selected by the top two bits of the first byte:
//!
//! | Value Range               | Bytes | Format                                              |
//! |---------------------------|-------|-----------------------------------------------------|
//! | 0 - 127                   | 1     | `[0vvvvvvv]`                                        |
//! | 128 - 16383               | 2     | `[0x80 \| v&0x3F, (v>>6)&0xFF]`                     |
//! | 16384 - 1073741823        | 4     | `[0xC0 \| v&0x3F, (v>>6)&0xFF, (v>>14) as u16 LE]`  |
//!
//! ## Marker Byte Interpretation
//!
//! ```text
//! 0xxxxxxx: 1-byte encoding, value is the byte itself
//! 10xxxxxx: 2-byte encoding, low 6 bits then 8 more bits
//! 11xxxxxx: 4-byte encoding, low 6 bits, 8 bits, then 16 bits little-endian
//! ```
//!
//! ## Boundary Values
//!
//! - 127: Maximum 1-byte value
//! - 128: Minimum 2-byte value
//! - 16383: Maximum 2-byte value
//! - 16384: Minimum 4-byte value
//! - 1073741823 (2^30 - 1): Maximum encodable value
//!
//! Negative inputs clamp to the 1-byte zero encoding. Values above the maximum
//! are rejected by [`checked_varint`] before any byte is written.
//!
//! ## Usage Example
//!
//! ```rust
//! use packbytes::encoding::varint::{decode_varint, encode_varint, varint_len};
//!
//! let mut buf = [0u8; 4];
//! let written = encode_varint(1000, &mut buf);
//! assert_eq!(written, varint_len(1000));
//!
//! let (value, read) = decode_varint(&buf).unwrap();
//! assert_eq!(value, 1000);
//! assert_eq!(read, 2);
//! ```
//!
//! ## Error Handling
//!
//! `decode_varint` returns `eyre::Result`:
//! - Empty buffer: "empty buffer for varint decode"
//! - Truncated encoding: "truncated N-byte varint"

use eyre::{ensure, Result};

use crate::config::{
    VARINT_1_BYTE_MAX, VARINT_2_BYTE_MAX, VARINT_LOW_MASK, VARINT_MAX, VARINT_TAG_2,
    VARINT_TAG_4,
};
use crate::error::EncodeError;

/// Largest number of bytes a single varint occupies.
pub const MAX_VARINT_LEN: usize = 4;

/// Clamps negatives to zero and rejects values above [`VARINT_MAX`].
pub fn checked_varint(value: i64) -> Result<u32, EncodeError> {
    if value < 0 {
        return Ok(0);
    }
    if value > VARINT_MAX as i64 {
        return Err(EncodeError::VarintOverflow(value as u64));
    }
    Ok(value as u32)
}

pub fn varint_len(value: u32) -> usize {
    if value <= VARINT_1_BYTE_MAX {
        1
    } else if value <= VARINT_2_BYTE_MAX {
        2
    } else {
        4
    }
}

/// Writes `value` into `buf` and returns the number of bytes used.
///
/// `value` must already be within [`VARINT_MAX`] and `buf` must hold at least
/// [`varint_len`] bytes.
pub fn encode_varint(value: u32, buf: &mut [u8]) -> usize {
    debug_assert!(value <= VARINT_MAX);
    let low = (value & VARINT_LOW_MASK as u32) as u8;
    if value <= VARINT_1_BYTE_MAX {
        buf[0] = value as u8;
        1
    } else if value <= VARINT_2_BYTE_MAX {
        buf[0] = VARINT_TAG_2 | low;
        buf[1] = (value >> 6) as u8;
        2
    } else {
        buf[0] = VARINT_TAG_4 | low;
        buf[1] = (value >> 6) as u8;
        buf[2..4].copy_from_slice(&((value >> 14) as u16).to_le_bytes());
        4
    }
}

pub fn decode_varint(buf: &[u8]) -> Result<(u32, usize)> {
    ensure!(!buf.is_empty(), "empty buffer for varint decode");

    let first = buf[0];
    let low = (first & VARINT_LOW_MASK) as u32;

    if first & 0x80 == 0 {
        Ok((first as u32, 1))
    } else if first & 0xC0 == VARINT_TAG_2 {
        ensure!(buf.len() >= 2, "truncated 2-byte varint");
        Ok((low | ((buf[1] as u32) << 6), 2))
    } else {
        ensure!(buf.len() >= 4, "truncated 4-byte varint");
        let high = u16::from_le_bytes([buf[2], buf[3]]) as u32;
        Ok((low | ((buf[1] as u32) << 6) | (high << 14), 4))
    }
}

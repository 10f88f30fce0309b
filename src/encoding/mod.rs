//! # Encoding Module
//!
//! This module provides the primitive wire encodings packbytes builds on:
//!
//! - **Varint encoding**: tiered variable-length integers for length prefixes
//!   and `varint` fields
//! - **Fixed encoding**: little-endian unsigned integers (1/2/4 bytes) and
//!   IEEE-754 floats (2/4/8 bytes)
//! - **Word folding**: several narrow integers sharing one unsigned word
//!
//! All functions work on byte slices; buffer management lives in
//! [`crate::buffer`].

pub mod bitpack;
pub mod fixed;
pub mod varint;

pub use bitpack::{max_value, WordPacker, WordUnpacker};
pub use fixed::{decode_float, decode_uint, encode_float, encode_uint, FloatWidth, UintWidth};
pub use varint::{checked_varint, decode_varint, encode_varint, varint_len, MAX_VARINT_LEN};

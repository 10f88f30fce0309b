//! # Fixed-Width Integer and Float Encoding
//!
//! Every fixed-width value on the wire is little-endian:
//!
//! | Width | Integer | Float |
//! |-------|---------|-------|
//! | 1 byte | `u8` | - |
//! | 2 bytes | `u16` | IEEE-754 half (`half::f16`) |
//! | 4 bytes | `u32` | IEEE-754 single |
//! | 8 bytes | - | IEEE-754 double |
//!
//! Unsigned integers never exceed 32 bits: bit-pack words, presence bitmasks,
//! enumeration indexes and standalone `bits(n)` fields all fit a `u32`.

use eyre::{ensure, Result};
use half::f16;

/// Storage width of an unsigned integer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UintWidth {
    U8,
    U16,
    U32,
}

impl UintWidth {
    /// Smallest width that holds `bits` bits (1 for 0..=8, 2 for ..=16, else 4).
    pub fn for_bits(bits: u32) -> Self {
        if bits <= 8 {
            UintWidth::U8
        } else if bits <= 16 {
            UintWidth::U16
        } else {
            UintWidth::U32
        }
    }

    /// Width for a byte count, rounding 3 up to 4.
    pub fn for_bytes(bytes: usize) -> Self {
        Self::for_bits(bytes as u32 * 8)
    }

    pub fn bytes(self) -> usize {
        match self {
            UintWidth::U8 => 1,
            UintWidth::U16 => 2,
            UintWidth::U32 => 4,
        }
    }

    pub fn bits(self) -> u32 {
        self.bytes() as u32 * 8
    }
}

/// Storage width of a float slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    F16,
    F32,
    F64,
}

impl FloatWidth {
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            16 => Some(FloatWidth::F16),
            32 => Some(FloatWidth::F32),
            64 => Some(FloatWidth::F64),
            _ => None,
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            FloatWidth::F16 => 2,
            FloatWidth::F32 => 4,
            FloatWidth::F64 => 8,
        }
    }

    pub fn bits(self) -> u32 {
        self.bytes() as u32 * 8
    }
}

/// Writes the low `width` bytes of `value`. `out` must hold `width.bytes()`.
pub fn encode_uint(value: u32, width: UintWidth, out: &mut [u8]) {
    let n = width.bytes();
    out[..n].copy_from_slice(&value.to_le_bytes()[..n]);
}

pub fn decode_uint(buf: &[u8], width: UintWidth) -> Result<u32> {
    let n = width.bytes();
    ensure!(
        buf.len() >= n,
        "truncated {}-byte integer: {} bytes remaining",
        n,
        buf.len()
    );
    let mut bytes = [0u8; 4];
    bytes[..n].copy_from_slice(&buf[..n]);
    Ok(u32::from_le_bytes(bytes))
}

/// Writes `value` narrowed to `width`. `out` must hold `width.bytes()`.
pub fn encode_float(value: f64, width: FloatWidth, out: &mut [u8]) {
    match width {
        FloatWidth::F16 => out[..2].copy_from_slice(&f16::from_f64(value).to_le_bytes()),
        FloatWidth::F32 => out[..4].copy_from_slice(&(value as f32).to_le_bytes()),
        FloatWidth::F64 => out[..8].copy_from_slice(&value.to_le_bytes()),
    }
}

pub fn decode_float(buf: &[u8], width: FloatWidth) -> Result<f64> {
    let n = width.bytes();
    ensure!(
        buf.len() >= n,
        "truncated {}-byte float: {} bytes remaining",
        n,
        buf.len()
    );
    Ok(match width {
        FloatWidth::F16 => f16::from_le_bytes([buf[0], buf[1]]).to_f64(),
        FloatWidth::F32 => f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as f64,
        FloatWidth::F64 => {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&buf[..8]);
            f64::from_le_bytes(bytes)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint_width_for_bits_boundaries() {
        assert_eq!(UintWidth::for_bits(1), UintWidth::U8);
        assert_eq!(UintWidth::for_bits(8), UintWidth::U8);
        assert_eq!(UintWidth::for_bits(9), UintWidth::U16);
        assert_eq!(UintWidth::for_bits(16), UintWidth::U16);
        assert_eq!(UintWidth::for_bits(17), UintWidth::U32);
        assert_eq!(UintWidth::for_bits(32), UintWidth::U32);
    }

    #[test]
    fn three_bytes_round_up_to_four() {
        assert_eq!(UintWidth::for_bytes(3), UintWidth::U32);
    }

    #[test]
    fn uint_is_little_endian() {
        let mut out = [0u8; 4];
        encode_uint(0x0102_0304, UintWidth::U32, &mut out);
        assert_eq!(out, [0x04, 0x03, 0x02, 0x01]);

        encode_uint(0xABCD, UintWidth::U16, &mut out);
        assert_eq!(out[..2], [0xCD, 0xAB]);
    }

    #[test]
    fn decode_uint_reads_only_its_width() {
        let buf = [0xFF, 0x01, 0xEE, 0xEE];
        assert_eq!(decode_uint(&buf, UintWidth::U8).unwrap(), 0xFF);
        assert_eq!(decode_uint(&buf, UintWidth::U16).unwrap(), 0x01FF);
    }

    #[test]
    fn decode_uint_rejects_short_buffer() {
        assert!(decode_uint(&[0x01], UintWidth::U16).is_err());
    }

    #[test]
    fn half_float_keeps_representable_values() {
        let mut out = [0u8; 2];
        encode_float(1.5, FloatWidth::F16, &mut out);
        assert_eq!(decode_float(&out, FloatWidth::F16).unwrap(), 1.5);
    }

    #[test]
    fn single_float_is_ieee_little_endian() {
        let mut out = [0u8; 4];
        encode_float(1.0, FloatWidth::F32, &mut out);
        assert_eq!(out, 1.0f32.to_le_bytes());
    }
}

//! # WriteBuffer - Growable Encode Cursor
//!
//! `WriteBuffer` owns the bytes a codec encodes into. It is reset (not
//! reallocated) at the start of every encode, so a steady-state workload runs
//! without allocating. When a write would overflow, the storage is resized to
//! twice the required size.
//!
//! ## Usage
//!
//! ```ignore
//! let mut buf = WriteBuffer::with_capacity(16);
//! buf.write_varint(300);
//! buf.write_uint(7, UintWidth::U8);
//! assert_eq!(buf.as_slice(), &[0xAC, 0x04, 0x07]);
//!
//! buf.reset();
//! assert!(buf.is_empty());
//! ```

use tracing::trace;

use crate::config::BUFFER_GROWTH_FACTOR;
use crate::encoding::{encode_float, encode_uint, encode_varint, FloatWidth, UintWidth, MAX_VARINT_LEN};

#[derive(Debug, Clone)]
pub struct WriteBuffer {
    data: Vec<u8>,
    offset: usize,
}

impl WriteBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity],
            offset: 0,
        }
    }

    /// Rewinds the cursor, keeping the allocated storage.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    pub fn len(&self) -> usize {
        self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.offset == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.offset]
    }

    /// Consumes the buffer, returning only the written bytes.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.data.truncate(self.offset);
        self.data
    }

    fn reserve(&mut self, bytes: usize) {
        let required = self.offset + bytes;
        if required > self.data.len() {
            let new_size = required * BUFFER_GROWTH_FACTOR;
            trace!(from = self.data.len(), to = new_size, "growing write buffer");
            self.data.resize(new_size, 0);
        }
    }

    fn claim(&mut self, bytes: usize) -> &mut [u8] {
        self.reserve(bytes);
        let start = self.offset;
        self.offset += bytes;
        &mut self.data[start..start + bytes]
    }

    pub fn write_uint(&mut self, value: u32, width: UintWidth) {
        encode_uint(value, width, self.claim(width.bytes()));
    }

    pub fn write_float(&mut self, value: f64, width: FloatWidth) {
        encode_float(value, width, self.claim(width.bytes()));
    }

    /// Writes a varint already checked against the tier maximum.
    pub fn write_varint(&mut self, value: u32) {
        self.reserve(MAX_VARINT_LEN);
        let written = encode_varint(value, &mut self.data[self.offset..]);
        self.offset += written;
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.claim(bytes.len()).copy_from_slice(bytes);
    }

    pub fn write_zeros(&mut self, count: usize) {
        self.claim(count).fill(0);
    }
}

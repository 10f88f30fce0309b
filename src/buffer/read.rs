//! # ReadBuffer - Decode Cursor
//!
//! `ReadBuffer` is a forward-only cursor over caller-supplied bytes. It never
//! copies or mutates the input; `read_bytes` and `read_str` hand back slices
//! borrowed from it.
//!
//! Every read checks the remaining length so truncated input surfaces as an
//! error instead of a panic. No other validation happens here.

use eyre::{ensure, Result, WrapErr};

use crate::encoding::{decode_float, decode_uint, decode_varint, FloatWidth, UintWidth};

#[derive(Debug, Clone, Copy)]
pub struct ReadBuffer<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ReadBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn rest(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }

    pub fn read_uint(&mut self, width: UintWidth) -> Result<u32> {
        let value = decode_uint(self.rest(), width)
            .wrap_err_with(|| format!("at offset {}", self.offset))?;
        self.offset += width.bytes();
        Ok(value)
    }

    pub fn read_float(&mut self, width: FloatWidth) -> Result<f64> {
        let value = decode_float(self.rest(), width)
            .wrap_err_with(|| format!("at offset {}", self.offset))?;
        self.offset += width.bytes();
        Ok(value)
    }

    pub fn read_varint(&mut self) -> Result<u32> {
        let (value, read) =
            decode_varint(self.rest()).wrap_err_with(|| format!("at offset {}", self.offset))?;
        self.offset += read;
        Ok(value)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        ensure!(
            len <= self.remaining(),
            "{} bytes requested at offset {} but only {} remain",
            len,
            self.offset,
            self.remaining()
        );
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    pub fn read_str(&mut self, len: usize) -> Result<&'a str> {
        let offset = self.offset;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes).wrap_err_with(|| format!("invalid UTF-8 string at offset {}", offset))
    }
}

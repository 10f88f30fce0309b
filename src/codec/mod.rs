//! # Codecs
//!
//! A [`Codec`] binds a compiled schema to a reusable write buffer. Encoding
//! resets the buffer, walks the schema, and hands back a slice of the bytes
//! just written. Decoding reads caller bytes and never touches the buffer.
//!
//! ## Usage
//!
//! ```ignore
//! let mut codec = packbytes::compile(&Descriptor::object([
//!     ("a", Descriptor::bits(3)),
//!     ("b", Descriptor::Bool),
//!     ("c", Descriptor::string()),
//! ]))?;
//!
//! let bytes = codec.encode(&value)?.to_vec();
//! assert_eq!(codec.decode(&bytes)?, value);
//! ```
//!
//! ## Sharing
//!
//! The slice returned by [`Codec::encode`] borrows the codec, so it cannot
//! outlive the next encode. The [`CompiledSchema`] itself is immutable:
//! several codecs can share one through an `Arc`, and
//! [`CompiledSchema::encode_to_vec`] encodes into a fresh `Vec` without any
//! codec at all.
//!
//! | Entry point | Buffer | Result |
//! |-------------|--------|--------|
//! | `Codec::encode` | reused | `&[u8]` borrowed from the codec |
//! | `CompiledSchema::encode_to_vec` | fresh | owned `Vec<u8>` |
//! | `Codec::decode` / `CompiledSchema::decode` | none | owned `Value` |
//!
//! ## Module Structure
//!
//! - `engine`: node dispatch, primitives, packed values
//! - `object`: word-groups and plain fields
//! - `array`: counted, fixed and dense arrays
//! - `variant`: selectOne and selectMany

mod array;
mod engine;
mod object;
mod variant;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use eyre::Result;
use tracing::trace;

use crate::buffer::WriteBuffer;
use crate::config::DEFAULT_BUFFER_SIZE;
use crate::error::{EncodeError, SchemaError};
use crate::schema::{self, CompiledSchema, Descriptor};
use crate::types::Value;

use engine::{Decoder, Encoder, ROOT};

/// Compiles `descriptor` into a codec with the default buffer size.
pub fn compile(descriptor: &Descriptor) -> Result<Codec, SchemaError> {
    Codec::builder().compile(descriptor)
}

#[derive(Debug)]
pub struct Codec {
    schema: Arc<CompiledSchema>,
    buffer: WriteBuffer,
}

impl Codec {
    pub fn builder() -> CodecBuilder {
        CodecBuilder::default()
    }

    pub fn new(schema: Arc<CompiledSchema>) -> Self {
        Self::builder().build(schema)
    }

    pub fn schema(&self) -> &Arc<CompiledSchema> {
        &self.schema
    }

    /// Encodes `value`, returning the bytes written into the codec's buffer.
    pub fn encode(&mut self, value: &Value) -> Result<&[u8], EncodeError> {
        self.buffer.reset();
        Encoder::new(&self.schema, &mut self.buffer).encode(self.schema.root(), value, ROOT)?;
        Ok(self.buffer.as_slice())
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Value> {
        self.schema.decode(bytes)
    }

    /// Current capacity of the reusable write buffer.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer.capacity()
    }
}

impl CompiledSchema {
    /// Encodes `value` into a freshly allocated vector.
    pub fn encode_to_vec(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let mut buffer = WriteBuffer::with_capacity(64);
        Encoder::new(self, &mut buffer).encode(self.root(), value, ROOT)?;
        Ok(buffer.into_vec())
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Value> {
        let mut decoder = Decoder::new(self, bytes);
        let value = decoder.decode(self.root())?;
        trace!(consumed = decoder.position(), total = bytes.len(), "decoded value");
        Ok(value)
    }
}

/// Runtime configuration for a [`Codec`].
///
/// ```ignore
/// let codec = Codec::builder()
///     .buffer_size(256)
///     .parse(r#"{"id": {"_type": "varint"}}"#)?;
/// ```
#[derive(Debug, Clone)]
pub struct CodecBuilder {
    buffer_size: usize,
}

impl Default for CodecBuilder {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl CodecBuilder {
    /// Initial write buffer size in bytes. The buffer still grows on demand.
    pub fn buffer_size(mut self, bytes: usize) -> Self {
        self.buffer_size = bytes;
        self
    }

    pub fn build(self, schema: Arc<CompiledSchema>) -> Codec {
        Codec {
            schema,
            buffer: WriteBuffer::with_capacity(self.buffer_size),
        }
    }

    pub fn compile(self, descriptor: &Descriptor) -> Result<Codec, SchemaError> {
        let schema = schema::compile(descriptor)?;
        Ok(self.build(Arc::new(schema)))
    }

    /// Parses a JSON descriptor and compiles it.
    pub fn parse(self, json: &str) -> Result<Codec, SchemaError> {
        self.compile(&Descriptor::parse(json)?)
    }
}

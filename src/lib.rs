//! # packbytes - Schema-Driven Compact Binary Serialization
//!
//! packbytes encodes dynamic values against a declarative schema into a dense
//! byte sequence and decodes them back. The schema is compiled once; every
//! encode and decode afterwards walks precomputed layouts:
//!
//! - **Bit-packed fields**: narrow integers, booleans and enum strings of an
//!   object share 8, 16 or 32-bit words
//! - **Tiered varints**: 1, 2 or 4 byte lengths and counters
//! - **Dense arrays**: packable elements folded several per word
//! - **Variants**: tagged unions (`selectOne`) and presence-masked subsets
//!   (`selectMany`)
//!
//! The wire format carries no header, tags or field names. Both sides must
//! agree on the schema.
//!
//! ## Quick Start
//!
//! ```ignore
//! use packbytes::{Descriptor, Value};
//!
//! let mut codec = packbytes::compile(&Descriptor::object([
//!     ("id", Descriptor::bits(12)),
//!     ("admin", Descriptor::Bool),
//!     ("name", Descriptor::string()),
//! ]))?;
//!
//! let value = Value::object([
//!     ("id", 42.into()),
//!     ("admin", true.into()),
//!     ("name", "ada".into()),
//! ]);
//!
//! let bytes = codec.encode(&value)?.to_vec();   // 6 bytes
//! assert_eq!(codec.decode(&bytes)?, value);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Descriptor (Rust or JSON text)    │
//! ├─────────────────────────────────────┤
//! │ Schema Compiler │ Bit-Pack Planner  │
//! ├─────────────────────────────────────┤
//! │   CompiledSchema (node/plan arenas) │
//! ├─────────────────────────────────────┤
//! │  Codec Engine (object/array/variant)│
//! ├─────────────────────────────────────┤
//! │  WriteBuffer / ReadBuffer cursors   │
//! ├─────────────────────────────────────┤
//! │  Primitive encodings (varint/fixed) │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Errors
//!
//! | Stage | Type |
//! |-------|------|
//! | compile | [`SchemaError`] |
//! | encode | [`EncodeError`] |
//! | decode | `eyre::Result` |
//!
//! ## Module Overview
//!
//! - [`schema`]: descriptors, compilation, bit-pack planning
//! - [`codec`]: `Codec`, encode/decode engine
//! - [`types`]: the runtime `Value` tree
//! - [`encoding`]: varint, fixed-width and word-folding primitives
//! - [`buffer`]: write and read cursors
//! - [`config`]: wire format and buffer constants
//! - [`error`]: typed compile and encode errors

pub mod buffer;
pub mod codec;
pub mod config;
pub mod encoding;
pub mod error;
pub mod schema;
pub mod types;

pub use codec::{compile, Codec, CodecBuilder};
pub use error::{EncodeError, SchemaError};
pub use schema::{CompiledSchema, Descriptor};
pub use types::Value;

//! # Error Types
//!
//! packbytes distinguishes two fatal failure taxonomies:
//!
//! | Type | Raised by | Meaning |
//! |------|-----------|---------|
//! | [`SchemaError`] | `compile`, `Descriptor::parse` | The descriptor is invalid, no schema exists |
//! | [`EncodeError`] | `encode` | The value does not fit the compiled schema |
//!
//! Decoding trusts its input and reports only reads past the end of the buffer,
//! invalid UTF-8 and out-of-range variant indexes, through `eyre::Result`.

use thiserror::Error;

/// Errors raised while parsing or compiling a schema descriptor.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// `bits(n)` with `n` outside `1..=32`.
    #[error("bit size must be 1 to 32, got {0}")]
    InvalidBitWidth(u32),

    /// `float(n)` with `n` not in `{16, 32, 64}`.
    #[error("float must be 16, 32, or 64 bits, got {0}")]
    InvalidFloatWidth(u32),

    /// `date(p)` with `p` not in `{32, 64}`.
    #[error("date precision must be 32 or 64 bits, got {0}")]
    InvalidDatePrecision(u32),

    /// selectOne or selectMany declared without variants.
    #[error("{kind} requires at least one variant")]
    EmptyVariants { kind: &'static str },

    /// The same field or variant name appears twice.
    #[error("duplicate field \"{0}\"")]
    DuplicateField(String),

    /// A `_type` tag that names no known node kind.
    #[error("unknown schema type \"{0}\"")]
    UnknownType(String),

    /// Structurally invalid descriptor JSON.
    #[error("malformed schema at {path}: {reason}")]
    Malformed { path: String, reason: String },

    /// The descriptor text is not JSON.
    #[error("schema is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while encoding a value.
#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    /// A packed field's effective value does not fit its bit width.
    #[error("field \"{field}\" with value {value} out of range [0 - {max}]")]
    OutOfRange { field: String, value: i64, max: u64 },

    /// A varint value above 1,073,741,823.
    #[error("varint max 1,073,741,823 exceeded: {0}")]
    VarintOverflow(u64),

    /// The value's shape does not match the node kind.
    #[error("expected {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A fixed-length array received the wrong number of elements.
    #[error("array declared with {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A selectOne/selectMany key that is not a declared variant.
    #[error("unknown variant \"{0}\"")]
    UnknownVariant(String),

    /// A selectOne value without any variant key.
    #[error("selectOne requires exactly one variant, got none")]
    EmptySelection,
}

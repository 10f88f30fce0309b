//! # Buffer Module
//!
//! Cursors the codec engine reads and writes through:
//!
//! - [`WriteBuffer`]: owned, reusable, grows by doubling on overflow
//! - [`ReadBuffer`]: borrowed, fixed-size, bounds-checked
//!
//! ## Ownership
//!
//! A `Codec` owns exactly one `WriteBuffer` and lends out `&[u8]` views of it,
//! so an encoded slice cannot outlive the next `encode` call. `ReadBuffer`
//! borrows the caller's bytes for the duration of one decode.

pub mod read;
pub mod write;

pub use read::ReadBuffer;
pub use write::WriteBuffer;

//! # Types Module
//!
//! Runtime value types shared by the codec engine, the CLI and tests.

pub mod value;

pub use value::Value;

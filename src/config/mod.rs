//! # packbytes Configuration Module
//!
//! This module centralizes all configuration constants for packbytes. Wire
//! format limits (varint tiers, pack word budget, dense array layouts) and the
//! encoder's buffer defaults are grouped here so interdependent values are
//! checked together at compile time.
//!
//! ## Module Organization
//!
//! - [`constants`]: All numeric configuration values with dependency documentation

pub mod constants;
pub use constants::*;

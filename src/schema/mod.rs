//! # Schema Description and Compilation
//!
//! This module turns a caller's declarative record description into the
//! precomputed form every encode and decode call walks.
//!
//! ## Pipeline
//!
//! ```text
//! JSON text ──parse──> Descriptor ──compile──> CompiledSchema
//!                                                ├── nodes: [Node]      (arena, NodeId)
//!                                                └── plans: [PackPlan]  (arena, PlanId)
//! ```
//!
//! ## Compile-Time Work
//!
//! | Step | Result |
//! |------|--------|
//! | Validate widths | `SchemaError` on `bits(0)`, `float(24)`, ... |
//! | Enum strings | `EnumMap` with `""` at index 0 |
//! | Objects | fields with width < 32 planned into 8/16/32-bit words |
//! | Arrays | dense layout when the element width is packable |
//! | Variants | `EnumMap` over variant names, payloads compiled |
//!
//! ## Module Structure
//!
//! - `descriptor`: `Descriptor` tree and its JSON form
//! - `enum_map`: bidirectional name/index tables
//! - `node`: compiled node arena types
//! - `planner`: bit-pack word planning
//! - `compiler`: `compile` and `CompiledSchema`

pub mod compiler;
pub mod descriptor;
pub mod enum_map;
pub mod node;
pub mod planner;


pub use compiler::{compile, CompiledSchema};
pub use descriptor::Descriptor;
pub use enum_map::EnumMap;
pub use node::{Field, Node, NodeId, NodeKind, PlanId};
pub use planner::{PackPlan, PackedField, WordGroup};

//! # Compiled Schema Nodes
//!
//! The compiler lowers a [`Descriptor`](super::Descriptor) into a flat arena of
//! `Node`s addressed by [`NodeId`]. Composite nodes refer to their children by
//! id, and objects refer to their bit-pack layout by [`PlanId`] into a second
//! arena of [`PackPlan`](super::PackPlan)s.
//!
//! ```text
//! nodes: [ bits(3) | bool | string | object{a:#0 slot 0, b:#1 slot 1, c:#2} ]
//! plans: [ u8[#0 #1] ]
//! ```
//!
//! Nodes carry only compile-time facts. Nothing here changes after
//! compilation, so a compiled schema can be shared freely between threads.

use crate::config::ArrayPacking;
use crate::encoding::{FloatWidth, UintWidth};

use super::enum_map::EnumMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlanId(pub(crate) u32);

impl PlanId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named child of an object.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub node: NodeId,
    /// Scratch slot in the object's pack plan; `None` for plain fields.
    pub slot: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Bool,
    Bits { width: UintWidth },
    Float(FloatWidth),
    Varint,
    Text,
    Enum(EnumMap),
    Blob { length: Option<usize> },
    Date(FloatWidth),
    Array {
        element: NodeId,
        length: Option<usize>,
        packing: Option<ArrayPacking>,
    },
    Object {
        fields: Vec<Field>,
        plan: Option<PlanId>,
    },
    SelectOne {
        variants: EnumMap,
        payloads: Vec<NodeId>,
    },
    SelectMany {
        variants: EnumMap,
        payloads: Vec<NodeId>,
    },
    Null,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Bit width for integer-like nodes (bool, bits, enum strings).
    pub bits: Option<u32>,
    /// Fewest bytes any value of this node occupies on the wire. Zero for
    /// `null`, empty objects and the like, which decode without reading.
    pub min_len: usize,
}

impl Node {
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Bool => "bool",
            NodeKind::Bits { .. } => "bits",
            NodeKind::Float(_) => "float",
            NodeKind::Varint => "varint",
            NodeKind::Text | NodeKind::Enum(_) => "string",
            NodeKind::Blob { .. } => "blob",
            NodeKind::Date(_) => "date",
            NodeKind::Array { .. } => "array",
            NodeKind::Object { .. } => "object",
            NodeKind::SelectOne { .. } => "selectOne",
            NodeKind::SelectMany { .. } => "selectMany",
            NodeKind::Null => "null",
        }
    }

    /// Whether an object packs this node into a shared word.
    pub fn is_packable(&self) -> bool {
        self.bits.is_some_and(|bits| bits < crate::config::PACK_WORD_BITS)
    }
}

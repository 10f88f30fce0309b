//! # Schema Compiler
//!
//! Lowers a [`Descriptor`] into a [`CompiledSchema`] once, so that every
//! encode and decode afterwards is a plain walk over precomputed facts:
//!
//! - parameter validation (`bits` 1..=32, `float` 16/32/64, `date` 32/64)
//! - standalone storage widths
//! - enumeration maps for enum strings and variant tables
//! - dense array layouts for packable element widths
//! - one bit-pack plan per object with narrow fields
//!
//! Validation errors abort compilation; no partially compiled schema is ever
//! returned.

use std::fmt;

use hashbrown::HashSet;
use tracing::debug;

use crate::config::{array_packing, MAX_BIT_WIDTH, SELECT_MANY_CHUNK};
use crate::encoding::{FloatWidth, UintWidth};
use crate::error::SchemaError;

use super::descriptor::Descriptor;
use super::enum_map::EnumMap;
use super::node::{Field, Node, NodeId, NodeKind, PlanId};
use super::planner::{self, PackPlan, PackedField};

/// An immutable, validated schema ready for encoding and decoding.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    nodes: Vec<Node>,
    plans: Vec<PackPlan>,
    root: NodeId,
}

impl CompiledSchema {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn plan(&self, id: PlanId) -> &PackPlan {
        &self.plans[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn plan_count(&self) -> usize {
        self.plans.len()
    }
}

/// Compiles `descriptor` into a [`CompiledSchema`].
pub fn compile(descriptor: &Descriptor) -> Result<CompiledSchema, SchemaError> {
    let mut compiler = Compiler::default();
    let root = compiler.node(descriptor)?;
    debug!(
        nodes = compiler.nodes.len(),
        plans = compiler.plans.len(),
        root = descriptor.type_name(),
        "compiled schema"
    );
    Ok(CompiledSchema {
        nodes: compiler.nodes,
        plans: compiler.plans,
        root,
    })
}

#[derive(Default)]
struct Compiler {
    nodes: Vec<Node>,
    plans: Vec<PackPlan>,
}

impl Compiler {
    fn push(&mut self, kind: NodeKind, bits: Option<u32>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let min_len = self.min_len(&kind);
        self.nodes.push(Node { kind, bits, min_len });
        id
    }

    /// Smallest encoding of `kind`, from children that are already compiled.
    fn min_len(&self, kind: &NodeKind) -> usize {
        let child = |id: &NodeId| self.nodes[id.index()].min_len;
        match kind {
            NodeKind::Bool => 1,
            NodeKind::Bits { width } => width.bytes(),
            NodeKind::Enum(map) => map.width().bytes(),
            NodeKind::Float(width) | NodeKind::Date(width) => width.bytes(),
            NodeKind::Varint | NodeKind::Text => 1,
            NodeKind::Blob { length: Some(n) } => *n,
            NodeKind::Blob { length: None } => 1,
            NodeKind::Array { length: None, .. } => 1,
            NodeKind::Array {
                element,
                length: Some(n),
                packing,
            } => match packing {
                Some(p) => n.div_ceil(p.per_word).saturating_mul(p.word_bytes),
                None => n.saturating_mul(child(element)),
            },
            NodeKind::Object { fields, plan } => {
                let words = plan.map_or(0, |id| self.plans[id.index()].byte_len());
                fields
                    .iter()
                    .filter(|field| field.slot.is_none())
                    .fold(words, |total, field| total.saturating_add(child(&field.node)))
            }
            NodeKind::SelectOne { variants, payloads } => {
                variants.width().bytes() + payloads.iter().map(child).min().unwrap_or(0)
            }
            NodeKind::SelectMany { variants, .. } => variants
                .keys()
                .chunks(SELECT_MANY_CHUNK)
                .map(|chunk| UintWidth::for_bytes(chunk.len().div_ceil(8)).bytes())
                .sum(),
            NodeKind::Null => 0,
        }
    }

    fn node(&mut self, descriptor: &Descriptor) -> Result<NodeId, SchemaError> {
        Ok(match descriptor {
            Descriptor::Bool => self.push(NodeKind::Bool, Some(1)),
            Descriptor::Bits(n) => {
                if !(1..=MAX_BIT_WIDTH).contains(n) {
                    return Err(SchemaError::InvalidBitWidth(*n));
                }
                self.push(
                    NodeKind::Bits {
                        width: UintWidth::for_bits(*n),
                    },
                    Some(*n),
                )
            }
            Descriptor::Float(n) => {
                let width = FloatWidth::from_bits(*n).ok_or(SchemaError::InvalidFloatWidth(*n))?;
                self.push(NodeKind::Float(width), None)
            }
            Descriptor::Varint => self.push(NodeKind::Varint, None),
            Descriptor::String(None) => self.push(NodeKind::Text, None),
            Descriptor::String(Some(values)) => {
                let map = EnumMap::for_strings(values);
                let bits = map.bits();
                self.push(NodeKind::Enum(map), Some(bits))
            }
            Descriptor::Blob(length) => self.push(NodeKind::Blob { length: *length }, None),
            Descriptor::Date(precision) => {
                let width = match precision {
                    Some(32) => FloatWidth::F32,
                    None | Some(64) => FloatWidth::F64,
                    Some(p) => return Err(SchemaError::InvalidDatePrecision(*p)),
                };
                self.push(NodeKind::Date(width), None)
            }
            Descriptor::Array { element, length } => {
                let element = self.node(element)?;
                let packing = self.nodes[element.index()].bits.and_then(array_packing);
                self.push(
                    NodeKind::Array {
                        element,
                        length: *length,
                        packing,
                    },
                    None,
                )
            }
            Descriptor::Object(fields) => self.object(fields)?,
            Descriptor::SelectOne(variants) => {
                let (variants, payloads) = self.variants("selectOne", variants)?;
                self.push(NodeKind::SelectOne { variants, payloads }, None)
            }
            Descriptor::SelectMany(variants) => {
                let (variants, payloads) = self.variants("selectMany", variants)?;
                self.push(NodeKind::SelectMany { variants, payloads }, None)
            }
            Descriptor::Null => self.push(NodeKind::Null, None),
        })
    }

    fn object(&mut self, fields: &[(String, Descriptor)]) -> Result<NodeId, SchemaError> {
        let mut seen = HashSet::with_capacity(fields.len());
        let mut compiled = Vec::with_capacity(fields.len());
        let mut packed = Vec::new();

        for (name, descriptor) in fields {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::DuplicateField(name.clone()));
            }
            let node = self.node(descriptor)?;
            let child = &self.nodes[node.index()];
            let slot = match child.bits {
                Some(bits) if child.is_packable() => {
                    let slot = packed.len();
                    packed.push(PackedField { slot, bits });
                    Some(slot)
                }
                _ => None,
            };
            compiled.push(Field {
                name: name.clone(),
                node,
                slot,
            });
        }

        let plan = if packed.is_empty() {
            None
        } else {
            let id = PlanId(self.plans.len() as u32);
            self.plans.push(planner::plan(&packed));
            Some(id)
        };

        Ok(self.push(
            NodeKind::Object {
                fields: compiled,
                plan,
            },
            None,
        ))
    }

    fn variants(
        &mut self,
        kind: &'static str,
        variants: &[(String, Descriptor)],
    ) -> Result<(EnumMap, Vec<NodeId>), SchemaError> {
        if variants.is_empty() {
            return Err(SchemaError::EmptyVariants { kind });
        }
        let names: Vec<&str> = variants.iter().map(|(name, _)| name.as_str()).collect();
        let map = EnumMap::for_variants(&names)?;
        let payloads = variants
            .iter()
            .map(|(_, descriptor)| self.node(descriptor))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((map, payloads))
    }
}

impl fmt::Display for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root, 0)
    }
}

impl CompiledSchema {
    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let node = self.node(id);
        match &node.kind {
            NodeKind::Bool => write!(f, "bool"),
            NodeKind::Bits { width } => {
                write!(f, "bits({}) u{}", node.bits.unwrap_or_default(), width.bits())
            }
            NodeKind::Float(width) => write!(f, "float({})", width.bits()),
            NodeKind::Varint => write!(f, "varint"),
            NodeKind::Text => write!(f, "string"),
            NodeKind::Enum(map) => write!(f, "string[{}] {} bits", map.len(), map.bits()),
            NodeKind::Blob { length: Some(n) } => write!(f, "blob({n})"),
            NodeKind::Blob { length: None } => write!(f, "blob"),
            NodeKind::Date(width) => write!(f, "date({})", width.bits()),
            NodeKind::Null => write!(f, "null"),
            NodeKind::Array {
                element,
                length,
                packing,
            } => {
                write!(f, "array")?;
                if let Some(n) = length {
                    write!(f, "[{n}]")?;
                }
                if let Some(p) = packing {
                    write!(f, " packed {}x{} in u{}", p.per_word, p.width, p.word_bytes * 8)?;
                }
                write!(f, " of ")?;
                self.fmt_node(f, *element, depth)
            }
            NodeKind::Object { fields, plan } => {
                write!(f, "object")?;
                let indent = "  ".repeat(depth + 1);
                if let Some(plan) = plan {
                    for group in &self.plan(*plan).groups {
                        write!(f, "\n{indent}word u{}:", group.width.bits())?;
                        for member in &group.members {
                            let name = fields
                                .iter()
                                .find(|field| field.slot == Some(member.slot))
                                .map_or("?", |field| field.name.as_str());
                            write!(f, " {name}:{}", member.bits)?;
                        }
                    }
                }
                for field in fields.iter().filter(|field| field.slot.is_none()) {
                    write!(f, "\n{indent}{}: ", field.name)?;
                    self.fmt_node(f, field.node, depth + 1)?;
                }
                Ok(())
            }
            NodeKind::SelectOne { variants, payloads } | NodeKind::SelectMany { variants, payloads } => {
                write!(f, "{} ({} variants)", node.type_name(), variants.len())?;
                let indent = "  ".repeat(depth + 1);
                for (name, payload) in variants.keys().iter().zip(payloads) {
                    write!(f, "\n{indent}{name}: ")?;
                    self.fmt_node(f, *payload, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

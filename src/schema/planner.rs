//! # Bit-Pack Planner
//!
//! Assigns an object's narrow fields (bit width 1..=31) to shared 8, 16 and
//! 32-bit words at compile time, aiming for the fewest storage words while
//! keeping every field exactly recoverable.
//!
//! ## Algorithm
//!
//! ```text
//! sort fields by width, widest first (stable)
//! while fields remain:
//!     budget = 32
//!     first-fit scan: admit every field that still fits, stop at budget 0
//!     leftover  0..=7   -> one 32-bit word
//!     leftover  8..=15  -> re-split first-fit into 16 + 8 bits, else 32-bit word
//!     leftover 16..=23  -> one 16-bit word
//!     leftover 24..=31  -> one 8-bit word
//! ```
//!
//! ## Output Order
//!
//! Groups are emitted 8-bit first, then 16-bit, then 32-bit, each in creation
//! order. Members keep admission order, which is also the fold order (most
//! significant first) used by the codec.
//!
//! ## Example
//!
//! ```text
//! a: bits(3), b: bool, c: bits(12), d: bits(12), e: bits(9)
//! sorted: c12 d12 e9 a3 b1
//! scan 1: c d a b (28 bits, leftover 4)   -> u32 [c d a b]
//! scan 2: e       (9 bits, leftover 23)   -> u16 [e]
//! ```

use smallvec::SmallVec;
use tracing::trace;

use crate::config::PACK_WORD_BITS;
use crate::encoding::UintWidth;

/// One packed field: its scratch slot and bit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedField {
    pub slot: usize,
    pub bits: u32,
}

pub type Members = SmallVec<[PackedField; 8]>;

/// Fields sharing one storage word, in admission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordGroup {
    pub width: UintWidth,
    pub members: Members,
}

impl WordGroup {
    pub fn used_bits(&self) -> u32 {
        self.members.iter().map(|m| m.bits).sum()
    }
}

/// The packing layout of one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackPlan {
    pub groups: Vec<WordGroup>,
    pub slots: usize,
}

impl PackPlan {
    /// Total bytes the plan's words occupy on the wire.
    pub fn byte_len(&self) -> usize {
        self.groups.iter().map(|g| g.width.bytes()).sum()
    }
}

/// Plans the words for `fields`, given in declaration order.
pub fn plan(fields: &[PackedField]) -> PackPlan {
    let mut pending: Vec<PackedField> = fields.to_vec();
    pending.sort_by(|a, b| b.bits.cmp(&a.bits));

    let mut words8: Vec<Members> = Vec::new();
    let mut words16: Vec<Members> = Vec::new();
    let mut words32: Vec<Members> = Vec::new();

    while !pending.is_empty() {
        let mut admitted = Members::new();
        let mut remaining = PACK_WORD_BITS;
        let mut i = 0;
        while i < pending.len() {
            if pending[i].bits <= remaining {
                remaining -= pending[i].bits;
                admitted.push(pending.remove(i));
                if remaining == 0 {
                    break;
                }
            } else {
                i += 1;
            }
        }

        match remaining {
            0..=7 => words32.push(admitted),
            8..=15 => match split_16_8(&admitted) {
                Some((high, low)) => {
                    words16.push(high);
                    words8.push(low);
                }
                None => words32.push(admitted),
            },
            16..=23 => words16.push(admitted),
            _ => words8.push(admitted),
        }
    }

    let groups: Vec<WordGroup> = words8
        .into_iter()
        .map(|members| WordGroup { width: UintWidth::U8, members })
        .chain(words16.into_iter().map(|members| WordGroup { width: UintWidth::U16, members }))
        .chain(words32.into_iter().map(|members| WordGroup { width: UintWidth::U32, members }))
        .collect();

    for group in &groups {
        trace!(
            width = group.width.bits(),
            used = group.used_bits(),
            fields = group.members.len(),
            "planned word group"
        );
    }

    PackPlan {
        groups,
        slots: fields.len(),
    }
}

/// First-fit re-split of one admitted set into a 16-bit and an 8-bit word.
fn split_16_8(admitted: &[PackedField]) -> Option<(Members, Members)> {
    let mut high = Members::new();
    let mut low = Members::new();
    let mut remaining16 = 16;
    let mut remaining8 = 8;
    for field in admitted {
        if field.bits <= remaining16 {
            remaining16 -= field.bits;
            high.push(*field);
        } else if field.bits <= remaining8 {
            remaining8 -= field.bits;
            low.push(*field);
        } else {
            return None;
        }
    }
    Some((high, low))
}

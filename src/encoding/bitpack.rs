//! # Word Folding
//!
//! Several narrow values share one unsigned word by folding them in
//! most-significant first:
//!
//! ```text
//! push(5, 3); push(1, 1)   =>   acc = ((0 << 3) | 5) << 1 | 1 = 0b1011
//! ```
//!
//! Unfolding walks the same values in reverse, taking the low `bits` bits and
//! shifting them off. Object word-groups and dense arrays both use this.

/// Largest value representable in `bits` bits.
pub fn max_value(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WordPacker {
    acc: u64,
}

impl WordPacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` below the previously pushed values. `value` must fit in `bits`.
    pub fn push(&mut self, value: u32, bits: u32) {
        debug_assert!(value as u64 <= max_value(bits));
        self.acc = (self.acc << bits) | value as u64;
    }

    pub fn finish(self) -> u32 {
        self.acc as u32
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WordUnpacker {
    acc: u64,
}

impl WordUnpacker {
    pub fn new(word: u32) -> Self {
        Self { acc: word as u64 }
    }

    /// Removes the most recently pushed value of width `bits`.
    pub fn pop(&mut self, bits: u32) -> u32 {
        let value = self.acc % (1u64 << bits);
        self.acc >>= bits;
        value as u32
    }
}

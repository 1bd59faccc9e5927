//! Block and Set index types.
//!
//! This module defines strong types for cache slot and cache set indices so the
//! two numbering spaces cannot be mixed by accident. It provides the following:
//! 1. **Type Safety:** Distinguishes a slot number from a set number at compile time.
//! 2. **Set Arithmetic:** Maps a slot to its owning set for a given associativity.
//! 3. **Cursor Stepping:** Backward stepping with wraparound inside one set.

use std::fmt;

/// Index of a single cache slot (block) in the cache.
///
/// Slots are numbered contiguously across the whole cache; slot `i` belongs to set
/// `i / assoc`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockIndex(pub u64);

/// Index of an associative set in the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SetIndex(pub u64);

impl BlockIndex {
    /// Creates a new block index from a raw slot number.
    ///
    /// # Arguments
    ///
    /// * `index` - The raw slot number.
    #[inline(always)]
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// Returns the raw slot number.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }

    /// Returns the set this slot belongs to.
    ///
    /// # Arguments
    ///
    /// * `assoc` - Number of slots per set. Must be non-zero.
    #[inline(always)]
    pub const fn set(self, assoc: u64) -> SetIndex {
        SetIndex(self.0 / assoc)
    }

    /// Steps one slot backward within `[start, end)`, wrapping to `end - 1` when
    /// the step would fall below `start`.
    #[inline(always)]
    pub(crate) const fn step_back(self, start: Self, end: Self) -> Self {
        if self.0 <= start.0 {
            Self(end.0 - 1)
        } else {
            Self(self.0 - 1)
        }
    }
}

impl SetIndex {
    /// Creates a new set index from a raw set number.
    #[inline(always)]
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// Returns the raw set number.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }

    /// Returns the first slot of this set.
    ///
    /// # Arguments
    ///
    /// * `assoc` - Number of slots per set.
    #[inline(always)]
    pub const fn start(self, assoc: u64) -> BlockIndex {
        BlockIndex(self.0 * assoc)
    }

    /// Returns the slot one past the last slot of this set.
    #[inline(always)]
    pub const fn end(self, assoc: u64) -> BlockIndex {
        BlockIndex(self.0 * assoc + assoc)
    }
}

impl fmt::Display for BlockIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SetIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Cache geometry.
//!
//! The engine decides how many blocks a cache has and how they are grouped into
//! sets. Policies receive a validated copy of those parameters when they are
//! bound to an attachment.

use crate::common::{BlockIndex, PolicyError, Result, SetIndex};

/// Validated size and set layout of one cache attachment.
///
/// `assoc` is always a power of two and `consecutive_shift == log2(assoc)`, so the
/// set count computed with a shift (`size >> consecutive_shift`) and the set of a
/// block computed with a division (`index / assoc`) always agree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheGeometry {
    size: u64,
    assoc: u64,
    consecutive_shift: u32,
}

impl CacheGeometry {
    /// Validates and creates a geometry.
    ///
    /// # Arguments
    ///
    /// * `size` - Total number of cache blocks.
    /// * `assoc` - Number of blocks per set.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidGeometry`] if `assoc` is not a non-zero power
    /// of two, or `size` is zero or not a multiple of `assoc`.
    pub fn new(size: u64, assoc: u64) -> Result<Self> {
        if assoc == 0 || !assoc.is_power_of_two() {
            return Err(PolicyError::InvalidGeometry(format!(
                "associativity {assoc} is not a non-zero power of two"
            )));
        }
        if size == 0 || size % assoc != 0 {
            return Err(PolicyError::InvalidGeometry(format!(
                "cache size {size} is not a non-zero multiple of associativity {assoc}"
            )));
        }
        let consecutive_shift = assoc.trailing_zeros();
        if usize::try_from(size >> consecutive_shift).is_err() {
            return Err(PolicyError::InvalidGeometry(format!(
                "cache size {size} has more sets than this host can address"
            )));
        }
        Ok(Self {
            size,
            assoc,
            consecutive_shift,
        })
    }

    /// Total number of cache blocks.
    #[inline(always)]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Number of blocks per set.
    #[inline(always)]
    pub const fn assoc(&self) -> u64 {
        self.assoc
    }

    /// Shift that converts a block count into a set count.
    #[inline(always)]
    pub const fn consecutive_shift(&self) -> u32 {
        self.consecutive_shift
    }

    /// Number of sets in the cache.
    #[inline(always)]
    pub const fn num_sets(&self) -> u64 {
        self.size >> self.consecutive_shift
    }

    /// Returns the set owning `index`.
    #[inline(always)]
    pub const fn set_of(&self, index: BlockIndex) -> SetIndex {
        index.set(self.assoc)
    }

    /// Returns the first block of `set`.
    #[inline(always)]
    pub const fn set_start(&self, set: SetIndex) -> BlockIndex {
        set.start(self.assoc)
    }

    /// Returns one past the last block of `set`.
    #[inline(always)]
    pub const fn set_end(&self, set: SetIndex) -> BlockIndex {
        set.end(self.assoc)
    }
}

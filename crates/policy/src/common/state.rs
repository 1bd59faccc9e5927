//! Per-block cache state flags.
//!
//! Block state is owned by the cache engine and stored however the engine likes.
//! Replacement policies only read it and flip individual bits, so the flags are
//! modelled as a small `Copy` bitmask with named constants.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Bitmask of cache block state flags.
///
/// `INVALID` is the empty mask. The remaining flags combine freely, e.g. a
/// block being written back is `VALID | DIRTY | DISKWRITEINPROG`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockState(u16);

impl BlockState {
    /// Slot holds no data.
    pub const INVALID: Self = Self(0);
    /// Slot holds data consistent with the engine's mapping.
    pub const VALID: Self = Self(0x01);
    /// Slot data has not been written back to the source device.
    pub const DIRTY: Self = Self(0x02);
    /// A read or fill is in flight on this slot.
    pub const BLOCK_IO_INPROG: Self = Self(0x04);
    /// A write-back to the source device has been requested for this slot.
    pub const DISKWRITEINPROG: Self = Self(0x08);

    /// Creates a state from raw bits.
    #[inline(always)]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[inline(always)]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Returns `true` if every bit of `flag` is set.
    #[inline(always)]
    pub const fn contains(self, flag: Self) -> bool {
        self.0 & flag.0 == flag.0
    }

    /// Returns `true` if any bit of `flag` is set.
    #[inline(always)]
    pub const fn intersects(self, flag: Self) -> bool {
        self.0 & flag.0 != 0
    }

    /// Returns `true` if the block is dirty and no block I/O is pending on it,
    /// which makes it eligible for a write-back request.
    #[inline(always)]
    pub const fn is_cleanable(self) -> bool {
        self.0 & (Self::DIRTY.0 | Self::BLOCK_IO_INPROG.0) == Self::DIRTY.0
    }

    /// Returns a copy with the bits of `flag` set.
    #[inline(always)]
    #[must_use]
    pub const fn with(self, flag: Self) -> Self {
        Self(self.0 | flag.0)
    }

    /// Returns a copy with the bits of `flag` cleared.
    #[inline(always)]
    #[must_use]
    pub const fn without(self, flag: Self) -> Self {
        Self(self.0 & !flag.0)
    }
}

impl BitOr for BlockState {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for BlockState {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for BlockState {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            return write!(f, "INVALID");
        }
        let names = [
            (Self::VALID, "VALID"),
            (Self::DIRTY, "DIRTY"),
            (Self::BLOCK_IO_INPROG, "BLOCK_IO_INPROG"),
            (Self::DISKWRITEINPROG, "DISKWRITEINPROG"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        Ok(())
    }
}

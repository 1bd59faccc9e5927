//! Allocator implementations.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::warn;

use super::traits::Allocator;
use crate::common::{PolicyError, Result};

/// Admits every request; the heap reservation made by the policy is the only
/// point of failure.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAllocator;

impl Allocator for SystemAllocator {
    fn allocate(&self, _bytes: usize) -> Result<()> {
        Ok(())
    }
}

/// Allocator with a fixed byte budget shared by every attachment drawing on it.
///
/// Granted bytes are not returned to the budget; engines size it for the
/// lifetime of the attachments they create.
#[derive(Debug)]
pub struct BoundedAllocator {
    limit: usize,
    used: AtomicUsize,
}

impl BoundedAllocator {
    /// Creates an allocator that grants at most `limit` bytes in total.
    pub const fn new(limit: usize) -> Self {
        Self {
            limit,
            used: AtomicUsize::new(0),
        }
    }

    /// Bytes granted so far.
    pub fn used(&self) -> usize {
        self.used.load(Ordering::Acquire)
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.used())
    }
}

impl Allocator for BoundedAllocator {
    fn allocate(&self, bytes: usize) -> Result<()> {
        let granted = self
            .used
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                used.checked_add(bytes).filter(|&total| total <= self.limit)
            });
        if granted.is_err() {
            warn!(bytes, limit = self.limit, "set state allocation refused");
            return Err(PolicyError::OutOfMemory { bytes });
        }
        Ok(())
    }
}

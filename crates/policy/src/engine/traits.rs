//! Capabilities a cache engine lends to its replacement policy.
//!
//! This module defines the traits through which a policy touches engine-owned
//! resources. It provides:
//! 1. **Block State:** Reading a block's flags and flipping individual bits.
//! 2. **Allocation:** Admitting or refusing the policy's per-set memory.
//!
//! Policies never hold on to these: the engine passes them in on every call and
//! keeps whatever synchronization it already has around the call.

use crate::common::{BlockIndex, BlockState, Result};

/// Engine-owned table of per-block state flags.
pub trait BlockStates {
    /// Returns the current flags of `index`.
    fn get(&self, index: BlockIndex) -> BlockState;
    /// Sets the bits of `flag` on `index`, leaving other bits untouched.
    fn set_flag(&mut self, index: BlockIndex, flag: BlockState);
    /// Clears the bits of `flag` on `index`, leaving other bits untouched.
    fn clear_flag(&mut self, index: BlockIndex, flag: BlockState);
}

/// Memory source for policy set state.
///
/// Called once per attachment, before the policy builds its set table. A refusal
/// aborts the attachment.
pub trait Allocator: Send + Sync {
    /// Admits a request for `bytes` of set state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::common::PolicyError::OutOfMemory`] when the request cannot
    /// be satisfied.
    fn allocate(&self, bytes: usize) -> Result<()>;
}

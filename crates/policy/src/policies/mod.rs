//! Cache Replacement Policies.
//!
//! Implements the interchangeable policy interface used by a set-associative
//! block cache to choose eviction victims and to order write-back scans.
//!
//! # Policies
//!
//! - `Lifo`: Last-In, First-Out with a per-set backward cursor.
//!
//! Other variants (`LRU`, `FIFO`) plug into the same trait and are looked up by
//! name through [`crate::registry::PolicyRegistry`].

/// Last-In, First-Out replacement policy.
pub mod lifo;

use std::fmt;

pub use lifo::{LifoPolicy, LifoSetState};

use crate::common::{BlockIndex, Result, SetIndex};
use crate::config::PolicyKind;
use crate::engine::{Allocator, BlockStates, CacheGeometry};

/// Trait for block cache replacement policies.
///
/// A policy instance serves exactly one cache attachment. The engine drives it
/// through the following sequence:
///
/// 1. [`init`](CachePolicy::init) binds the attachment's geometry.
/// 2. [`sets_init`](CachePolicy::sets_init) allocates per-set state.
/// 3. [`blk_init`](CachePolicy::blk_init) sets up per-block state, if any.
/// 4. [`find_reclaim`](CachePolicy::find_reclaim) and
///    [`clean_set`](CachePolicy::clean_set) run for the life of the attachment.
/// 5. [`exit`](CachePolicy::exit) releases the instance's hold on its registry
///    entry.
///
/// Policies take no locks. The engine must serialize calls touching the same set.
pub trait CachePolicy: fmt::Debug + Send + Sync {
    /// Returns the registry name of this policy.
    fn name(&self) -> PolicyKind;

    /// Binds the instance to a cache attachment.
    ///
    /// # Arguments
    ///
    /// * `geometry` - The attachment's validated layout.
    ///
    /// # Errors
    ///
    /// Policy specific; LIFO never fails here.
    fn init(&mut self, geometry: CacheGeometry) -> Result<()>;

    /// Releases the instance's reference on its registry entry.
    ///
    /// Calling it more than once has no further effect.
    fn exit(&mut self);

    /// Allocates and initializes per-set state for the bound geometry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::common::PolicyError::OutOfMemory`] if the set table cannot
    /// be allocated and [`crate::common::PolicyError::NotAttached`] if `init` has
    /// not run.
    fn sets_init(&mut self, alloc: &dyn Allocator) -> Result<()>;

    /// Initializes per-block state.
    ///
    /// # Errors
    ///
    /// Policy specific; LIFO never fails here.
    fn blk_init(&mut self) -> Result<()>;

    /// Selects a `VALID` block in the set starting at `start` to evict.
    ///
    /// Returns `Ok(None)` when the set has no `VALID` block.
    ///
    /// # Errors
    ///
    /// Returns [`crate::common::PolicyError::NotAttached`] before set state exists
    /// and [`crate::common::PolicyError::SetOutOfRange`] for a set beyond the cache.
    ///
    /// # Panics
    ///
    /// Panics if `start` is not the first block of its set.
    fn find_reclaim(
        &mut self,
        states: &dyn BlockStates,
        start: BlockIndex,
    ) -> Result<Option<BlockIndex>>;

    /// Requests write-back of up to `to_clean` dirty blocks of `set`.
    ///
    /// Returns the number of blocks flagged `DISKWRITEINPROG`.
    ///
    /// # Errors
    ///
    /// Same as [`find_reclaim`](CachePolicy::find_reclaim).
    fn clean_set(
        &mut self,
        states: &mut dyn BlockStates,
        set: SetIndex,
        to_clean: usize,
    ) -> Result<usize>;
}

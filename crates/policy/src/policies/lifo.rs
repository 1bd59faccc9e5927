//! Last-In, First-Out (LIFO) Replacement Policy.
//!
//! Each set keeps two cursors. The eviction cursor walks backward through the set
//! and picks the first `VALID` block it meets, so the slot filled most recently
//! (the one the cursor just stepped over) is the next to go. The clean cursor
//! walks backward independently and flags dirty blocks for write-back, resuming
//! where the previous pass stopped so every block in the set is visited once
//! before any is visited twice.
//!
//! Both walks wrap from the first slot of the set to its last slot and never leave
//! the set.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `find_reclaim()`: O(A) where A is the associativity
//!   - `clean_set()`: O(A)
//! - **Space Complexity:** O(S) where S is the number of sets
//! - **Per-block state:** None

use std::mem;

use tracing::{debug, error, info, trace, warn};

use super::CachePolicy;
use crate::common::{BlockIndex, BlockState, PolicyError, Result, SetIndex};
use crate::config::PolicyKind;
use crate::engine::{Allocator, BlockStates, CacheGeometry};
use crate::registry::{ModuleRef, PolicyDescriptor, PolicyRegistry};

/// Registry entry for the LIFO policy.
pub const DESCRIPTOR: PolicyDescriptor = PolicyDescriptor {
    name: PolicyKind::Lifo,
    instance_init,
};

/// Cursor pair kept for every set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifoSetState {
    /// Where the next victim search starts.
    pub eviction_cursor: BlockIndex,
    /// Where the next cleaning pass starts.
    pub clean_cursor: BlockIndex,
}

impl LifoSetState {
    /// Creates the state of a set whose first block is `start`.
    pub const fn new(start: BlockIndex) -> Self {
        Self {
            eviction_cursor: start,
            clean_cursor: start,
        }
    }
}

/// LIFO policy state for one cache attachment.
#[derive(Debug, Default)]
pub struct LifoPolicy {
    geometry: Option<CacheGeometry>,
    sets: Option<Vec<LifoSetState>>,
    module: Option<ModuleRef>,
}

impl LifoPolicy {
    /// Creates an unbound instance that holds no registry reference.
    pub const fn new() -> Self {
        Self {
            geometry: None,
            sets: None,
            module: None,
        }
    }

    /// Creates an unbound instance holding `module` until [`CachePolicy::exit`].
    pub const fn with_module(module: ModuleRef) -> Self {
        Self {
            geometry: None,
            sets: None,
            module: Some(module),
        }
    }

    /// Returns the per-set cursors, once [`CachePolicy::sets_init`] has run.
    pub fn sets(&self) -> Option<&[LifoSetState]> {
        self.sets.as_deref()
    }

    /// Returns the cursors of one set.
    pub fn set_state(&self, set: SetIndex) -> Option<&LifoSetState> {
        self.sets.as_ref()?.get(set.val() as usize)
    }

    /// Returns `true` while the instance holds its registry reference.
    pub const fn holds_module(&self) -> bool {
        self.module.is_some()
    }

    /// Looks up the geometry and the mutable state of `set`.
    fn bound_set(&mut self, set: SetIndex) -> Result<(CacheGeometry, &mut LifoSetState)> {
        let geometry = self.geometry.ok_or(PolicyError::NotAttached)?;
        let sets = self.sets.as_mut().ok_or(PolicyError::NotAttached)?;
        let state = sets
            .get_mut(set.val() as usize)
            .ok_or(PolicyError::SetOutOfRange {
                set: set.val(),
                num_sets: geometry.num_sets(),
            })?;
        Ok((geometry, state))
    }
}

/// Aborts on a scan position outside `[start, end)`.
///
/// Such a position can only come from corrupted cursor state or a caller that
/// skipped the policy's preconditions; continuing would touch another set.
#[inline(always)]
fn assert_in_set(what: &str, index: BlockIndex, start: BlockIndex, end: BlockIndex) {
    if index < start || index >= end {
        error!(%index, %start, %end, "{what} escaped its set");
        panic!("{what} {index} outside set range [{start}, {end})");
    }
}

impl CachePolicy for LifoPolicy {
    fn name(&self) -> PolicyKind {
        PolicyKind::Lifo
    }

    fn init(&mut self, geometry: CacheGeometry) -> Result<()> {
        self.geometry = Some(geometry);
        Ok(())
    }

    fn exit(&mut self) {
        drop(self.module.take());
    }

    fn sets_init(&mut self, alloc: &dyn Allocator) -> Result<()> {
        let geometry = self.geometry.ok_or(PolicyError::NotAttached)?;
        info!(
            sets = geometry.num_sets(),
            assoc = geometry.assoc(),
            "initializing LIFO cache sets"
        );
        self.sets = None;

        let num_sets = geometry.num_sets() as usize;
        let bytes = num_sets
            .checked_mul(mem::size_of::<LifoSetState>())
            .ok_or(PolicyError::OutOfMemory { bytes: usize::MAX })?;
        alloc.allocate(bytes)?;

        let mut sets: Vec<LifoSetState> = Vec::new();
        if sets.try_reserve_exact(num_sets).is_err() {
            warn!(bytes, "LIFO set state allocation failed");
            return Err(PolicyError::OutOfMemory { bytes });
        }
        sets.extend(
            (0..geometry.num_sets())
                .map(|g| LifoSetState::new(geometry.set_start(SetIndex::new(g)))),
        );
        self.sets = Some(sets);
        Ok(())
    }

    fn blk_init(&mut self) -> Result<()> {
        Ok(())
    }

    fn find_reclaim(
        &mut self,
        states: &dyn BlockStates,
        start: BlockIndex,
    ) -> Result<Option<BlockIndex>> {
        let assoc = self.geometry.ok_or(PolicyError::NotAttached)?.assoc();
        let set = start.set(assoc);
        let (geometry, set_state) = self.bound_set(set)?;
        let set_start = geometry.set_start(set);
        let end = geometry.set_end(set);
        if start != set_start {
            error!(%start, %set, %set_start, "victim search started mid-set");
            panic!("start index {start} is not the first block of set {set} ({set_start})");
        }

        let mut i = set_state.eviction_cursor;
        let mut victim = None;
        for _ in 0..assoc {
            assert_in_set("eviction cursor", i, start, end);
            if states.get(i) == BlockState::VALID {
                victim = Some(i);
                break;
            }
            i = i.step_back(start, end);
        }
        // The cursor moves one slot even when nothing was found.
        set_state.eviction_cursor = i.step_back(start, end);

        trace!(%start, victim = ?victim.map(BlockIndex::val), "LIFO victim search");
        Ok(victim)
    }

    fn clean_set(
        &mut self,
        states: &mut dyn BlockStates,
        set: SetIndex,
        to_clean: usize,
    ) -> Result<usize> {
        let (geometry, set_state) = self.bound_set(set)?;
        let assoc = geometry.assoc();
        let start = geometry.set_start(set);
        let end = geometry.set_end(set);

        let mut i = set_state.clean_cursor;
        let mut scanned = 0;
        let mut nr_writes = 0;
        while scanned < assoc && nr_writes < to_clean {
            assert_in_set("clean cursor", i, start, end);
            if states.get(i).is_cleanable() {
                states.set_flag(i, BlockState::DISKWRITEINPROG);
                nr_writes += 1;
            }
            scanned += 1;
            i = i.step_back(start, end);
        }
        set_state.clean_cursor = i;

        debug!(%set, scanned, marked = nr_writes, "LIFO clean pass");
        Ok(nr_writes)
    }
}

/// Creates a new LIFO instance on behalf of the registry.
fn instance_init(module: ModuleRef) -> Box<dyn CachePolicy> {
    info!("created new instance of LIFO");
    Box::new(LifoPolicy::with_module(module))
}

/// Registers the LIFO policy with `registry`.
///
/// # Errors
///
/// Returns [`PolicyError::DuplicateName`] if LIFO is already registered.
pub fn register(registry: &PolicyRegistry) -> Result<()> {
    registry.register(DESCRIPTOR).inspect_err(|e| {
        info!(error = %e, "LIFO already registered");
    })
}

/// Removes the LIFO policy from `registry`.
///
/// # Errors
///
/// Returns [`PolicyError::NotFound`] if LIFO is not registered and
/// [`PolicyError::InUse`] while instances are alive.
pub fn unregister(registry: &PolicyRegistry) -> Result<()> {
    registry.unregister(PolicyKind::Lifo).inspect_err(|e| {
        error!(error = %e, "LIFO unregister failed");
    })
}

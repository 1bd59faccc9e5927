//! In-memory block state table.

use std::mem;

use tracing::warn;

use super::traits::BlockStates;
use crate::common::{BlockIndex, BlockState, PolicyError, Result};

/// A flat vector of block states, one entry per cache block.
///
/// This is the simplest engine-side representation and is what
/// [`crate::attach::CacheAttachment`] uses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateTable {
    states: Vec<BlockState>,
}

impl StateTable {
    /// Creates a table of `len` blocks, all `INVALID`.
    pub fn new(len: usize) -> Self {
        Self {
            states: vec![BlockState::INVALID; len],
        }
    }

    /// Creates a table of `len` blocks, all `INVALID`, reporting allocation
    /// failure instead of aborting.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::OutOfMemory`] if the table cannot be allocated.
    pub fn try_new(len: u64) -> Result<Self> {
        let bytes = usize::try_from(len)
            .ok()
            .and_then(|n| n.checked_mul(mem::size_of::<BlockState>()))
            .unwrap_or(usize::MAX);
        let len = usize::try_from(len).map_err(|_| PolicyError::OutOfMemory { bytes })?;

        let mut states: Vec<BlockState> = Vec::new();
        if states.try_reserve_exact(len).is_err() {
            warn!(bytes, "block state allocation failed");
            return Err(PolicyError::OutOfMemory { bytes });
        }
        states.resize(len, BlockState::INVALID);
        Ok(Self { states })
    }

    /// Creates a table from explicit states, indexed from block 0.
    pub const fn from_states(states: Vec<BlockState>) -> Self {
        Self { states }
    }

    /// Number of blocks in the table.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if the table has no blocks.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Overwrites every flag of `index`.
    pub fn set(&mut self, index: BlockIndex, state: BlockState) {
        self.states[index.val() as usize] = state;
    }

    /// Iterates over `(index, state)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (BlockIndex, BlockState)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(i, &s)| (BlockIndex::new(i as u64), s))
    }
}

impl BlockStates for StateTable {
    fn get(&self, index: BlockIndex) -> BlockState {
        self.states[index.val() as usize]
    }

    fn set_flag(&mut self, index: BlockIndex, flag: BlockState) {
        self.states[index.val() as usize] |= flag;
    }

    fn clear_flag(&mut self, index: BlockIndex, flag: BlockState) {
        let slot = &mut self.states[index.val() as usize];
        *slot = slot.without(flag);
    }
}

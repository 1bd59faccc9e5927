//! Cache attachment.
//!
//! Ties one replacement policy instance to one block state table. An attachment
//! is built from a [`CacheConfig`]: the geometry is validated, the configured
//! policy is instantiated through the registry, and its lifecycle hooks run in
//! order. Dropping the attachment tears the policy down.
//!
//! The attachment routes no requests and performs no I/O. Engines use it to hold
//! policy and block state together and to drive eviction and cleaning.

use tracing::debug;

use crate::common::{BlockIndex, PolicyError, Result, SetIndex};
use crate::config::CacheConfig;
use crate::engine::{Allocator, CacheGeometry, StateTable};
use crate::policies::CachePolicy;
use crate::registry::PolicyRegistry;

/// One cache's policy instance and block state.
#[derive(Debug)]
pub struct CacheAttachment {
    geometry: CacheGeometry,
    policy: Box<dyn CachePolicy>,
    states: StateTable,
}

impl CacheAttachment {
    /// Creates an attachment for `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Cache size, associativity, and policy name.
    /// * `registry` - Registry the policy is instantiated from.
    /// * `alloc` - Source of the policy's set state.
    ///
    /// # Errors
    ///
    /// Fails if the geometry is invalid, the policy is not registered, or set
    /// or block state cannot be allocated. No policy instance survives a failure.
    pub fn new(
        config: &CacheConfig,
        registry: &PolicyRegistry,
        alloc: &dyn Allocator,
    ) -> Result<Self> {
        let geometry = config.geometry()?;
        let mut policy = registry.instantiate(config.policy)?;
        policy.init(geometry)?;
        policy.sets_init(alloc)?;
        policy.blk_init()?;
        let states = StateTable::try_new(geometry.size())?;

        debug!(
            policy = %policy.name(),
            size = geometry.size(),
            assoc = geometry.assoc(),
            "cache attached"
        );
        Ok(Self {
            geometry,
            policy,
            states,
        })
    }

    /// The attachment's geometry.
    pub const fn geometry(&self) -> CacheGeometry {
        self.geometry
    }

    /// The policy instance.
    pub fn policy(&self) -> &dyn CachePolicy {
        self.policy.as_ref()
    }

    /// Block state table.
    pub const fn states(&self) -> &StateTable {
        &self.states
    }

    /// Mutable block state table.
    pub const fn states_mut(&mut self) -> &mut StateTable {
        &mut self.states
    }

    /// Picks a victim in `set`.
    ///
    /// # Errors
    ///
    /// Propagates policy errors, e.g. a set beyond the cache.
    pub fn reclaim(&mut self, set: SetIndex) -> Result<Option<BlockIndex>> {
        let num_sets = self.geometry.num_sets();
        if set.val() >= num_sets {
            return Err(PolicyError::SetOutOfRange {
                set: set.val(),
                num_sets,
            });
        }
        let start = self.geometry.set_start(set);
        self.policy.find_reclaim(&self.states, start)
    }

    /// Flags up to `to_clean` dirty blocks of `set` for write-back.
    ///
    /// # Errors
    ///
    /// Propagates policy errors, e.g. a set beyond the cache.
    pub fn clean(&mut self, set: SetIndex, to_clean: usize) -> Result<usize> {
        self.policy.clean_set(&mut self.states, set, to_clean)
    }
}

impl Drop for CacheAttachment {
    fn drop(&mut self) {
        self.policy.exit();
        debug!(policy = %self.policy.name(), "cache detached");
    }
}

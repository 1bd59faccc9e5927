//! Policy registry.
//!
//! Maps policy names to constructors. Every policy variant registers one
//! [`PolicyDescriptor`]; the engine instantiates policies by name when it
//! attaches a cache. Each registered entry counts the instances created from it
//! and refuses to be unregistered while any of them is alive.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::info;

use crate::common::{PolicyError, Result};
use crate::config::PolicyKind;
use crate::policies::CachePolicy;

/// Constructor stored in the registry.
///
/// Receives the reference the new instance must hold until it exits.
pub type InstanceInit = fn(ModuleRef) -> Box<dyn CachePolicy>;

/// Registration record of one policy variant.
#[derive(Clone, Copy, Debug)]
pub struct PolicyDescriptor {
    /// Name the policy is registered under.
    pub name: PolicyKind,
    /// Creates a new, unbound instance.
    pub instance_init: InstanceInit,
}

/// A live-instance reference on a registry entry.
///
/// Dropping it releases the reference.
pub struct ModuleRef {
    live: Arc<AtomicUsize>,
}

impl ModuleRef {
    fn acquire(live: &Arc<AtomicUsize>) -> Self {
        let _ = live.fetch_add(1, Ordering::AcqRel);
        Self {
            live: Arc::clone(live),
        }
    }
}

impl Drop for ModuleRef {
    fn drop(&mut self) {
        let _ = self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

impl fmt::Debug for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRef")
            .field("live", &self.live.load(Ordering::Relaxed))
            .finish()
    }
}

#[derive(Debug)]
struct Entry {
    descriptor: PolicyDescriptor,
    live: Arc<AtomicUsize>,
}

/// Name → constructor map shared by every cache attachment.
#[derive(Debug, Default)]
pub struct PolicyRegistry {
    entries: RwLock<HashMap<PolicyKind, Entry>>,
}

impl PolicyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<PolicyRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Adds a policy.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::DuplicateName`] if a policy with the same name is
    /// already registered.
    pub fn register(&self, descriptor: PolicyDescriptor) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(&descriptor.name) {
            return Err(PolicyError::DuplicateName(descriptor.name));
        }
        let _ = entries.insert(
            descriptor.name,
            Entry {
                descriptor,
                live: Arc::new(AtomicUsize::new(0)),
            },
        );
        info!(policy = %descriptor.name, "registered replacement policy");
        Ok(())
    }

    /// Removes a policy.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::NotFound`] if no such policy is registered and
    /// [`PolicyError::InUse`] while instances created from it are alive.
    pub fn unregister(&self, name: PolicyKind) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(&name).ok_or(PolicyError::NotFound(name))?;
        let live = entry.live.load(Ordering::Acquire);
        if live > 0 {
            return Err(PolicyError::InUse { name, live });
        }
        let _ = entries.remove(&name);
        info!(policy = %name, "unregistered replacement policy");
        Ok(())
    }

    /// Creates a new instance of the named policy.
    ///
    /// The instance holds a reference on the registry entry until it exits or is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::NotFound`] if no such policy is registered.
    pub fn instantiate(&self, name: PolicyKind) -> Result<Box<dyn CachePolicy>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(&name).ok_or(PolicyError::NotFound(name))?;
        let module = ModuleRef::acquire(&entry.live);
        Ok((entry.descriptor.instance_init)(module))
    }

    /// Returns `true` if a policy with this name is registered.
    pub fn is_registered(&self, name: PolicyKind) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&name)
    }

    /// Number of live instances of the named policy, or `None` if it is not
    /// registered.
    pub fn live_instances(&self, name: PolicyKind) -> Option<usize> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&name)
            .map(|entry| entry.live.load(Ordering::Acquire))
    }
}

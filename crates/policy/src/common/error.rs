//! Policy error definitions.
//!
//! This module defines the recoverable failures of the policy layer. It covers:
//! 1. **Resource Exhaustion:** Set-state allocation failing at attach time.
//! 2. **Registration:** Duplicate, missing, or still-referenced policy names.
//! 3. **Attachment:** Geometry that cannot be represented, or calls made before attach.
//!
//! A cursor escaping its set is not represented here: it means the shared state is
//! corrupt and the policy panics instead of returning.

use thiserror::Error;

use crate::config::PolicyKind;

/// Errors returned by replacement policies and the policy registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Allocating per-set policy state failed.
    #[error("out of memory allocating {bytes} bytes of set state")]
    OutOfMemory {
        /// Size of the failed request in bytes.
        bytes: usize,
    },

    /// A policy with this name is already registered.
    #[error("policy {0} is already registered")]
    DuplicateName(PolicyKind),

    /// No policy with this name is registered.
    #[error("policy {0} is not registered")]
    NotFound(PolicyKind),

    /// The name does not match any known replacement policy.
    #[error("unknown replacement policy {0:?}")]
    UnknownPolicy(String),

    /// The policy still has live instances and cannot be unregistered.
    #[error("policy {name} has {live} live instance(s)")]
    InUse {
        /// Name of the policy.
        name: PolicyKind,
        /// Number of instances still alive.
        live: usize,
    },

    /// The policy was used before it was bound to a cache and its sets initialized.
    #[error("policy is not attached to a cache")]
    NotAttached,

    /// A set index beyond the bound cache's set count.
    #[error("set {set} is out of range for a cache of {num_sets} sets")]
    SetOutOfRange {
        /// The offending set index.
        set: u64,
        /// Number of sets in the cache.
        num_sets: u64,
    },

    /// Configuration text could not be parsed.
    #[error("malformed config: {0}")]
    Config(String),

    /// Cache geometry is inconsistent or out of range.
    #[error("invalid cache geometry: {0}")]
    InvalidGeometry(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PolicyError>;

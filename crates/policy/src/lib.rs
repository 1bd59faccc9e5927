//! Block cache replacement policy library.
//!
//! This crate implements pluggable replacement policies for a set-associative,
//! write-back block cache:
//! 1. **Interface:** The `CachePolicy` trait every variant implements.
//! 2. **LIFO:** Per-set cursors for victim selection and round-robin write-back scans.
//! 3. **Registry:** Name → constructor map with live-instance tracking.
//! 4. **Engine Capabilities:** Geometry, block state, and allocation hooks the cache
//!    engine lends to its policy.
//! 5. **Configuration:** JSON-loadable attachment settings.

/// Cache attachment glue (policy + block state).
pub mod attach;
/// Common types (indices, block state, errors).
pub mod common;
/// Attachment configuration and policy names.
pub mod config;
/// Engine-facing capabilities and their default implementations.
pub mod engine;
/// Replacement policy trait and implementations.
pub mod policies;
/// Policy registry.
pub mod registry;

/// Attachment type; build with `CacheAttachment::new`.
pub use crate::attach::CacheAttachment;
/// Crate error and result types.
pub use crate::common::{PolicyError, Result};
/// Root configuration type; use `CacheConfig::default()` or `CacheConfig::from_json`.
pub use crate::config::{CacheConfig, PolicyKind};
/// Policy interface and the LIFO implementation.
pub use crate::policies::{CachePolicy, LifoPolicy};
/// Registry type; `PolicyRegistry::global()` is the process-wide instance.
pub use crate::registry::PolicyRegistry;

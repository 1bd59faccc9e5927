//! Engine-facing side of the policy interface.
//!
//! The cache engine owns block state, memory, and the cache layout. This module
//! describes what a policy may consume from it:
//! 1. **Geometry:** Validated size, associativity, and set arithmetic.
//! 2. **Capabilities:** `BlockStates` and `Allocator` traits.
//! 3. **Implementations:** A plain state table and two allocators for engines
//!    that do not bring their own.

/// Allocator implementations.
pub mod alloc;

/// Cache size and set layout.
pub mod geometry;

/// In-memory block state table.
pub mod table;

/// Capability traits.
pub mod traits;

pub use alloc::{BoundedAllocator, SystemAllocator};
pub use geometry::CacheGeometry;
pub use table::StateTable;
pub use traits::{Allocator, BlockStates};

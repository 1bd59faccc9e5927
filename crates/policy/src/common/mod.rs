//! Common types shared by every policy and by the engine-facing capabilities.
//!
//! This module provides the fundamental building blocks of the crate:
//! 1. **Index Types:** Strong types for block (slot) and set numbers.
//! 2. **Block State:** The flag bitmask the engine keeps for every slot.
//! 3. **Error Handling:** The crate error enum and `Result` alias.

/// Block and set index types.
pub mod index;

/// Per-block state flags.
pub mod state;

/// Error types.
pub mod error;

pub use error::{PolicyError, Result};
pub use index::{BlockIndex, SetIndex};
pub use state::BlockState;

//! Configuration for a cache attachment.
//!
//! This module defines the configuration structures and enums used to
//! parameterize a block cache attachment. It provides:
//! 1. **Defaults:** Baseline geometry constants.
//! 2. **Structures:** `CacheConfig` with size, associativity, and policy selection.
//! 3. **Enums:** The replacement policy names understood by the registry.
//!
//! Configuration is supplied as JSON (`CacheConfig::from_json`) or built with
//! `CacheConfig::default()`.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::common::{PolicyError, Result};
use crate::engine::CacheGeometry;

/// Default configuration constants.
mod defaults {
    /// Total number of cache blocks (64 Ki blocks).
    pub const CACHE_SIZE: u64 = 65_536;

    /// Number of blocks per associative set.
    ///
    /// Must be a power of two so that set lookups by division and set counting by
    /// shift agree.
    pub const ASSOC: u64 = 256;
}

/// Cache replacement policy names.
///
/// Selects the algorithm used to pick a victim block and to order write-back
/// scans within a set. Every variant is looked up through the policy registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PolicyKind {
    /// Last In First Out: a per-set cursor walks backward from the most recent
    /// fill position.
    #[default]
    #[serde(alias = "Lifo", alias = "lifo")]
    Lifo,
    /// Least Recently Used.
    #[serde(alias = "Lru", alias = "lru")]
    Lru,
    /// First In First Out.
    #[serde(alias = "Fifo", alias = "fifo")]
    Fifo,
}

impl PolicyKind {
    /// Returns the registry name of the policy.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lifo => "LIFO",
            Self::Lru => "LRU",
            Self::Fifo => "FIFO",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "LIFO" => Ok(Self::Lifo),
            "LRU" => Ok(Self::Lru),
            "FIFO" => Ok(Self::Fifo),
            _ => Err(PolicyError::UnknownPolicy(s.to_owned())),
        }
    }
}

/// Configuration of one cache attachment.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Total number of cache blocks.
    #[serde(default = "CacheConfig::default_size")]
    pub size: u64,

    /// Number of blocks per set.
    #[serde(default = "CacheConfig::default_assoc")]
    pub assoc: u64,

    /// Replacement policy name.
    #[serde(default)]
    pub policy: PolicyKind,
}

impl CacheConfig {
    /// Returns the default cache size in blocks.
    const fn default_size() -> u64 {
        defaults::CACHE_SIZE
    }

    /// Returns the default associativity.
    const fn default_assoc() -> u64 {
        defaults::ASSOC
    }

    /// Parses a configuration from JSON text.
    ///
    /// Missing fields take their defaults. The geometry is validated before the
    /// configuration is returned.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Config`] if the text is not valid configuration
    /// JSON, or [`PolicyError::InvalidGeometry`] if it describes an unusable
    /// geometry.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| PolicyError::Config(e.to_string()))?;
        let _ = config.geometry()?;
        Ok(config)
    }

    /// Validates the configuration and derives the cache geometry.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidGeometry`] when `assoc` is not a non-zero
    /// power of two or `size` is not a non-zero multiple of `assoc`.
    pub fn geometry(&self) -> Result<CacheGeometry> {
        CacheGeometry::new(self.size, self.assoc)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size: defaults::CACHE_SIZE,
            assoc: defaults::ASSOC,
            policy: PolicyKind::default(),
        }
    }
}

//! World Configuration and Builder
//!
//! This module provides configuration types for deterministic world generation
//! and the bounds applied to path searches.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldError};

/// Highest supported subdivision level (4 · 4^5 = 4096 tiles)
pub const MAX_SUBDIVISIONS: u32 = 5;

/// Maximum number of islands a world may hold
pub const ISLAND_MAX: usize = 254;

/// Default sphere radius in world units
pub const DEFAULT_RADIUS: f32 = 1000.0;

/// Configuration for deterministic world generation
///
/// This is the whole of the world state a host sends to a joining client.
/// The client regenerates the sphere, terrain and islands locally from it;
/// per-tile data never crosses the wire.
///
/// # Serialization
///
/// Only the configuration is serialized (a few dozen bytes), never the
/// generated tiles.
///
/// # Example
///
/// ```rust
/// use geodesic_isles::*;
///
/// let config = WorldConfigBuilder::new()
///     .seed(42)
///     .subdivisions(3)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.tile_count(), 256);
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: WorldConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConfig {
    /// Random seed for terrain and island generation
    ///
    /// The same seed with the same remaining parameters always produces the
    /// exact same world on every peer.
    pub seed: u32,

    /// Number of times the base tetrahedron is subdivided (0 to 5)
    pub subdivisions: u32,

    /// Sphere radius every vertex is projected onto
    pub radius: f32,

    /// Number of islands to attempt, 0 to derive from the tile count
    pub island_count: usize,

    /// Maximum tiles per island, 0 to derive from the tile count
    pub island_size: usize,

    /// Proportion of the island size to randomize away (0.0 to 1.0)
    pub island_variance: f32,

    /// Islands with fewer land tiles than this are sunk back into the sea
    pub island_min_land: usize,
}

impl WorldConfig {
    /// Number of tiles the sphere will have: `4 · 4^L`
    ///
    /// Saturates at `usize::MAX` for levels no sphere can have.
    #[inline]
    pub fn tile_count(&self) -> usize {
        self.quads().saturating_mul(4)
    }

    /// Number of vertices the sphere will have: `2 · 4^L + 2`
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.quads().saturating_mul(2).saturating_add(2)
    }

    /// `4^L`, saturating
    fn quads(&self) -> usize {
        self.subdivisions
            .checked_mul(2)
            .and_then(|shift| 1usize.checked_shl(shift))
            .unwrap_or(usize::MAX)
    }

    /// Check every field against the limits the builder enforces
    ///
    /// A configuration received from a peer has public fields and may not
    /// have come through [`WorldConfigBuilder`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first field out of range
    pub fn validate(&self) -> Result<()> {
        check_subdivisions(self.subdivisions)?;
        check_radius(self.radius)?;
        check_island_count(self.island_count)?;
        check_island_variance(self.island_variance)
    }

    /// Island count after resolving the "0 means default" rule
    pub fn effective_island_count(&self) -> usize {
        if self.island_count > 0 {
            return self.island_count;
        }
        (self.tile_count() / 128).clamp(2, ISLAND_MAX)
    }

    /// Island size after resolving the "0 means default" rule
    ///
    /// The default lets the requested islands claim about a third of the
    /// globe.
    pub fn effective_island_size(&self) -> usize {
        if self.island_size > 0 {
            return self.island_size;
        }
        (self.tile_count() / self.effective_island_count() / 3).max(8)
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            subdivisions: 4,
            radius: DEFAULT_RADIUS,
            island_count: 0,
            island_size: 0,
            island_variance: 0.3,
            island_min_land: 6,
        }
    }
}

/// Builder for creating WorldConfig with validation
///
/// # Example
///
/// ```rust
/// use geodesic_isles::*;
///
/// let config = WorldConfigBuilder::new()
///     .seed(12345)
///     .subdivisions(4)
///     .unwrap()
///     .island_count(6)
///     .unwrap()
///     .island_size(40)
///     .island_variance(0.5)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.effective_island_count(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct WorldConfigBuilder {
    seed: Option<u32>,
    subdivisions: u32,
    radius: f32,
    island_count: usize,
    island_size: usize,
    island_variance: f32,
    island_min_land: usize,
}

impl WorldConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - subdivisions: 4 (1024 tiles)
    /// - radius: 1000.0
    /// - island_count / island_size: derived from the tile count
    /// - island_variance: 0.3
    /// - island_min_land: 6
    pub fn new() -> Self {
        let defaults = WorldConfig::default();
        Self {
            seed: None,
            subdivisions: defaults.subdivisions,
            radius: defaults.radius,
            island_count: defaults.island_count,
            island_size: defaults.island_size,
            island_variance: defaults.island_variance,
            island_min_land: defaults.island_min_land,
        }
    }

    /// Set the world seed
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the subdivision level
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `level > MAX_SUBDIVISIONS`
    pub fn subdivisions(mut self, level: u32) -> Result<Self> {
        check_subdivisions(level)?;
        self.subdivisions = level;
        Ok(self)
    }

    /// Set the sphere radius
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if radius is not a positive finite number
    pub fn radius(mut self, radius: f32) -> Result<Self> {
        check_radius(radius)?;
        self.radius = radius;
        Ok(self)
    }

    /// Set the number of islands to attempt (0 for default)
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `count > ISLAND_MAX`
    pub fn island_count(mut self, count: usize) -> Result<Self> {
        check_island_count(count)?;
        self.island_count = count;
        Ok(self)
    }

    /// Set the maximum island size in tiles (0 for default)
    pub fn island_size(mut self, size: usize) -> Self {
        self.island_size = size;
        self
    }

    /// Set the proportion of island size to randomize
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if variance is outside `[0, 1]`
    pub fn island_variance(mut self, variance: f32) -> Result<Self> {
        check_island_variance(variance)?;
        self.island_variance = variance;
        Ok(self)
    }

    /// Set the minimum number of land tiles a surviving island must have
    pub fn island_min_land(mut self, min_land: usize) -> Self {
        self.island_min_land = min_land;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    pub fn build(self) -> Result<WorldConfig> {
        let seed = self.seed.unwrap_or_else(rand::random);

        Ok(WorldConfig {
            seed,
            subdivisions: self.subdivisions,
            radius: self.radius,
            island_count: self.island_count,
            island_size: self.island_size,
            island_variance: self.island_variance,
            island_min_land: self.island_min_land,
        })
    }
}

fn check_subdivisions(level: u32) -> Result<()> {
    if level > MAX_SUBDIVISIONS {
        return Err(WorldError::InvalidConfig(format!(
            "subdivisions must be <= {} (got {})",
            MAX_SUBDIVISIONS, level
        )));
    }
    Ok(())
}

fn check_radius(radius: f32) -> Result<()> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(WorldError::InvalidConfig(format!(
            "radius must be positive (got {})",
            radius
        )));
    }
    Ok(())
}

fn check_island_count(count: usize) -> Result<()> {
    if count > ISLAND_MAX {
        return Err(WorldError::InvalidConfig(format!(
            "island count must be <= {} (got {})",
            ISLAND_MAX, count
        )));
    }
    Ok(())
}

fn check_island_variance(variance: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&variance) {
        return Err(WorldError::InvalidConfig(format!(
            "island variance must be within [0, 1] (got {})",
            variance
        )));
    }
    Ok(())
}

impl Default for WorldConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounds applied to a single path search
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Longest path (in steps) a search may return
    pub max_path_len: usize,
    /// Capacity of the open node list
    pub search_breadth: usize,
}

impl SearchLimits {
    /// Limits for the given path cap, with a search breadth of three nodes
    /// per path step
    pub fn new(max_path_len: usize) -> Self {
        Self {
            max_path_len,
            search_breadth: max_path_len * 3,
        }
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::new(64)
    }
}

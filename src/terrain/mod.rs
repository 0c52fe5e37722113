//! Terrain classification and island generation
//!
//! Tiles start as open water. The island generator grows seeded islands over
//! them and classifies each claimed tile as shallows, sand or ground.

mod islands;

pub use islands::{TerrainGenerator, COLD_LATITUDE, FRONTIER_MAX, GROUND_HEIGHT, HOT_LATITUDE};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{WorldConfig, ISLAND_MAX};

/// Climate band of a ground tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Climate {
    #[default]
    Temperate,
    /// Near the equator
    Hot,
    /// Near the poles
    Cold,
}

/// Terrain types for globe tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Terrain {
    /// Open sea
    #[default]
    Water,
    /// Coastal water belonging to an island
    Shallow,
    /// Beach surrounding an island's interior
    Sand,
    /// Island interior
    Ground(Climate),
}

impl Terrain {
    /// Check if ships can sail here (open sea and shallows)
    pub fn is_water(&self) -> bool {
        matches!(self, Terrain::Water | Terrain::Shallow)
    }

    /// Check if this terrain is land
    pub fn is_land(&self) -> bool {
        !self.is_water()
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Terrain::Water => "Water",
            Terrain::Shallow => "Shallow",
            Terrain::Sand => "Sand",
            Terrain::Ground(Climate::Temperate) => "Temperate",
            Terrain::Ground(Climate::Hot) => "Tropical",
            Terrain::Ground(Climate::Cold) => "Boreal",
        }
    }
}

/// A generated island
///
/// Immutable once generation finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Island {
    /// Tile the island was grown from
    pub root: usize,
    /// Tiles claimed by the island (shallows included)
    pub tiles: usize,
    /// Sand and ground tiles
    pub land: usize,
}

/// Parameters for island growth, resolved from a `WorldConfig`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IslandParams {
    /// Islands to attempt (clamped to `ISLAND_MAX`)
    pub count: usize,
    /// Maximum tiles per island
    pub size: usize,
    /// Proportion of `size` randomized away per island
    pub variance: f32,
    /// Smallest land count a surviving island may have
    pub min_land: usize,
}

impl IslandParams {
    /// Resolve defaults from a world configuration
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            count: config.effective_island_count().min(ISLAND_MAX),
            size: config.effective_island_size(),
            variance: config.island_variance,
            min_land: config.island_min_land,
        }
    }
}

/// What island generation achieved compared to what was asked
///
/// A shortfall is a normal outcome on crowded or small globes, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IslandReport {
    /// Islands requested
    pub requested: usize,
    /// Islands that found a root tile
    pub placed: usize,
    /// Placed islands sunk for having too little land
    pub rejected: usize,
    /// Islands remaining in the world
    pub kept: usize,
    /// Root tile of every placed island, in placement order
    pub roots: Vec<usize>,
}

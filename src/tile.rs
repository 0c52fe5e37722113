//! Tile Structure
//!
//! A tile is one triangular face of the geodesic sphere, carrying its terrain,
//! height, island membership and its three neighbours.

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::terrain::Terrain;

/// A single triangular tile on the globe
///
/// # Design Notes
///
/// Tiles are NOT sent between peers. They are regenerated from `WorldConfig`
/// on every machine, which is what keeps join payloads tiny.
///
/// Tiles are never created or destroyed after generation; terrain passes only
/// reclassify them.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Tile index (0 to tile_count-1), equal to its triangle index in the mesh
    pub id: usize,

    /// Corner vertex ids, counter-clockwise from outside
    pub corners: [u32; 3],

    /// Neighbouring tile across edge (corner k, corner k+1) for slot k
    ///
    /// Path steps are encoded as these slot numbers, so the order is part of
    /// the wire format.
    pub neighbors: [usize; 3],

    /// Centroid of the three corners
    ///
    /// Lies slightly inside the sphere. Used for distance estimates and
    /// position lookups.
    pub center: Vec3,

    /// Terrain classification
    pub terrain: Terrain,

    /// Height above sea level (0 for sea tiles)
    pub height: f32,

    /// Island this tile belongs to, if any
    pub island: Option<usize>,
}

impl Tile {
    /// Create an open-water tile
    ///
    /// This is typically called while building the tile graph, not by user code.
    pub fn new(id: usize, corners: [u32; 3], neighbors: [usize; 3], center: Vec3) -> Self {
        Self {
            id,
            corners,
            neighbors,
            center,
            terrain: Terrain::Water,
            height: 0.0,
            island: None,
        }
    }

    /// Slot (0..3) under which `other` is a neighbour
    #[inline]
    pub fn neighbor_slot(&self, other: usize) -> Option<usize> {
        self.neighbors.iter().position(|&n| n == other)
    }

    /// Check if this tile is a neighbour of another tile
    #[inline]
    pub fn is_neighbor_of(&self, other: usize) -> bool {
        self.neighbors.contains(&other)
    }

    /// Ships may sail here
    #[inline]
    pub fn is_water(&self) -> bool {
        self.terrain.is_water()
    }

    #[inline]
    pub fn is_land(&self) -> bool {
        self.terrain.is_land()
    }

    /// Straight-line distance between the two tile centres
    ///
    /// This is the estimate the path search ranks candidates with.
    #[inline]
    pub fn distance_to(&self, other: &Tile) -> f32 {
        self.center.distance(other.center)
    }
}

//! Tile adjacency graph
//!
//! Read-only view of the globe's tiles used by gameplay and the path search.

use crate::error::{Result, WorldError};
use crate::pathfinding::Occupancy;
use crate::prng::WorldRng;
use crate::sphere::SphereMesh;
use crate::tile::Tile;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;
use glam::Vec3;

/// The globe's tiles and their adjacency
///
/// Built once from a `SphereMesh`; terrain is applied during world
/// generation and never changes afterwards. Holds no interior mutability,
/// so any number of threads may query it at once.
///
/// # Example
///
/// ```
/// use geodesic_isles::*;
///
/// let sphere = SphereMesh::generate(2, 10.0).unwrap();
/// let graph = TileGraph::from_mesh(&sphere);
///
/// assert_eq!(graph.tile_count(), 64);
/// for &n in graph.neighbors(0) {
///     assert!(graph.tile(n).unwrap().is_neighbor_of(0));
/// }
/// ```
#[derive(Clone)]
pub struct TileGraph {
    /// All tiles (indexed by tile ID)
    tiles: Vec<Tile>,

    /// Spatial index over tile centres (requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl TileGraph {
    /// Build open-water tiles for every triangle of a sphere
    pub fn from_mesh(sphere: &SphereMesh) -> Self {
        let vertices = sphere.vertices();
        let tiles: Vec<Tile> = sphere
            .triangles()
            .iter()
            .zip(sphere.tile_neighbors())
            .enumerate()
            .map(|(id, (&corners, &neighbors))| {
                let center = corners
                    .iter()
                    .map(|&c| vertices[c as usize])
                    .sum::<Vec3>()
                    / 3.0;
                Tile::new(id, corners, neighbors, center)
            })
            .collect();

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let centers: Vec<Vec3> = tiles.iter().map(|t| t.center).collect();
            SpatialIndex::new(&centers)
        };

        Self {
            tiles,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        }
    }

    /// Mutable tiles for terrain generation
    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Get a tile by ID
    ///
    /// Returns `None` if the tile ID is out of bounds.
    #[inline]
    pub fn tile(&self, id: usize) -> Option<&Tile> {
        self.tiles.get(id)
    }

    /// Get a tile by ID, failing with `TileOutOfRange`
    pub fn try_tile(&self, id: usize) -> Result<&Tile> {
        self.tiles.get(id).ok_or(WorldError::TileOutOfRange {
            tile: id,
            tile_count: self.tiles.len(),
        })
    }

    /// Get all tiles as a slice
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[inline]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Neighbour IDs of a tile in slot order
    ///
    /// Returns empty slice if tile ID is invalid.
    pub fn neighbors(&self, id: usize) -> &[usize] {
        self.tiles
            .get(id)
            .map(|t| t.neighbors.as_slice())
            .unwrap_or(&[])
    }

    /// Find the tile under a position (requires spatial-index feature)
    ///
    /// Uses the KD-tree over tile centres, so any point above or below the
    /// surface maps to the closest tile.
    ///
    /// # Example
    ///
    /// ```
    /// # use geodesic_isles::*;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let sphere = SphereMesh::generate(3, 10.0).unwrap();
    /// let graph = TileGraph::from_mesh(&sphere);
    /// let center = graph.tile(17).unwrap().center;
    /// assert_eq!(graph.find_tile_at(center), 17);
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_tile_at(&self, position: Vec3) -> usize {
        self.spatial_index.find_nearest(position)
    }

    /// Tiles within a given hop count from a centre tile (BFS)
    ///
    /// # Returns
    ///
    /// Tile IDs in breadth-first order, starting with the centre.
    /// Returns empty vec if the centre ID is invalid.
    pub fn tiles_within_hops(&self, center: usize, hops: usize) -> Vec<usize> {
        if center >= self.tiles.len() {
            return vec![];
        }

        let mut visited = vec![false; self.tiles.len()];
        visited[center] = true;
        let mut found = vec![center];
        let mut frontier_start = 0;

        for _ in 0..hops {
            let frontier_end = found.len();
            for i in frontier_start..frontier_end {
                for &n in &self.tiles[found[i]].neighbors {
                    if !visited[n] {
                        visited[n] = true;
                        found.push(n);
                    }
                }
            }
            if found.len() == frontier_end {
                break;
            }
            frontier_start = frontier_end;
        }

        found
    }

    /// A random sea tile that is currently open
    ///
    /// Scans from a random tile, wrapping once. Returns `None` when every sea
    /// tile is occupied.
    pub fn random_open_tile<O: Occupancy + ?Sized>(
        &self,
        rng: &mut WorldRng,
        occupancy: &O,
    ) -> Option<usize> {
        if self.tiles.is_empty() {
            return None;
        }
        let start = rng.below(self.tiles.len());
        (0..self.tiles.len())
            .map(|offset| (start + offset) % self.tiles.len())
            .find(|&id| self.tiles[id].is_water() && occupancy.is_open(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Terrain;

    fn graph(level: u32) -> TileGraph {
        TileGraph::from_mesh(&SphereMesh::generate(level, 10.0).unwrap())
    }

    #[test]
    fn test_tiles_match_mesh() {
        let sphere = SphereMesh::generate(2, 10.0).unwrap();
        let graph = TileGraph::from_mesh(&sphere);

        assert_eq!(graph.tile_count(), sphere.tile_count());
        for tile in graph.tiles() {
            assert_eq!(tile.corners, sphere.triangles()[tile.id]);
            assert_eq!(tile.neighbors, sphere.tile_neighbors()[tile.id]);
            assert_eq!(tile.terrain, Terrain::Water);
            assert!(tile.center.length() < 10.0);
        }
    }

    #[test]
    fn test_tile_lookup() {
        let graph = graph(1);
        assert!(graph.tile(0).is_some());
        assert!(graph.tile(16).is_none());
        assert!(graph.try_tile(15).is_ok());
        assert_eq!(
            graph.try_tile(16),
            Err(WorldError::TileOutOfRange {
                tile: 16,
                tile_count: 16
            })
        );
        assert!(graph.neighbors(99).is_empty());
        assert_eq!(graph.neighbors(0).len(), 3);
    }

    #[test]
    fn test_tiles_within_hops() {
        let graph = graph(3);

        assert_eq!(graph.tiles_within_hops(0, 0), vec![0]);

        let ring1 = graph.tiles_within_hops(0, 1);
        assert_eq!(ring1.len(), 4);
        assert_eq!(&ring1[1..], graph.neighbors(0));

        let ring2 = graph.tiles_within_hops(0, 2);
        assert!(ring2.len() > ring1.len());

        // Enough hops reach the whole globe exactly once
        let all = graph.tiles_within_hops(5, 100);
        assert_eq!(all.len(), graph.tile_count());

        assert!(graph.tiles_within_hops(9999, 3).is_empty());
    }

    #[test]
    fn test_random_open_tile() {
        let graph = graph(2);
        let mut rng = WorldRng::new(4);

        let open = |_: usize| true;
        let tile = graph.random_open_tile(&mut rng, &open).unwrap();
        assert!(tile < graph.tile_count());

        let only_ten = |id: usize| id == 10;
        assert_eq!(graph.random_open_tile(&mut rng, &only_ten), Some(10));

        let full = |_: usize| false;
        assert_eq!(graph.random_open_tile(&mut rng, &full), None);
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_find_tile_at() {
        let graph = graph(3);
        for tile in graph.tiles().iter().step_by(7) {
            assert_eq!(graph.find_tile_at(tile.center), tile.id);
        }
    }
}

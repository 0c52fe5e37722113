//! Seeded island growth and terrain classification
//!
//! # Algorithm
//!
//! 1. For each island, scan from a random tile for a free root
//! 2. Grow the island from a bounded frontier, one random pick at a time
//! 3. Classify: enclosed shallows become sand, enclosed sand becomes ground
//! 4. Sink islands with too little land and renumber the survivors
//! 5. Smooth island heights once
//!
//! Every pass decides from a snapshot of the previous state and then applies,
//! walking tiles in index order. Random draws happen in a fixed order, so the
//! same seed always produces the same islands.

use std::ops::Range;

use log::{debug, warn};

use super::{Climate, Island, IslandParams, IslandReport, Terrain};
use crate::config::ISLAND_MAX;
use crate::prng::WorldRng;
use crate::tile::Tile;

/// Capacity of the growth frontier
pub const FRONTIER_MAX: usize = 64;

/// Latitudes (as a fraction of the radius) below which ground is hot
pub const HOT_LATITUDE: f32 = 0.35;

/// Latitudes above which ground is cold
pub const COLD_LATITUDE: f32 = 0.7;

/// Random offset applied to latitude before picking a climate
const LATITUDE_JITTER: f32 = 0.1;

/// Height range for new ground tiles
pub const GROUND_HEIGHT: Range<f32> = 1.0..6.0;

/// Grows islands on a tile array
///
/// The generator never owns the tiles; it reclassifies them in place.
///
/// # Example
///
/// ```rust
/// use geodesic_isles::*;
///
/// let sphere = SphereMesh::generate(3, 100.0).unwrap();
/// let mut tiles = TileGraph::from_mesh(&sphere).tiles().to_vec();
/// let params = IslandParams { count: 2, size: 20, variance: 0.0, min_land: 1 };
/// let mut rng = WorldRng::new(7);
///
/// let (islands, report) =
///     TerrainGenerator::new(params, sphere.radius()).generate(&mut tiles, &mut rng);
/// assert_eq!(islands.len(), report.kept);
/// ```
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    params: IslandParams,
    radius: f32,
}

impl TerrainGenerator {
    pub fn new(params: IslandParams, radius: f32) -> Self {
        Self { params, radius }
    }

    /// Grow and classify islands
    ///
    /// # Returns
    ///
    /// The surviving islands (ids match `Tile::island`) and a report of how
    /// many were requested, placed, rejected and kept.
    pub fn generate(&self, tiles: &mut [Tile], rng: &mut WorldRng) -> (Vec<Island>, IslandReport) {
        let mut report = IslandReport {
            requested: self.params.count,
            ..Default::default()
        };

        let mut islands = self.grow_islands(tiles, rng, &mut report);
        promote_sand(tiles);
        self.promote_ground(tiles, rng, &mut islands);
        let islands = self.sink_small_islands(tiles, islands, &mut report);
        smooth_heights(tiles);

        (islands, report)
    }

    fn grow_islands(
        &self,
        tiles: &mut [Tile],
        rng: &mut WorldRng,
        report: &mut IslandReport,
    ) -> Vec<Island> {
        let count = self.params.count.min(ISLAND_MAX);
        let mut islands = Vec::with_capacity(count);
        if tiles.is_empty() {
            return islands;
        }

        let mut frontier: Vec<usize> = Vec::with_capacity(FRONTIER_MAX);
        for id in 0..count {
            let Some(root) = find_root(tiles, id, rng) else {
                warn!("only {} of {} islands fit on the globe", islands.len(), count);
                break;
            };

            let size = self.params.size.max(1);
            let cut = (size as f32 * self.params.variance * rng.unit()) as usize;
            let limit = size.saturating_sub(cut).max(1);

            claim(&mut tiles[root], id);
            let mut claimed = 1;

            frontier.clear();
            extend_frontier(tiles, root, id, &mut frontier);

            while claimed < limit && !frontier.is_empty() {
                let tile = frontier.swap_remove(rng.below(frontier.len()));
                claim(&mut tiles[tile], id);
                claimed += 1;
                extend_frontier(tiles, tile, id, &mut frontier);
            }

            debug!(
                "island {} rooted at tile {} grew to {} of {} tiles",
                id, root, claimed, limit
            );
            report.roots.push(root);
            islands.push(Island {
                root,
                tiles: claimed,
                land: 0,
            });
        }

        report.placed = islands.len();
        islands
    }

    /// Enclosed sand becomes ground; shallows away from any sand return to the sea
    fn promote_ground(&self, tiles: &mut [Tile], rng: &mut WorldRng, islands: &mut [Island]) {
        let snapshot: Vec<Terrain> = tiles.iter().map(|t| t.terrain).collect();

        for index in 0..tiles.len() {
            let tile = &tiles[index];
            let Some(id) = tile.island else {
                continue;
            };

            match snapshot[index] {
                Terrain::Sand => {
                    let enclosed = tile.neighbors.iter().all(|&n| {
                        tiles[n].island == Some(id)
                            && matches!(snapshot[n], Terrain::Sand | Terrain::Ground(_))
                    });
                    if enclosed {
                        let climate = self.climate_at(tile, rng);
                        let height = rng.range_f32(GROUND_HEIGHT.start, GROUND_HEIGHT.end);
                        let tile = &mut tiles[index];
                        tile.terrain = Terrain::Ground(climate);
                        tile.height = height;
                    }
                }
                Terrain::Shallow => {
                    let near_sand = tile.neighbors.iter().any(|&n| snapshot[n] == Terrain::Sand);
                    if !near_sand {
                        let tile = &mut tiles[index];
                        tile.terrain = Terrain::Water;
                        tile.island = None;
                        islands[id].tiles -= 1;
                    }
                }
                _ => {}
            }
        }

        for tile in tiles.iter() {
            if let (Some(id), true) = (tile.island, tile.is_land()) {
                islands[id].land += 1;
            }
        }
    }

    fn climate_at(&self, tile: &Tile, rng: &mut WorldRng) -> Climate {
        let latitude = (tile.center.y / self.radius).abs()
            + rng.range_f32(-LATITUDE_JITTER, LATITUDE_JITTER);
        if latitude < HOT_LATITUDE {
            Climate::Hot
        } else if latitude > COLD_LATITUDE {
            Climate::Cold
        } else {
            Climate::Temperate
        }
    }

    /// Drop islands under the land minimum and renumber the rest in order
    fn sink_small_islands(
        &self,
        tiles: &mut [Tile],
        islands: Vec<Island>,
        report: &mut IslandReport,
    ) -> Vec<Island> {
        let mut remap = vec![None; islands.len()];
        let mut kept = Vec::with_capacity(islands.len());
        for (old, island) in islands.into_iter().enumerate() {
            if island.land >= self.params.min_land {
                remap[old] = Some(kept.len());
                kept.push(island);
            } else {
                debug!(
                    "island {} at tile {} has {} land tiles, sinking it",
                    old, island.root, island.land
                );
                report.rejected += 1;
            }
        }

        if report.rejected > 0 {
            warn!(
                "{} islands had fewer than {} land tiles and were sunk",
                report.rejected, self.params.min_land
            );
        }

        for tile in tiles.iter_mut() {
            if let Some(old) = tile.island {
                tile.island = remap[old];
                if tile.island.is_none() {
                    tile.terrain = Terrain::Water;
                    tile.height = 0.0;
                }
            }
        }

        report.kept = kept.len();
        kept
    }
}

/// Linear scan from a random tile for a free root, wrapping once
fn find_root(tiles: &[Tile], id: usize, rng: &mut WorldRng) -> Option<usize> {
    let start = rng.below(tiles.len());
    (0..tiles.len())
        .map(|offset| (start + offset) % tiles.len())
        .find(|&tile| is_free(tiles, tile, id))
}

/// Unclaimed sea not touching another island
fn is_free(tiles: &[Tile], tile: usize, id: usize) -> bool {
    let t = &tiles[tile];
    t.island.is_none()
        && t.terrain == Terrain::Water
        && t.neighbors
            .iter()
            .all(|&n| tiles[n].island.map_or(true, |other| other == id))
}

fn claim(tile: &mut Tile, id: usize) {
    tile.terrain = Terrain::Shallow;
    tile.island = Some(id);
}

fn extend_frontier(tiles: &[Tile], from: usize, id: usize, frontier: &mut Vec<usize>) {
    for &n in &tiles[from].neighbors {
        if frontier.len() >= FRONTIER_MAX {
            break;
        }
        if is_free(tiles, n, id) && !frontier.contains(&n) {
            frontier.push(n);
        }
    }
}

/// Shallows surrounded by their own island become sand
fn promote_sand(tiles: &mut [Tile]) {
    let enclosed: Vec<usize> = tiles
        .iter()
        .filter(|t| t.terrain == Terrain::Shallow)
        .filter(|t| {
            t.neighbors
                .iter()
                .all(|&n| t.island.is_some() && tiles[n].island == t.island)
        })
        .map(|t| t.id)
        .collect();

    for index in enclosed {
        tiles[index].terrain = Terrain::Sand;
    }
}

/// Blend each island tile's height halfway toward its neighbourhood mean
fn smooth_heights(tiles: &mut [Tile]) {
    let heights: Vec<f32> = tiles.iter().map(|t| t.height).collect();
    for tile in tiles.iter_mut().filter(|t| t.island.is_some()) {
        let sum: f32 = heights[tile.id] + tile.neighbors.iter().map(|&n| heights[n]).sum::<f32>();
        let mean = sum / 4.0;
        tile.height = 0.5 * heights[tile.id] + 0.5 * mean;
    }
}

//! Best-first ship routing over the tile graph
//!
//! The search always expands the open node with the lowest `2 · moves + dist`,
//! where `dist` is the straight-line distance to the target. Weighting moves
//! double keeps routes short without exploring the whole globe.
//!
//! Searches are bounded twice: the open list holds at most
//! `SearchLimits::search_breadth` nodes and a finished path may be at most
//! `SearchLimits::max_path_len` steps. Hitting either bound is an ordinary
//! outcome, not an error.

mod path;

pub use path::Path;
pub(crate) use path::step_target;

use log::{error, warn};

use crate::config::SearchLimits;
use crate::error::{Result, WorldError};
use crate::graph::TileGraph;
use crate::tile::Tile;

/// Dynamic per-tile availability supplied by gameplay
///
/// Terrain is checked separately; this only answers whether something is in
/// the way.
pub trait Occupancy {
    /// Nothing blocks the tile
    fn is_open(&self, tile: usize) -> bool;

    /// The tile's occupant is on its way out
    ///
    /// Vacating tiles may be routed through even though they are not open.
    fn is_vacating(&self, _tile: usize) -> bool {
        false
    }
}

impl<F: Fn(usize) -> bool> Occupancy for F {
    fn is_open(&self, tile: usize) -> bool {
        self(tile)
    }
}

/// An entry in the open list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchNode {
    pub tile: usize,
    /// Straight-line distance to the target
    pub dist: f32,
    /// Steps from the start
    pub moves: usize,
}

impl SearchNode {
    #[inline]
    fn score(&self) -> f32 {
        2.0 * self.moves as f32 + self.dist
    }
}

/// Result of a path search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSearch {
    /// A route within the length cap
    Found(Path),
    /// Every reachable tile was searched without arriving
    Unreachable,
    /// The open list filled up before the search finished
    CapacityExhausted,
    /// A route exists but has this many steps, more than the cap
    TooLong(usize),
}

impl PathSearch {
    pub fn is_found(&self) -> bool {
        matches!(self, PathSearch::Found(_))
    }

    /// The path, if one was found
    pub fn into_path(self) -> Option<Path> {
        match self {
            PathSearch::Found(path) => Some(path),
            _ => None,
        }
    }
}

const NO_PARENT: usize = usize::MAX;

/// Reusable path search with its own scratch space
///
/// Visited tiles are tracked with a stamp per tile: bumping the search stamp
/// forgets every previous search at once, and the array is only wiped when
/// the stamp wraps. Each `Pathfinder` owns its stamps, so searches on
/// different threads need separate instances and never interfere.
///
/// # Example
///
/// ```rust
/// use geodesic_isles::*;
///
/// let sphere = SphereMesh::generate(3, 100.0).unwrap();
/// let graph = TileGraph::from_mesh(&sphere);
/// let mut pathfinder = Pathfinder::new(graph.tile_count(), SearchLimits::default());
///
/// let everything_open = |_: usize| true;
/// let search = pathfinder.find_path(&graph, 0, 100, &everything_open).unwrap();
/// let path = search.into_path().unwrap();
/// assert_eq!(path.end_tile(&graph, 0).unwrap(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct Pathfinder {
    limits: SearchLimits,
    stamp: u32,
    stamps: Vec<u32>,
    parents: Vec<usize>,
    nodes: Vec<SearchNode>,
}

impl Pathfinder {
    /// Create a pathfinder sized for a world
    pub fn new(tile_count: usize, limits: SearchLimits) -> Self {
        Self {
            limits,
            stamp: 0,
            stamps: vec![0; tile_count],
            parents: vec![NO_PARENT; tile_count],
            nodes: Vec::with_capacity(limits.search_breadth),
        }
    }

    #[inline]
    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// Search for a route from `start` to `target`
    ///
    /// If the target cannot be entered (land or occupied), the search aims
    /// for any tile next to it instead.
    ///
    /// # Errors
    ///
    /// Returns `TileOutOfRange` if either tile is not in the graph. Every
    /// other outcome is a `PathSearch` value.
    pub fn find_path<O: Occupancy + ?Sized>(
        &mut self,
        graph: &TileGraph,
        start: usize,
        target: usize,
        occupancy: &O,
    ) -> Result<PathSearch> {
        graph.try_tile(start)?;
        let target_tile = graph.try_tile(target)?;
        if start == target {
            return Ok(PathSearch::Found(Path::new()));
        }

        let tiles = graph.tiles();
        let target_next = !(target_tile.is_water() && occupancy.is_open(target));
        let stamp = self.next_stamp(tiles.len());

        self.nodes.clear();
        self.stamps[start] = stamp;
        self.parents[start] = NO_PARENT;
        self.nodes.push(SearchNode {
            tile: start,
            dist: tiles[start].distance_to(target_tile),
            moves: 0,
        });

        let end = 'search: loop {
            let Some(closest) = closest_node(&self.nodes) else {
                return Ok(PathSearch::Unreachable);
            };
            let node = self.nodes.remove(closest);

            for &next in &tiles[node.tile].neighbors {
                if self.nodes.len() >= self.limits.search_breadth {
                    warn!(
                        "path search from {} to {} ran out of space ({} nodes)",
                        start, target, self.limits.search_breadth
                    );
                    return Ok(PathSearch::CapacityExhausted);
                }

                if target_next && next == target {
                    break 'search node.tile;
                }

                if self.stamps[next] == stamp || !expandable(&tiles[next], occupancy) {
                    continue;
                }
                self.stamps[next] = stamp;
                self.parents[next] = node.tile;

                if next == target {
                    break 'search next;
                }

                self.nodes.push(SearchNode {
                    tile: next,
                    dist: tiles[next].distance_to(target_tile),
                    moves: node.moves + 1,
                });
            }
        };

        let steps = self.trace_back(tiles, end)?;
        if steps.len() > self.limits.max_path_len {
            warn!(
                "path from {} to {} is too long ({} steps, limit {})",
                start,
                target,
                steps.len(),
                self.limits.max_path_len
            );
            return Ok(PathSearch::TooLong(steps.len()));
        }
        Ok(PathSearch::Found(Path::from_steps(steps)))
    }

    /// Advance to a fresh stamp, resizing or wiping the scratch when needed
    fn next_stamp(&mut self, tile_count: usize) -> u32 {
        if self.stamps.len() != tile_count {
            self.stamps = vec![0; tile_count];
            self.parents = vec![NO_PARENT; tile_count];
            self.stamp = 0;
        }
        if self.stamp == u32::MAX {
            self.stamps.fill(0);
            self.stamp = 0;
        }
        self.stamp += 1;
        self.stamp
    }

    /// Slot steps from the start to `end`, following parent links
    fn trace_back(&self, tiles: &[Tile], end: usize) -> Result<Vec<u8>> {
        let mut steps = Vec::new();
        let mut tile = end;
        while self.parents[tile] != NO_PARENT {
            let parent = self.parents[tile];
            let slot = tiles[parent].neighbor_slot(tile).ok_or_else(|| {
                let message = format!("tile {} is not a neighbour of {}", tile, parent);
                error!("{}", message);
                WorldError::MeshInvariant(message)
            })?;
            steps.push(slot as u8 + 1);
            tile = parent;
        }
        steps.reverse();
        Ok(steps)
    }
}

/// Index of the node with the lowest score; the earliest wins ties
fn closest_node(nodes: &[SearchNode]) -> Option<usize> {
    if nodes.is_empty() {
        return None;
    }
    let mut closest = 0;
    for i in 1..nodes.len() {
        if nodes[i].score() < nodes[closest].score() {
            closest = i;
        }
    }
    Some(closest)
}

#[inline]
fn expandable<O: Occupancy + ?Sized>(tile: &Tile, occupancy: &O) -> bool {
    tile.is_water() && (occupancy.is_open(tile.id) || occupancy.is_vacating(tile.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::SphereMesh;
    use crate::terrain::Terrain;

    fn ocean(level: u32) -> TileGraph {
        TileGraph::from_mesh(&SphereMesh::generate(level, 100.0).unwrap())
    }

    fn open(_: usize) -> bool {
        true
    }

    /// Tile farthest from `from` by straight-line distance
    fn antipode(graph: &TileGraph, from: usize) -> usize {
        let origin = graph.tile(from).unwrap();
        graph
            .tiles()
            .iter()
            .max_by(|a, b| {
                origin
                    .distance_to(a)
                    .partial_cmp(&origin.distance_to(b))
                    .unwrap()
            })
            .unwrap()
            .id
    }

    #[test]
    fn test_path_reaches_target() {
        let graph = ocean(3);
        let mut pathfinder = Pathfinder::new(graph.tile_count(), SearchLimits::default());
        let target = antipode(&graph, 0);

        let path = pathfinder
            .find_path(&graph, 0, target, &open)
            .unwrap()
            .into_path()
            .unwrap();

        assert!(!path.is_empty());
        assert!(path.len() <= 64);
        assert!(path.slots().iter().all(|s| (1..=3).contains(s)));
        assert_eq!(path.end_tile(&graph, 0).unwrap(), target);
    }

    #[test]
    fn test_neighbor_is_one_step() {
        let graph = ocean(2);
        let mut pathfinder = Pathfinder::new(graph.tile_count(), SearchLimits::default());
        let neighbor = graph.neighbors(7)[2];

        let search = pathfinder.find_path(&graph, 7, neighbor, &open).unwrap();
        assert_eq!(search, PathSearch::Found(Path::from_slots(&[3]).unwrap()));
    }

    #[test]
    fn test_same_tile_is_empty_path() {
        let graph = ocean(2);
        let mut pathfinder = Pathfinder::new(graph.tile_count(), SearchLimits::default());
        let search = pathfinder.find_path(&graph, 4, 4, &open).unwrap();
        assert_eq!(search, PathSearch::Found(Path::new()));
    }

    #[test]
    fn test_out_of_range() {
        let graph = ocean(1);
        let mut pathfinder = Pathfinder::new(graph.tile_count(), SearchLimits::default());
        assert!(matches!(
            pathfinder.find_path(&graph, 0, 16, &open),
            Err(WorldError::TileOutOfRange { tile: 16, .. })
        ));
        assert!(pathfinder.find_path(&graph, 99, 0, &open).is_err());
    }

    #[test]
    fn test_blocked_target_stops_alongside() {
        let graph = ocean(3);
        let mut pathfinder = Pathfinder::new(graph.tile_count(), SearchLimits::default());
        let target = antipode(&graph, 0);
        let occupied = move |tile: usize| tile != target;

        let path = pathfinder
            .find_path(&graph, 0, target, &occupied)
            .unwrap()
            .into_path()
            .unwrap();

        let end = path.end_tile(&graph, 0).unwrap();
        assert!(graph.tile(end).unwrap().is_neighbor_of(target));
        assert!(!path.walk(&graph, 0).unwrap().contains(&target));
    }

    #[test]
    fn test_land_target_stops_alongside() {
        let mut graph = ocean(3);
        let target = antipode(&graph, 0);
        graph.tiles_mut()[target].terrain = Terrain::Sand;
        let mut pathfinder = Pathfinder::new(graph.tile_count(), SearchLimits::default());

        let path = pathfinder
            .find_path(&graph, 0, target, &open)
            .unwrap()
            .into_path()
            .unwrap();
        let end = path.end_tile(&graph, 0).unwrap();
        assert!(graph.neighbors(target).contains(&end));
    }

    #[test]
    fn test_walled_target_is_unreachable() {
        let mut graph = ocean(3);
        let target = antipode(&graph, 0);
        for n in graph.neighbors(target).to_vec() {
            graph.tiles_mut()[n].terrain = Terrain::Ground(Default::default());
        }
        let mut pathfinder = Pathfinder::new(graph.tile_count(), SearchLimits::new(256));

        let search = pathfinder.find_path(&graph, 0, target, &open).unwrap();
        assert_eq!(search, PathSearch::Unreachable);
    }

    #[test]
    fn test_route_avoids_closed_tiles() {
        let graph = ocean(3);
        let limits = SearchLimits {
            max_path_len: 64,
            search_breadth: 1024,
        };
        let mut pathfinder = Pathfinder::new(graph.tile_count(), limits);
        let target = antipode(&graph, 0);

        // Close the ring two hops out, except one gap that still leads outward
        let ball = graph.tiles_within_hops(target, 2);
        let ring = &ball[4..];
        let gap = ring
            .iter()
            .copied()
            .find(|&t| graph.neighbors(t).iter().any(|n| !ball.contains(n)))
            .unwrap();
        let closed: Vec<usize> = ring.iter().copied().filter(|&t| t != gap).collect();
        assert!(!closed.is_empty());
        let occupancy = |tile: usize| !closed.contains(&tile);

        let search = pathfinder.find_path(&graph, 0, target, &occupancy).unwrap();
        let path = search.into_path().expect("the gap leaves a route open");

        let tiles = path.walk(&graph, 0).unwrap();
        for &tile in &tiles {
            assert!(occupancy(tile));
        }
        assert!(tiles.contains(&gap));
        assert_eq!(tiles.last(), Some(&target));
    }

    #[test]
    fn test_vacating_tiles_are_passable() {
        struct Leaving(usize);
        impl Occupancy for Leaving {
            fn is_open(&self, tile: usize) -> bool {
                tile != self.0
            }
            fn is_vacating(&self, tile: usize) -> bool {
                tile == self.0
            }
        }

        let graph = ocean(2);
        let mut pathfinder = Pathfinder::new(graph.tile_count(), SearchLimits::default());
        let [a, b, c] = graph.tile(0).unwrap().neighbors;
        let target = graph
            .neighbors(a)
            .iter()
            .copied()
            .find(|&t| t != 0 && t != b && t != c)
            .unwrap();

        // Only the route through `a` is free of other walls
        let walls = |tile: usize| tile == b || tile == c;
        struct Combined<'a, F: Fn(usize) -> bool>(&'a F, Leaving);
        impl<F: Fn(usize) -> bool> Occupancy for Combined<'_, F> {
            fn is_open(&self, tile: usize) -> bool {
                !(self.0)(tile) && self.1.is_open(tile)
            }
            fn is_vacating(&self, tile: usize) -> bool {
                self.1.is_vacating(tile)
            }
        }

        let search = pathfinder
            .find_path(&graph, 0, target, &Combined(&walls, Leaving(a)))
            .unwrap();
        let path = search.into_path().unwrap();
        assert_eq!(path.walk(&graph, 0).unwrap(), vec![a, target]);
    }

    #[test]
    fn test_small_breadth_exhausts() {
        let graph = ocean(4);
        let mut pathfinder = Pathfinder::new(graph.tile_count(), SearchLimits {
            max_path_len: 64,
            search_breadth: 2,
        });
        let target = antipode(&graph, 0);
        let search = pathfinder.find_path(&graph, 0, target, &open).unwrap();
        assert_eq!(search, PathSearch::CapacityExhausted);
    }

    #[test]
    fn test_long_route_reported() {
        let graph = ocean(4);
        let mut pathfinder = Pathfinder::new(graph.tile_count(), SearchLimits {
            max_path_len: 3,
            search_breadth: 512,
        });
        let target = antipode(&graph, 0);
        match pathfinder.find_path(&graph, 0, target, &open).unwrap() {
            PathSearch::TooLong(len) => assert!(len > 3),
            other => panic!("expected TooLong, got {:?}", other),
        }
    }

    #[test]
    fn test_repeated_searches_agree() {
        let graph = ocean(3);
        let mut pathfinder = Pathfinder::new(graph.tile_count(), SearchLimits::default());
        let target = antipode(&graph, 10);

        let first = pathfinder.find_path(&graph, 10, target, &open).unwrap();
        for _ in 0..5 {
            assert_eq!(pathfinder.find_path(&graph, 10, target, &open).unwrap(), first);
        }

        // Scratch wipes cleanly when the stamp wraps
        pathfinder.stamp = u32::MAX - 1;
        assert_eq!(pathfinder.find_path(&graph, 10, target, &open).unwrap(), first);
        assert_eq!(pathfinder.find_path(&graph, 10, target, &open).unwrap(), first);
        assert_eq!(pathfinder.stamp, 1);
    }

    #[test]
    fn test_separate_pathfinders_do_not_share_state() {
        let graph = ocean(3);
        let mut a = Pathfinder::new(graph.tile_count(), SearchLimits::default());
        let mut b = Pathfinder::new(graph.tile_count(), SearchLimits::default());

        let first = a.find_path(&graph, 0, 200, &open).unwrap();
        b.find_path(&graph, 50, 120, &open).unwrap();
        assert_eq!(a.find_path(&graph, 0, 200, &open).unwrap(), first);
    }
}

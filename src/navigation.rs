//! Agent navigation: tile occupancy and routes
//!
//! A moving agent holds two tiles at once: the one it is entering and the
//! rear tile it is leaving. Other agents may plan through a rear tile
//! (it is vacating) and wait for it rather than replanning around it.

use std::collections::BTreeMap;

use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldError};
use crate::graph::TileGraph;
use crate::pathfinding::{step_target, Occupancy, Path, PathSearch, Pathfinder};

/// Identifier of a ship or other agent
pub type AgentId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Berth {
    tile: usize,
    rear: Option<usize>,
}

/// Which agent sits on which tile
///
/// As an `Occupancy` it answers for a neutral observer: a tile is open only
/// when nobody is on it. Use [`TileOccupancy::view`] to plan for a specific
/// agent.
#[derive(Debug, Clone, Default)]
pub struct TileOccupancy {
    occupants: Vec<Option<AgentId>>,
    berths: BTreeMap<AgentId, Berth>,
}

impl TileOccupancy {
    /// Empty occupancy for a world
    pub fn new(tile_count: usize) -> Self {
        Self {
            occupants: vec![None; tile_count],
            berths: BTreeMap::new(),
        }
    }

    fn check(&self, tile: usize) -> Result<()> {
        if tile < self.occupants.len() {
            Ok(())
        } else {
            Err(WorldError::TileOutOfRange {
                tile,
                tile_count: self.occupants.len(),
            })
        }
    }

    /// Put an agent on a tile
    ///
    /// Returns `false` if the tile is taken or the agent is already placed.
    pub fn place(&mut self, agent: AgentId, tile: usize) -> Result<bool> {
        self.check(tile)?;
        if self.occupants[tile].is_some() || self.berths.contains_key(&agent) {
            return Ok(false);
        }
        self.occupants[tile] = Some(agent);
        self.berths.insert(agent, Berth { tile, rear: None });
        Ok(true)
    }

    /// Take an agent off the globe, releasing both of its tiles
    pub fn remove(&mut self, agent: AgentId) -> bool {
        let Some(berth) = self.berths.remove(&agent) else {
            return false;
        };
        self.release(agent, berth.tile);
        if let Some(rear) = berth.rear {
            self.release(agent, rear);
        }
        true
    }

    fn release(&mut self, agent: AgentId, tile: usize) {
        if self.occupants[tile] == Some(agent) {
            self.occupants[tile] = None;
        }
    }

    /// Agent on a tile, if any
    pub fn occupant(&self, tile: usize) -> Option<AgentId> {
        self.occupants.get(tile).copied().flatten()
    }

    /// Tile an agent is on (or entering)
    pub fn tile_of(&self, agent: AgentId) -> Option<usize> {
        self.berths.get(&agent).map(|b| b.tile)
    }

    /// Tile an agent is leaving, while it moves
    pub fn rear_tile(&self, agent: AgentId) -> Option<usize> {
        self.berths.get(&agent).and_then(|b| b.rear)
    }

    /// Start moving an agent onto `to`
    ///
    /// The agent keeps its current tile as its rear tile until
    /// [`finish_move`](Self::finish_move) or its next move. Returns `false`
    /// if the agent is unknown or `to` belongs to someone else.
    pub fn begin_move(&mut self, agent: AgentId, to: usize) -> Result<bool> {
        self.check(to)?;
        let Some(berth) = self.berths.get(&agent).copied() else {
            return Ok(false);
        };
        if to == berth.tile || self.occupants[to].is_some_and(|other| other != agent) {
            return Ok(false);
        }

        if let Some(rear) = berth.rear {
            self.release(agent, rear);
        }
        self.occupants[to] = Some(agent);
        self.berths.insert(
            agent,
            Berth {
                tile: to,
                rear: Some(berth.tile),
            },
        );
        Ok(true)
    }

    /// Stop an agent, releasing its rear tile
    pub fn finish_move(&mut self, agent: AgentId) {
        if let Some(berth) = self.berths.get_mut(&agent) {
            if let Some(rear) = berth.rear.take() {
                if self.occupants[rear] == Some(agent) {
                    self.occupants[rear] = None;
                }
            }
        }
    }

    /// Whether the agent on `tile` is moving off it
    pub fn is_leaving(&self, tile: usize) -> bool {
        self.occupant(tile)
            .and_then(|agent| self.berths.get(&agent))
            .is_some_and(|b| b.rear == Some(tile) && b.tile != tile)
    }

    /// Occupancy as seen by one agent: its own tiles count as open
    pub fn view(&self, agent: AgentId) -> AgentView<'_> {
        AgentView {
            occupancy: self,
            agent,
        }
    }
}

impl Occupancy for TileOccupancy {
    fn is_open(&self, tile: usize) -> bool {
        self.occupant(tile).is_none()
    }

    fn is_vacating(&self, tile: usize) -> bool {
        self.is_leaving(tile)
    }
}

/// A [`TileOccupancy`] from one agent's point of view
#[derive(Debug, Clone, Copy)]
pub struct AgentView<'a> {
    occupancy: &'a TileOccupancy,
    agent: AgentId,
}

impl Occupancy for AgentView<'_> {
    fn is_open(&self, tile: usize) -> bool {
        self.occupancy
            .occupant(tile)
            .map_or(true, |other| other == self.agent)
    }

    fn is_vacating(&self, tile: usize) -> bool {
        self.occupancy.is_leaving(tile)
    }
}

/// What [`Route::replan`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Already on the target; the path was cleared
    Arrived,
    /// A new path to the target was adopted
    Planned,
    /// The search hit a limit; the previous path and target still stand
    Kept,
    /// The target is cut off; heading to the farthest open tile of the old path
    Fallback { toward: usize },
    /// The target is cut off and no part of the old path is usable
    Stranded,
}

/// What [`Route::step`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Entered this tile
    Moved(usize),
    /// The next tile is being vacated; try again later
    Waiting,
    /// The next tile is closed; the path was cleared
    Blocked,
    /// Nothing left to follow
    Arrived,
}

/// An agent's navigation state
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Tile the agent is on
    pub tile: usize,
    /// Tile the current path leads to (equal to `tile` when idle)
    pub target: usize,
    /// Remaining steps
    pub path: Path,
}

impl Route {
    /// Idle route on a tile
    pub fn new(tile: usize) -> Self {
        Self {
            tile,
            target: tile,
            path: Path::new(),
        }
    }

    /// Plan toward `target`
    ///
    /// If the target cannot be reached, the agent heads as far along its
    /// previous path as is still open, or stops if none of it is.
    ///
    /// # Errors
    ///
    /// Returns `TileOutOfRange` if `target` or the route's tile is not in the
    /// graph.
    pub fn replan<O: Occupancy + ?Sized>(
        &mut self,
        graph: &TileGraph,
        pathfinder: &mut Pathfinder,
        target: usize,
        occupancy: &O,
    ) -> Result<RouteOutcome> {
        graph.try_tile(target)?;
        if target == self.tile {
            self.path.clear();
            self.target = self.tile;
            return Ok(RouteOutcome::Arrived);
        }

        match pathfinder.find_path(graph, self.tile, target, occupancy)? {
            PathSearch::Found(path) => {
                self.path = path;
                self.target = target;
                Ok(RouteOutcome::Planned)
            }
            PathSearch::CapacityExhausted | PathSearch::TooLong(_) => Ok(RouteOutcome::Kept),
            PathSearch::Unreachable => {
                let toward = self.farthest_open_tile(graph, occupancy)?;
                if toward == target || toward == self.tile {
                    debug!("no route from {} to {}, stopping", self.tile, target);
                    self.path.clear();
                    self.target = self.tile;
                    return Ok(RouteOutcome::Stranded);
                }

                debug!(
                    "no route from {} to {}, falling back to {}",
                    self.tile, target, toward
                );
                match self.replan(graph, pathfinder, toward, occupancy)? {
                    RouteOutcome::Planned => Ok(RouteOutcome::Fallback { toward }),
                    other => Ok(other),
                }
            }
        }
    }

    /// Farthest tile along the current path reachable through open sea
    ///
    /// Returns the route's own tile when the first step is already closed or
    /// the path is empty.
    pub fn farthest_open_tile<O: Occupancy + ?Sized>(
        &self,
        graph: &TileGraph,
        occupancy: &O,
    ) -> Result<usize> {
        let mut tile = self.tile;
        for &step in self.path.slots() {
            let next = step_target(&graph.try_tile(tile)?.neighbors, step)?;
            let next_tile = graph.try_tile(next)?;
            if !(next_tile.is_water() && occupancy.is_open(next)) {
                break;
            }
            tile = next;
        }
        Ok(tile)
    }

    /// Tile the next step leads to
    pub fn next_tile(&self, graph: &TileGraph) -> Option<usize> {
        let step = self.path.first()?;
        let tile = graph.tile(self.tile)?;
        step_target(&tile.neighbors, step).ok()
    }

    /// Take one step along the path
    ///
    /// The caller keeps its occupancy in sync (for example with
    /// [`TileOccupancy::begin_move`] after `Moved`).
    pub fn step<O: Occupancy + ?Sized>(&mut self, graph: &TileGraph, occupancy: &O) -> StepOutcome {
        let Some(next) = self.next_tile(graph) else {
            return StepOutcome::Arrived;
        };

        let water = graph.tile(next).is_some_and(|t| t.is_water());
        if water && occupancy.is_open(next) {
            self.path.advance();
            self.tile = next;
            StepOutcome::Moved(next)
        } else if water && occupancy.is_vacating(next) {
            StepOutcome::Waiting
        } else {
            self.path.clear();
            StepOutcome::Blocked
        }
    }
}

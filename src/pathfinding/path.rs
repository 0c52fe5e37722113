//! Slot-encoded paths
//!
//! A path is stored as the neighbour slot taken at each step rather than as
//! tile ids. Each step fits in a byte, and the route only means something
//! relative to its start tile, which every peer already knows.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldError};
use crate::graph::TileGraph;

/// Terminator byte of the wire form
const END: u8 = 0;

/// Bounded route as a sequence of neighbour slots
///
/// Step value `k` (1 to 3) means "move to neighbour slot `k - 1` of the
/// current tile".
///
/// # Example
///
/// ```rust
/// use geodesic_isles::Path;
///
/// let path = Path::from_slots(&[1, 3, 2]).unwrap();
/// assert_eq!(path.encode(), vec![1, 3, 2, 0]);
/// assert_eq!(Path::decode(&path.encode(), 64).unwrap(), path);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "Vec<u8>", into = "Vec<u8>")
)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    steps: Vec<u8>,
}

impl Path {
    /// Empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Path from raw slot numbers
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if any step is outside `1..=3`
    pub fn from_slots(slots: &[u8]) -> Result<Self> {
        if let Some(bad) = slots.iter().find(|&&s| !(1..=3).contains(&s)) {
            return Err(WorldError::InvalidPath(format!(
                "slot {} is not a neighbour slot",
                bad
            )));
        }
        Ok(Self {
            steps: slots.to_vec(),
        })
    }

    pub(crate) fn from_steps(steps: Vec<u8>) -> Self {
        Self { steps }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Remaining steps
    #[inline]
    pub fn slots(&self) -> &[u8] {
        &self.steps
    }

    /// Next step, if any
    #[inline]
    pub fn first(&self) -> Option<u8> {
        self.steps.first().copied()
    }

    /// Consume the next step
    pub fn advance(&mut self) -> Option<u8> {
        if self.steps.is_empty() {
            None
        } else {
            Some(self.steps.remove(0))
        }
    }

    /// Tiles entered when following the path from `start`
    ///
    /// The start tile itself is not included.
    ///
    /// # Errors
    ///
    /// Returns `TileOutOfRange` if `start` is not a tile
    pub fn walk(&self, graph: &TileGraph, start: usize) -> Result<Vec<usize>> {
        let mut tile = graph.try_tile(start)?;
        let mut visited = Vec::with_capacity(self.steps.len());
        for &step in &self.steps {
            let next = step_target(&tile.neighbors, step)?;
            visited.push(next);
            tile = graph.try_tile(next)?;
        }
        Ok(visited)
    }

    /// Tile the path ends on when followed from `start`
    pub fn end_tile(&self, graph: &TileGraph, start: usize) -> Result<usize> {
        Ok(self.walk(graph, start)?.last().copied().unwrap_or(start))
    }

    /// Wire form: the slots followed by a terminating zero
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.steps.len() + 1);
        bytes.extend_from_slice(&self.steps);
        bytes.push(END);
        bytes
    }

    /// Parse the wire form
    ///
    /// Reading stops at the first zero byte or the end of input.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` for a slot above 3 or a path longer than `max_len`
    pub fn decode(bytes: &[u8], max_len: usize) -> Result<Self> {
        let steps: Vec<u8> = bytes.iter().copied().take_while(|&b| b != END).collect();
        if steps.len() > max_len {
            return Err(WorldError::InvalidPath(format!(
                "{} steps exceed the limit of {}",
                steps.len(),
                max_len
            )));
        }
        Self::from_slots(&steps)
    }
}

/// Neighbour a step leads to
pub(crate) fn step_target(neighbors: &[usize; 3], step: u8) -> Result<usize> {
    (step as usize)
        .checked_sub(1)
        .and_then(|slot| neighbors.get(slot).copied())
        .ok_or_else(|| {
            WorldError::InvalidPath(format!("slot {} is not a neighbour slot", step))
        })
}

/// Deserialized paths go through the same slot check as [`Path::from_slots`]
impl TryFrom<Vec<u8>> for Path {
    type Error = WorldError;

    fn try_from(steps: Vec<u8>) -> Result<Self> {
        Path::from_slots(&steps)
    }
}

impl From<Path> for Vec<u8> {
    fn from(path: Path) -> Self {
        path.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::SphereMesh;

    #[test]
    fn test_from_slots_validates() {
        assert!(Path::from_slots(&[1, 2, 3]).is_ok());
        assert!(Path::from_slots(&[]).unwrap().is_empty());
        assert!(matches!(
            Path::from_slots(&[1, 4]),
            Err(WorldError::InvalidPath(_))
        ));
        assert!(Path::from_slots(&[0]).is_err());
    }

    #[test]
    fn test_advance_consumes_front() {
        let mut path = Path::from_slots(&[2, 1, 3]).unwrap();
        assert_eq!(path.first(), Some(2));
        assert_eq!(path.advance(), Some(2));
        assert_eq!(path.slots(), &[1, 3]);
        path.clear();
        assert_eq!(path.advance(), None);
        assert_eq!(path.first(), None);
    }

    #[test]
    fn test_decode() {
        let path = Path::decode(&[3, 3, 1, 0, 2, 2], 8).unwrap();
        assert_eq!(path.slots(), &[3, 3, 1]);

        // Missing terminator reads to the end
        assert_eq!(Path::decode(&[1, 2], 8).unwrap().len(), 2);
        assert!(Path::decode(&[0], 8).unwrap().is_empty());

        assert!(Path::decode(&[1, 2, 9, 0], 8).is_err());
        assert!(Path::decode(&[1, 1, 1, 0], 2).is_err());
    }

    #[test]
    fn test_walk_follows_slots() {
        let sphere = SphereMesh::generate(2, 1.0).unwrap();
        let graph = TileGraph::from_mesh(&sphere);

        let path = Path::from_slots(&[1, 2, 3, 1]).unwrap();
        let tiles = path.walk(&graph, 0).unwrap();

        let mut expected = Vec::new();
        let mut tile = 0;
        for slot in [1usize, 2, 3, 1] {
            tile = graph.neighbors(tile)[slot - 1];
            expected.push(tile);
        }
        assert_eq!(tiles, expected);
        assert_eq!(path.end_tile(&graph, 0).unwrap(), tile);
        assert_eq!(Path::new().end_tile(&graph, 5).unwrap(), 5);
        assert!(path.walk(&graph, 1000).is_err());
    }

    #[test]
    fn test_step_target_rejects_bad_slots() {
        let neighbors = [7, 8, 9];
        assert_eq!(step_target(&neighbors, 1).unwrap(), 7);
        assert_eq!(step_target(&neighbors, 3).unwrap(), 9);
        assert!(matches!(step_target(&neighbors, 0), Err(WorldError::InvalidPath(_))));
        assert!(step_target(&neighbors, 4).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_checks_slots() {
        let path = Path::from_slots(&[1, 3, 2]).unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "[1,3,2]");
        assert_eq!(serde_json::from_str::<Path>(&json).unwrap(), path);

        assert!(serde_json::from_str::<Path>("[0]").is_err());
        assert!(serde_json::from_str::<Path>("[1,7]").is_err());
        assert!(serde_json::from_str::<Path>("[]").unwrap().is_empty());
    }
}

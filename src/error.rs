//! Error types for world generation and navigation

use thiserror::Error;

/// Errors that can occur during world generation or tile queries
///
/// Only genuine failures live here. Outcomes such as "fewer islands than
/// requested" or "no route to target" are ordinary values
/// ([`IslandReport`](crate::IslandReport), [`PathSearch`](crate::PathSearch)).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The geodesic mesh broke one of its structural invariants
    ///
    /// This is a generation bug, not a runtime condition. A peer that hits it
    /// can no longer reproduce the shared world and must not continue.
    #[error("mesh invariant violated: {0}")]
    MeshInvariant(String),

    /// A tile index outside the world was passed in
    #[error("tile {tile} out of range (world has {tile_count} tiles)")]
    TileOutOfRange {
        /// Offending tile index
        tile: usize,
        /// Number of tiles in the world
        tile_count: usize,
    },

    /// A slot-encoded path received from elsewhere is malformed
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

/// Result type alias for world operations
pub type Result<T> = std::result::Result<T, WorldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = WorldError::TileOutOfRange {
            tile: 300,
            tile_count: 256,
        };
        assert_eq!(err.to_string(), "tile 300 out of range (world has 256 tiles)");

        let err = WorldError::InvalidConfig("radius must be positive".into());
        assert_eq!(err.to_string(), "invalid configuration: radius must be positive");
    }
}

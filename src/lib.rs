//! Deterministic geodesic island worlds
//!
//! Builds a triangle-tiled globe by subdividing a tetrahedron, grows seeded
//! islands on it and routes ships across the sea tiles. Every peer that
//! generates a world from the same configuration gets the same tiles,
//! islands and paths, so only the seed has to cross the network.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use geodesic_isles::*;
//!
//! // Generate a world
//! let config = WorldConfigBuilder::new()
//!     .seed(42)
//!     .subdivisions(4).unwrap()
//!     .build().unwrap();
//!
//! let world = World::generate(config).unwrap();
//!
//! // Plan a ship route between two open sea tiles
//! let mut pathfinder = Pathfinder::new(world.tile_count(), SearchLimits::default());
//! let mut occupancy = TileOccupancy::new(world.tile_count());
//! let mut rng = WorldRng::new(7);
//!
//! let start = world.graph().random_open_tile(&mut rng, &occupancy).unwrap();
//! occupancy.place(1, start).unwrap();
//! let goal = world.graph().random_open_tile(&mut rng, &occupancy).unwrap();
//!
//! let mut route = Route::new(start);
//! let outcome = route
//!     .replan(world.graph(), &mut pathfinder, goal, &occupancy.view(1))
//!     .unwrap();
//! println!("{:?}, {} steps", outcome, route.path.len());
//!
//! // Generate mesh for rendering
//! let mesh = generate_mesh(&world, &BasicColorMapper);
//! println!("Generated {} triangles", mesh.triangle_count());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-tile lookups using KD-tree
//! - `serde`: Enables serialization support for configuration, tiles and paths

// Modules
pub mod error;
pub mod config;
pub mod prng;
pub mod sphere;
pub mod tile;
pub mod terrain;
pub mod graph;
pub mod world;
pub mod pathfinding;
pub mod navigation;
pub mod mesh;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{WorldError, Result};
pub use config::{
    WorldConfig, WorldConfigBuilder, SearchLimits, MAX_SUBDIVISIONS, ISLAND_MAX, DEFAULT_RADIUS,
};
pub use prng::WorldRng;
pub use sphere::{SphereMesh, VertexNeighbors};
pub use tile::Tile;
pub use terrain::{Terrain, Climate, Island, IslandParams, IslandReport, TerrainGenerator};
pub use graph::TileGraph;
pub use world::World;
pub use pathfinding::{Path, Pathfinder, PathSearch, Occupancy, SearchNode};
pub use navigation::{AgentId, AgentView, TileOccupancy, Route, RouteOutcome, StepOutcome};
pub use mesh::{
    MeshData, generate_mesh, generate_mesh_with_visibility, ColorMapper, BasicColorMapper,
    CustomColorMapper, TerrainColor,
};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::Vec3 for convenience
pub use glam::Vec3;

//! World: the full generation pipeline
//!
//! `SphereMesh` → `TileGraph` → `TerrainGenerator`. Nothing downstream
//! mutates upstream data, and the finished world is read-only.

use log::info;

use crate::config::WorldConfig;
use crate::error::Result;
use crate::graph::TileGraph;
use crate::prng::WorldRng;
use crate::sphere::SphereMesh;
use crate::terrain::{Island, IslandParams, IslandReport, TerrainGenerator};

/// A generated island world
///
/// Every peer that calls [`World::generate`] with the same `WorldConfig`
/// gets a bit-identical world.
///
/// # Examples
///
/// ```
/// use geodesic_isles::*;
///
/// let config = WorldConfigBuilder::new()
///     .seed(42)
///     .subdivisions(3)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let world = World::generate(config).unwrap();
/// assert_eq!(world.tile_count(), 256);
///
/// for island in world.islands() {
///     println!("island at tile {} with {} land tiles", island.root, island.land);
/// }
/// ```
#[derive(Clone)]
pub struct World {
    /// Configuration used to generate this world
    config: WorldConfig,

    sphere: SphereMesh,

    /// Tiles with terrain applied
    graph: TileGraph,

    islands: Vec<Island>,

    report: IslandReport,
}

impl World {
    /// Run the whole generation pipeline
    ///
    /// # Errors
    ///
    /// * `InvalidConfig` if the configuration is out of range
    /// * `MeshInvariant` if sphere construction fails; the world cannot be
    ///   reproduced and the caller must not continue
    pub fn generate(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        let sphere = SphereMesh::generate(config.subdivisions, config.radius)?;
        let mut graph = TileGraph::from_mesh(&sphere);

        let mut rng = WorldRng::new(config.seed);
        let generator = TerrainGenerator::new(IslandParams::from_config(&config), config.radius);
        let (islands, report) = generator.generate(graph.tiles_mut(), &mut rng);

        info!(
            "generated world: seed {}, level {}, {} tiles, {} vertices, {} of {} islands kept",
            config.seed,
            config.subdivisions,
            sphere.tile_count(),
            sphere.vertex_count(),
            report.kept,
            report.requested
        );

        Ok(Self {
            config,
            sphere,
            graph,
            islands,
            report,
        })
    }

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The underlying sphere mesh
    #[inline]
    pub fn sphere(&self) -> &SphereMesh {
        &self.sphere
    }

    /// Tiles and adjacency, with terrain
    #[inline]
    pub fn graph(&self) -> &TileGraph {
        &self.graph
    }

    #[inline]
    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    /// Get an island by ID
    ///
    /// Returns `None` if the island ID is out of bounds.
    #[inline]
    pub fn island(&self, id: usize) -> Option<&Island> {
        self.islands.get(id)
    }

    /// How island generation went
    #[inline]
    pub fn report(&self) -> &IslandReport {
        &self.report
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.config.radius
    }

    #[inline]
    pub fn tile_count(&self) -> usize {
        self.graph.tile_count()
    }
}

//! Geodesic sphere mesh
//!
//! Builds a sphere by repeatedly subdividing a regular tetrahedron and
//! projecting the result onto a radius. Every step iterates in index order,
//! so the same level produces the same vertex and face numbering on every
//! platform.
//!
//! # Algorithm
//!
//! 1. Start from a tetrahedron with four outward-facing triangles
//! 2. Split each edge at its midpoint and each triangle into four children
//! 3. Repeat for the requested number of levels
//! 4. Project every vertex onto the sphere
//! 5. Derive vertex and face adjacency from the final edge list
//!
//! A level `L` mesh has `4 · 4^L` triangles, `6 · 4^L` edges and
//! `2 · 4^L + 2` vertices.

mod subdivide;

use glam::Vec3;
use log::error;

use crate::config::MAX_SUBDIVISIONS;
use crate::error::{Result, WorldError};
use subdivide::Subdivision;

/// Most neighbours a vertex can have on a geodesic sphere
pub const VERTEX_NEIGHBORS_MAX: usize = 6;

/// Fixed-capacity set of a vertex's neighbours
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexNeighbors {
    ids: [u32; VERTEX_NEIGHBORS_MAX],
    len: u8,
}

impl VertexNeighbors {
    fn push(&mut self, vertex: u32) -> bool {
        let len = self.len as usize;
        if len == VERTEX_NEIGHBORS_MAX {
            return false;
        }
        self.ids[len] = vertex;
        self.len += 1;
        true
    }

    /// Neighbour vertex ids in the order their edges were built
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.ids[..self.len as usize]
    }

    /// Number of neighbours (3 for the four tetrahedron corners, 6 elsewhere)
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `vertex` is adjacent
    pub fn contains(&self, vertex: u32) -> bool {
        self.as_slice().contains(&vertex)
    }
}

/// Immutable geodesic sphere
///
/// Triangles double as the world's tiles: triangle `t` is tile `t`. Neighbour
/// slot `k` of a tile is the tile across its edge (corner k, corner k+1).
///
/// # Example
///
/// ```rust
/// use geodesic_isles::SphereMesh;
///
/// let sphere = SphereMesh::generate(3, 100.0).unwrap();
/// assert_eq!(sphere.tile_count(), 256);
/// assert_eq!(sphere.vertex_count(), 130);
/// ```
#[derive(Debug, Clone)]
pub struct SphereMesh {
    level: u32,
    radius: f32,
    vertices: Vec<Vec3>,
    vertex_neighbors: Vec<VertexNeighbors>,
    triangles: Vec<[u32; 3]>,
    tile_neighbors: Vec<[usize; 3]>,
}

impl SphereMesh {
    /// Build the sphere for a subdivision level
    ///
    /// # Arguments
    ///
    /// * `level` - Number of subdivisions (0 to `MAX_SUBDIVISIONS`)
    /// * `radius` - Radius every vertex is projected onto
    ///
    /// # Errors
    ///
    /// * `InvalidConfig` for a level above the maximum or a non-positive radius
    /// * `MeshInvariant` if the subdivision bookkeeping breaks
    pub fn generate(level: u32, radius: f32) -> Result<Self> {
        if level > MAX_SUBDIVISIONS {
            return Err(WorldError::InvalidConfig(format!(
                "subdivisions must be <= {} (got {})",
                MAX_SUBDIVISIONS, level
            )));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(WorldError::InvalidConfig(format!(
                "radius must be positive (got {})",
                radius
            )));
        }

        let sub = Subdivision::run(level)?;

        let vertices: Vec<Vec3> = sub
            .vertices
            .iter()
            .map(|&v| v * (radius / v.length()))
            .collect();

        let mut vertex_neighbors = vec![VertexNeighbors::default(); vertices.len()];
        for edge in &sub.edges {
            let [a, b] = edge.ends;
            if !vertex_neighbors[a as usize].push(b) || !vertex_neighbors[b as usize].push(a) {
                let message = format!(
                    "edge {}-{} gives a vertex more than {} neighbours",
                    a, b, VERTEX_NEIGHBORS_MAX
                );
                error!("{}", message);
                return Err(WorldError::MeshInvariant(message));
            }
        }

        let triangles: Vec<[u32; 3]> = sub.faces.iter().map(|f| f.corners).collect();

        let mut tile_neighbors = vec![[usize::MAX; 3]; triangles.len()];
        for edge in &sub.edges {
            let [a, b] = edge.ends;
            let [left, right] = edge.sides;
            for (tile, across) in [(left, right), (right, left)] {
                let slot = sub.faces[tile].edge_slot(a, b).ok_or_else(|| {
                    let message = format!("tile {} does not contain edge {}-{}", tile, a, b);
                    error!("{}", message);
                    WorldError::MeshInvariant(message)
                })?;
                tile_neighbors[tile][slot] = across;
            }
        }
        if let Some(tile) = tile_neighbors.iter().position(|n| n.contains(&usize::MAX)) {
            let message = format!("tile {} is missing a neighbour", tile);
            error!("{}", message);
            return Err(WorldError::MeshInvariant(message));
        }

        Ok(Self {
            level,
            radius,
            vertices,
            vertex_neighbors,
            triangles,
            tile_neighbors,
        })
    }

    /// Subdivision level this mesh was built with
    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Vertex positions on the sphere surface
    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Neighbours of a vertex, or `None` if the id is out of range
    pub fn vertex_neighbors(&self, vertex: usize) -> Option<&VertexNeighbors> {
        self.vertex_neighbors.get(vertex)
    }

    /// Flat index buffer, three vertex ids per tile
    pub fn indices(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Corner vertex ids of every tile
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Neighbouring tiles of every tile, by slot
    #[inline]
    pub fn tile_neighbors(&self) -> &[[usize; 3]] {
        &self.tile_neighbors
    }

    #[inline]
    pub fn tile_count(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Corner vertex ids of a tile, or `None` if the id is out of range
    pub fn tile_corners(&self, tile: usize) -> Option<[u32; 3]> {
        self.triangles.get(tile).copied()
    }
}

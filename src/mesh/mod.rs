//! Mesh generation for a World
//!
//! Generates engine-agnostic mesh data from the world's tiles. Each tile is
//! one flat-shaded triangle raised by its height.

mod colors;

pub use colors::{BasicColorMapper, ColorMapper, CustomColorMapper, TerrainColor};

use crate::tile::Tile;
use crate::world::World;
use glam::Vec3;

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with attributes
/// - Godot: Convert to `ArrayMesh`
/// - wgpu: Use directly as vertex buffers
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions (3D coordinates)
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals (face normal of the owning tile)
    pub normals: Vec<[f32; 3]>,
    /// Vertex colors (RGBA)
    pub colors: Vec<[f32; 4]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Generate mesh from a world with color mapping
///
/// Three vertices per tile, so tile `t` owns triangle `t` of the output.
pub fn generate_mesh<C: ColorMapper>(world: &World, color_mapper: &C) -> MeshData {
    generate_mesh_with_visibility(world, color_mapper, None, [0.0, 0.0, 0.0, 1.0])
}

/// Generate mesh with fog of war support
///
/// # Arguments
/// * `world` - The world to generate mesh for
/// * `color_mapper` - Maps terrain types to colors
/// * `visible_tiles` - Optional slice of visible tile IDs. If None, all tiles are visible.
/// * `hidden_color` - Color for hidden tiles (typically black)
pub fn generate_mesh_with_visibility<C: ColorMapper>(
    world: &World,
    color_mapper: &C,
    visible_tiles: Option<&[usize]>,
    hidden_color: TerrainColor,
) -> MeshData {
    let tiles = world.graph().tiles();
    let vertices = world.sphere().vertices();
    let radius = world.radius();

    let visible: Option<Vec<bool>> = visible_tiles.map(|ids| {
        let mut mask = vec![false; tiles.len()];
        for &id in ids.iter().filter(|&&id| id < tiles.len()) {
            mask[id] = true;
        }
        mask
    });

    let mut mesh = MeshData {
        positions: Vec::with_capacity(tiles.len() * 3),
        normals: Vec::with_capacity(tiles.len() * 3),
        colors: Vec::with_capacity(tiles.len() * 3),
        indices: Vec::with_capacity(tiles.len() * 3),
    };

    for tile in tiles {
        let is_visible = visible.as_ref().map_or(true, |mask| mask[tile.id]);
        let color = if is_visible {
            color_mapper.map_color(&tile.terrain)
        } else {
            hidden_color
        };

        push_tile(tile, vertices, radius, color, &mut mesh);
    }

    mesh
}

/// Emit one tile as a raised, flat-shaded triangle
fn push_tile(
    tile: &Tile,
    vertices: &[Vec3],
    radius: f32,
    color: TerrainColor,
    mesh: &mut MeshData,
) {
    let base_idx = mesh.positions.len() as u32;
    let lift = (radius + tile.height) / radius;
    let corners = tile.corners.map(|c| vertices[c as usize] * lift);
    let normal = (corners[1] - corners[0])
        .cross(corners[2] - corners[0])
        .normalize_or_zero();

    for corner in corners {
        mesh.positions.push(corner.to_array());
        mesh.normals.push(normal.to_array());
        mesh.colors.push(color);
    }
    mesh.indices.extend([base_idx, base_idx + 1, base_idx + 2]);
}

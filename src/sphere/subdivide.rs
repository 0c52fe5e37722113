//! Tetrahedron subdivision bookkeeping
//!
//! Each level splits every face into four and every edge into two. Faces and
//! edges live in two pairs of buffers that trade places after each level, so
//! no allocation happens past the first one.

use glam::Vec3;
use log::{debug, error};

use crate::error::{Result, WorldError};

/// Marker for a face edge whose midpoint has not been assigned yet
const UNSET: u32 = u32::MAX;

/// Base tetrahedron corners (re-centred on their centroid before use)
const TETRA_VERTICES: [[f32; 3]; 4] = [
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
];

/// Base faces, counter-clockwise seen from outside
const TETRA_FACES: [[u32; 3]; 4] = [[0, 1, 3], [2, 0, 3], [1, 2, 3], [1, 0, 2]];

/// Base edges as (end, end, side face, side face)
const TETRA_EDGES: [(u32, u32, usize, usize); 6] = [
    (0, 3, 0, 1),
    (0, 1, 0, 3),
    (1, 3, 0, 2),
    (2, 3, 1, 2),
    (1, 2, 3, 2),
    (0, 2, 3, 1),
];

/// A triangular face during subdivision
#[derive(Debug, Clone, Copy)]
pub(crate) struct Face {
    /// Vertex ids, counter-clockwise from outside
    pub corners: [u32; 3],
    /// Midpoint of edge (corner k, corner k+1), filled once per level
    mids: [u32; 3],
}

impl Face {
    fn new(corners: [u32; 3]) -> Self {
        Self {
            corners,
            mids: [UNSET; 3],
        }
    }

    /// Position of `vertex` among the corners
    pub fn corner_index(&self, vertex: u32) -> Option<usize> {
        self.corners.iter().position(|&c| c == vertex)
    }

    /// Slot k of the edge joining `a` and `b`, i.e. the edge (corner k, corner k+1)
    pub fn edge_slot(&self, a: u32, b: u32) -> Option<usize> {
        (0..3).find(|&k| {
            let p = self.corners[k];
            let q = self.corners[(k + 1) % 3];
            (p == a && q == b) || (p == b && q == a)
        })
    }
}

/// An edge shared by exactly two faces
#[derive(Debug, Clone, Copy)]
pub(crate) struct Edge {
    pub ends: [u32; 2],
    pub sides: [usize; 2],
}

/// Geometry produced by subdividing the tetrahedron
pub(crate) struct Subdivision {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub edges: Vec<Edge>,
    next_faces: Vec<Face>,
    next_edges: Vec<Edge>,
}

fn invariant(message: String) -> WorldError {
    error!("sphere subdivision failed: {}", message);
    WorldError::MeshInvariant(message)
}

impl Subdivision {
    /// Subdivide the tetrahedron `level` times
    pub fn run(level: u32) -> Result<Self> {
        let scale = 1usize << (2 * level);
        let mut sub = Self::tetrahedron(2 * scale + 2, 4 * scale, 6 * scale);

        for current in 0..level {
            sub.step()?;
            debug!(
                "subdivision level {}: {} vertices, {} faces, {} edges",
                current + 1,
                sub.vertices.len(),
                sub.faces.len(),
                sub.edges.len()
            );
        }

        if sub.vertices.len() != 2 * scale + 2
            || sub.faces.len() != 4 * scale
            || sub.edges.len() != 6 * scale
        {
            return Err(invariant(format!(
                "level {} produced {} vertices, {} faces, {} edges",
                level,
                sub.vertices.len(),
                sub.faces.len(),
                sub.edges.len()
            )));
        }

        Ok(sub)
    }

    fn tetrahedron(vertex_cap: usize, face_cap: usize, edge_cap: usize) -> Self {
        let raw: Vec<Vec3> = TETRA_VERTICES.iter().map(|&v| Vec3::from_array(v)).collect();
        let centroid = raw.iter().copied().sum::<Vec3>() / raw.len() as f32;

        let mut vertices = Vec::with_capacity(vertex_cap);
        vertices.extend(raw.into_iter().map(|v| v - centroid));

        let mut faces = Vec::with_capacity(face_cap);
        faces.extend(TETRA_FACES.iter().map(|&c| Face::new(c)));

        let mut edges = Vec::with_capacity(edge_cap);
        edges.extend(TETRA_EDGES.iter().map(|&(a, b, s, t)| Edge {
            ends: [a, b],
            sides: [s, t],
        }));

        Self {
            vertices,
            faces,
            edges,
            next_faces: Vec::with_capacity(face_cap),
            next_edges: Vec::with_capacity(edge_cap),
        }
    }

    /// One subdivision level
    fn step(&mut self) -> Result<()> {
        self.next_faces.clear();
        self.next_edges.clear();

        // Midpoint of every edge, recorded on both faces that share it
        let first_mid = self.vertices.len() as u32;
        for (index, edge) in self.edges.iter().enumerate() {
            let [a, b] = edge.ends;
            let mid = first_mid + index as u32;
            let position = (self.vertices[a as usize] + self.vertices[b as usize]) * 0.5;
            self.vertices.push(position);

            for &side in &edge.sides {
                let face = &mut self.faces[side];
                let slot = face.edge_slot(a, b).ok_or_else(|| {
                    invariant(format!("face {} does not contain edge {}-{}", side, a, b))
                })?;
                face.mids[slot] = mid;
            }
        }

        // Half-edges: each side face's child at that end is parent * 4 + corner
        for (index, edge) in self.edges.iter().enumerate() {
            let mid = first_mid + index as u32;
            for &end in &edge.ends {
                let mut sides = [0usize; 2];
                for (side, &parent) in sides.iter_mut().zip(&edge.sides) {
                    let corner = self.faces[parent].corner_index(end).ok_or_else(|| {
                        invariant(format!("face {} has no corner {}", parent, end))
                    })?;
                    *side = parent * 4 + corner;
                }
                self.next_edges.push(Edge {
                    ends: [end, mid],
                    sides,
                });
            }
        }

        // Four children per face plus the three edges inside it
        for (i, face) in self.faces.iter().enumerate() {
            if face.mids.contains(&UNSET) {
                return Err(invariant(format!("face {} has an unsplit edge", i)));
            }
            let m = face.mids;

            for j in 0..3 {
                push_child(
                    &mut self.next_faces,
                    4 * i + j,
                    [face.corners[j], m[j], m[(j + 2) % 3]],
                )?;
            }
            push_child(&mut self.next_faces, 4 * i + 3, m)?;

            for j in 0..3 {
                self.next_edges.push(Edge {
                    ends: [m[j], m[(j + 2) % 3]],
                    sides: [4 * i + j, 4 * i + 3],
                });
            }
        }

        std::mem::swap(&mut self.faces, &mut self.next_faces);
        std::mem::swap(&mut self.edges, &mut self.next_edges);
        Ok(())
    }
}

fn push_child(faces: &mut Vec<Face>, predicted: usize, corners: [u32; 3]) -> Result<()> {
    if faces.len() != predicted {
        return Err(invariant(format!(
            "child face landed at {} instead of {}",
            faces.len(),
            predicted
        )));
    }
    faces.push(Face::new(corners));
    Ok(())
}

//! Spatial indexing for position-to-tile lookups
//!
//! This module is only available with the `spatial-index` feature.

use glam::Vec3;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// KD-tree over tile centres
///
/// Maps a point in space to the tile whose centre is closest, which is how
/// clicks, raycasts and spawn positions land on the globe.
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f32, usize, 3, 32>,
}

impl SpatialIndex {
    /// Build the index from tile centres, in tile ID order
    ///
    /// # Example
    ///
    /// ```
    /// use geodesic_isles::*;
    ///
    /// let centers = vec![
    ///     Vec3::new(1.0, 0.0, 0.0),
    ///     Vec3::new(0.0, 1.0, 0.0),
    ///     Vec3::new(0.0, 0.0, 1.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&centers);
    /// assert_eq!(index.find_nearest(Vec3::new(1.0, 0.1, 0.0)), 0);
    /// ```
    pub fn new(centers: &[Vec3]) -> Self {
        let points: Vec<[f32; 3]> = centers.iter().map(|c| c.to_array()).collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// ID of the tile whose centre is nearest to `position`
    pub fn find_nearest(&self, position: Vec3) -> usize {
        let query = position.to_array();
        self.tree.nearest_one::<SquaredEuclidean>(&query).item
    }
}

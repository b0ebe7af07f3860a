//! Core traits for pointdesc

use crate::{descriptor::*, point::*, point_cloud::*, error::Result};

/// Trait for nearest neighbor search functionality
pub trait NearestNeighborSearch {
    /// Find the k nearest neighbors to a query point, closest first
    fn find_k_nearest(&self, query: &Point3f, k: usize) -> Vec<(usize, f32)>;

    /// Find all neighbors within a given radius, closest first
    fn find_radius_neighbors(&self, query: &Point3f, radius: f32) -> Vec<(usize, f32)>;
}

/// Anything that exposes an index-ordered set of 3D points
pub trait PointSet {
    fn points(&self) -> &[Point3f];
}

impl PointSet for PointCloud<Point3f> {
    fn points(&self) -> &[Point3f] {
        &self.points
    }
}

impl PointSet for DescriptorCloud {
    fn points(&self) -> &[Point3f] {
        &self.cloud.points
    }
}

/// Receiver of point selections coming from an interaction layer
pub trait PointSelection {
    /// Called when the user picks a point
    fn on_point_selected(&mut self, index: usize) -> Result<()>;

    /// The currently selected point, if any
    fn selected_point(&self) -> Option<usize>;
}

/// A surface that can display a per-point scalar array
pub trait ScalarOverlay {
    /// Show `values` (one per point) colored over `range`
    fn show_scalars(&mut self, name: &str, values: &[f32], range: ScalarRange);
}

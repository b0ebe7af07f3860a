//! Nearest neighbor search implementations

use kdtree::distance::squared_euclidean;
use pointdesc_core::{distance_squared, is_finite_point, Error, NearestNeighborSearch, Point3f, Result};

/// Points per leaf before it is split
const BUCKET_CAPACITY: usize = 16;

/// KD-Tree implementation for nearest neighbor search
///
/// Items are the indices of the points in the slice the tree was built from.
/// Leaves split at the midpoint of their widest axis; a leaf whose points all
/// share one position is never split, so repeated coordinates are fine.
pub struct KdTree {
    tree: kdtree::KdTree<f32, usize, [f32; 3]>,
}

impl KdTree {
    /// Build a tree over `points`.
    ///
    /// Fails with `InvalidArgument` if any coordinate is not finite.
    pub fn new(points: &[Point3f]) -> Result<Self> {
        let mut tree = kdtree::KdTree::with_capacity(3, BUCKET_CAPACITY);

        for (idx, point) in points.iter().enumerate() {
            if !is_finite_point(point) {
                return Err(Error::InvalidArgument(format!(
                    "point {} has non-finite coordinates ({}, {}, {})",
                    idx, point.x, point.y, point.z
                )));
            }
            tree.add([point.x, point.y, point.z], idx).map_err(|e| {
                Error::InvalidArgument(format!("cannot index point {}: {:?}", idx, e))
            })?;
        }

        Ok(Self { tree })
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NearestNeighborSearch for KdTree {
    fn find_k_nearest(&self, query: &Point3f, k: usize) -> Vec<(usize, f32)> {
        if k == 0 || self.is_empty() {
            return Vec::new();
        }

        // Only a non-finite query can fail here; it has no neighbors.
        self.tree
            .nearest(&[query.x, query.y, query.z], k, &squared_euclidean)
            .map(|neighbors| {
                neighbors
                    .into_iter()
                    .map(|(d2, &idx)| (idx, d2.sqrt()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn find_radius_neighbors(&self, query: &Point3f, radius: f32) -> Vec<(usize, f32)> {
        if radius < 0.0 || self.is_empty() {
            return Vec::new();
        }

        self.tree
            .within(&[query.x, query.y, query.z], radius * radius, &squared_euclidean)
            .map(|neighbors| {
                neighbors
                    .into_iter()
                    .map(|(d2, &idx)| (idx, d2.sqrt()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Simple brute force nearest neighbor search for small datasets
pub struct BruteForceSearch {
    points: Vec<Point3f>,
}

impl BruteForceSearch {
    pub fn new(points: &[Point3f]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }
}

impl NearestNeighborSearch for BruteForceSearch {
    fn find_k_nearest(&self, query: &Point3f, k: usize) -> Vec<(usize, f32)> {
        let mut distances: Vec<(usize, f32)> = self.points
            .iter()
            .enumerate()
            .map(|(idx, point)| (idx, distance_squared(point, query).sqrt()))
            .collect();

        // Sort by distance and take k nearest
        distances.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        distances.truncate(k);
        distances
    }

    fn find_radius_neighbors(&self, query: &Point3f, radius: f32) -> Vec<(usize, f32)> {
        let radius_squared = radius * radius;
        let mut neighbors: Vec<(usize, f32)> = self.points
            .iter()
            .enumerate()
            .filter_map(|(idx, point)| {
                let d2 = distance_squared(point, query);
                (d2 <= radius_squared).then(|| (idx, d2.sqrt()))
            })
            .collect();

        neighbors.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Vec<Point3f> {
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
            Point3f::new(1.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_kdtree_k_nearest() {
        let tree = KdTree::new(&square()).unwrap();
        let nearest = tree.find_k_nearest(&Point3f::new(0.9, 0.1, 0.0), 2);

        assert_eq!(nearest.len(), 2);
        assert_eq!(nearest[0].0, 1);
        assert!(nearest[0].1 <= nearest[1].1);
    }

    #[test]
    fn test_kdtree_query_point_is_its_own_nearest() {
        let points = square();
        let tree = KdTree::new(&points).unwrap();

        for (i, point) in points.iter().enumerate() {
            let nearest = tree.find_k_nearest(point, 2);
            assert_eq!(nearest[0].0, i);
            assert_relative_eq!(nearest[0].1, 0.0);
            assert_relative_eq!(nearest[1].1, 1.0);
        }
    }

    #[test]
    fn test_kdtree_radius_neighbors() {
        let tree = KdTree::new(&square()).unwrap();
        let neighbors = tree.find_radius_neighbors(&Point3f::new(0.5, 0.5, 0.0), 1.0);

        assert_eq!(neighbors.len(), 4);
        for (_, distance) in &neighbors {
            assert!(*distance <= 1.0);
        }
    }

    #[test]
    fn test_kdtree_rejects_non_finite_points() {
        let points = vec![Point3f::new(0.0, 0.0, 0.0), Point3f::new(f32::NAN, 0.0, 0.0)];
        assert!(matches!(KdTree::new(&points), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_empty_tree() {
        let tree = KdTree::new(&[]).unwrap();
        assert!(tree.is_empty());
        assert!(tree.find_k_nearest(&Point3f::origin(), 3).is_empty());
    }

    #[test]
    fn test_brute_force_consistency() {
        let points: Vec<Point3f> = (0..50)
            .map(|i| {
                let t = i as f32 * 0.37;
                Point3f::new(t.sin() * 3.0, t.cos() * 2.0, (i % 7) as f32 * 0.5)
            })
            .collect();

        let tree = KdTree::new(&points).unwrap();
        let brute = BruteForceSearch::new(&points);
        let query = Point3f::new(0.25, -0.5, 1.0);

        let from_tree = tree.find_k_nearest(&query, 5);
        let from_brute = brute.find_k_nearest(&query, 5);

        assert_eq!(from_tree.len(), from_brute.len());
        for (a, b) in from_tree.iter().zip(from_brute.iter()) {
            assert!((a.1 - b.1).abs() < 1e-5);
        }
    }
}

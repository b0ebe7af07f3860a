//! Average nearest neighbor spacing
//!
//! Estimates the local density of a point cloud as the mean distance from a point
//! to its closest neighbor. Large clouds can be sub-sampled: only the first
//! `sample_limit` points (in index order) are queried, which is usually enough for
//! a stable estimate on clouds of around a million points.

use crate::nearest_neighbor::KdTree;
use pointdesc_core::{Error, NearestNeighborSearch, Point3f, Result};
use serde::{Deserialize, Serialize};

/// Divisor used when averaging the sampled nearest neighbor distances
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacingNormalization {
    /// Divide by the number of points actually sampled
    #[default]
    SampleCount,
    /// Divide by the total number of points, even when fewer were sampled.
    /// Matches the estimate produced by older tooling; it underestimates the
    /// spacing whenever `sample_limit < N`.
    TotalPoints,
}

/// Configuration for the spacing estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingConfig {
    /// Number of points to sample (0 = all points)
    pub sample_limit: usize,
    /// Divisor of the accumulated distance
    pub normalization: SpacingNormalization,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            sample_limit: 0,
            normalization: SpacingNormalization::SampleCount,
        }
    }
}

/// Number of points a spacing estimate samples.
///
/// A limit of 0, or one larger than the point count, means every point.
pub fn effective_sample_count(point_count: usize, sample_limit: usize) -> usize {
    if sample_limit == 0 || sample_limit > point_count {
        point_count
    } else {
        sample_limit
    }
}

/// Average distance from each sampled point to its nearest neighbor
///
/// # Arguments
/// * `points` - Point set, at least 2 points
/// * `sample_limit` - Number of leading points to sample (0 = all)
///
/// # Example
/// ```rust
/// use pointdesc_core::Point3f;
/// use pointdesc_algorithms::average_nearest_neighbor_spacing;
///
/// fn main() -> pointdesc_core::Result<()> {
///     let points = vec![
///         Point3f::new(0.0, 0.0, 0.0),
///         Point3f::new(1.0, 0.0, 0.0),
///         Point3f::new(2.0, 0.0, 0.0),
///     ];
///     assert_eq!(average_nearest_neighbor_spacing(&points, 0)?, 1.0);
///     Ok(())
/// }
/// ```
pub fn average_nearest_neighbor_spacing(points: &[Point3f], sample_limit: usize) -> Result<f32> {
    average_nearest_neighbor_spacing_with_config(
        points,
        &SpacingConfig {
            sample_limit,
            ..SpacingConfig::default()
        },
    )
}

/// Average nearest neighbor spacing with explicit normalization
pub fn average_nearest_neighbor_spacing_with_config(
    points: &[Point3f],
    config: &SpacingConfig,
) -> Result<f32> {
    if points.len() < 2 {
        return Err(Error::InvalidArgument(format!(
            "spacing needs at least 2 points, got {}",
            points.len()
        )));
    }

    let sample_count = effective_sample_count(points.len(), config.sample_limit);
    if config.sample_limit > points.len() {
        log::warn!(
            "sample limit {} exceeds {} points, using all points",
            config.sample_limit,
            points.len()
        );
    }

    let tree = KdTree::new(points)?;

    // The first of the 2 closest points is the query point itself.
    let sum_of_distances: f64 = points[..sample_count]
        .iter()
        .map(|query| {
            tree.find_k_nearest(query, 2)
                .get(1)
                .map(|&(_, distance)| distance as f64)
                .unwrap_or(0.0)
        })
        .sum();

    let divisor = match config.normalization {
        SpacingNormalization::SampleCount => sample_count,
        SpacingNormalization::TotalPoints => points.len(),
    };

    let spacing = (sum_of_distances / divisor as f64) as f32;
    log::debug!(
        "average spacing {} over {} of {} points",
        spacing,
        sample_count,
        points.len()
    );
    Ok(spacing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line() -> Vec<Point3f> {
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(2.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_effective_sample_count() {
        assert_eq!(effective_sample_count(10, 0), 10);
        assert_eq!(effective_sample_count(10, 4), 4);
        assert_eq!(effective_sample_count(10, 10), 10);
        assert_eq!(effective_sample_count(10, 11), 10);
    }

    #[test]
    fn test_spacing_on_line() {
        assert_relative_eq!(average_nearest_neighbor_spacing(&line(), 0).unwrap(), 1.0);
    }

    #[test]
    fn test_limit_above_count_matches_all_points() {
        let points = line();
        let all = average_nearest_neighbor_spacing(&points, 0).unwrap();
        let over = average_nearest_neighbor_spacing(&points, 100).unwrap();
        assert_eq!(all, over);
    }

    #[test]
    fn test_single_point_is_rejected() {
        let err = average_nearest_neighbor_spacing(&[Point3f::origin()], 0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(average_nearest_neighbor_spacing(&[], 0).is_err());
    }

    #[test]
    fn test_sampling_normalization() {
        // Nearest neighbor distances: 1, 1, 3, 3
        let points = vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(4.0, 0.0, 0.0),
            Point3f::new(7.0, 0.0, 0.0),
        ];

        let sampled = SpacingConfig {
            sample_limit: 2,
            normalization: SpacingNormalization::SampleCount,
        };
        assert_relative_eq!(
            average_nearest_neighbor_spacing_with_config(&points, &sampled).unwrap(),
            1.0
        );

        let legacy = SpacingConfig {
            sample_limit: 2,
            normalization: SpacingNormalization::TotalPoints,
        };
        assert_relative_eq!(
            average_nearest_neighbor_spacing_with_config(&points, &legacy).unwrap(),
            0.5
        );

        assert_relative_eq!(average_nearest_neighbor_spacing(&points, 0).unwrap(), 2.0);
    }

    #[test]
    fn test_duplicate_points_have_zero_spacing() {
        let points = vec![Point3f::new(1.0, 1.0, 1.0), Point3f::new(1.0, 1.0, 1.0)];
        assert_eq!(average_nearest_neighbor_spacing(&points, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_planar_grid_spacing() {
        let points: Vec<Point3f> = (0..20)
            .flat_map(|x| (0..20).map(move |y| Point3f::new(x as f32, y as f32, 0.0)))
            .collect();
        assert_relative_eq!(average_nearest_neighbor_spacing(&points, 0).unwrap(), 1.0);
    }

    #[test]
    fn test_many_identical_points() {
        let points = vec![Point3f::new(1.0, 1.0, 1.0); 100];
        assert_eq!(average_nearest_neighbor_spacing(&points, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_points_along_one_axis() {
        let points: Vec<Point3f> = (0..200).map(|i| Point3f::new(0.0, 0.0, i as f32)).collect();
        assert_relative_eq!(average_nearest_neighbor_spacing(&points, 0).unwrap(), 1.0);
        assert_relative_eq!(average_nearest_neighbor_spacing(&points, 50).unwrap(), 1.0);
    }

    #[test]
    fn test_non_finite_points_are_rejected() {
        let points = vec![Point3f::new(0.0, 0.0, 0.0), Point3f::new(f32::INFINITY, 0.0, 0.0)];
        assert!(matches!(
            average_nearest_neighbor_spacing(&points, 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: SpacingConfig = serde_json::from_str(r#"{"normalization":"total_points"}"#).unwrap();
        assert_eq!(config.sample_limit, 0);
        assert_eq!(config.normalization, SpacingNormalization::TotalPoints);
    }
}

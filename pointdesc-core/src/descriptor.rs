//! Named per-point descriptor arrays and the point cloud that carries them

use crate::error::{Error, Result};
use crate::point::Point3f;
use crate::point_cloud::PointCloud;
use serde::{Deserialize, Serialize};

/// Inclusive value range of a scalar array, used for color mapping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarRange {
    pub min: f32,
    pub max: f32,
}

impl ScalarRange {
    /// Compute the range of a slice of values, ignoring NaN.
    ///
    /// Returns `None` when the slice holds no comparable value.
    pub fn of(values: &[f32]) -> Option<Self> {
        values
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |range: Option<Self>, &v| match range {
                None => Some(Self { min: v, max: v }),
                Some(r) => Some(Self {
                    min: r.min.min(v),
                    max: r.max.max(v),
                }),
            })
    }

    /// Width of the range
    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}

/// A named array of fixed-length tuples, one tuple per point.
///
/// Values are stored flat: tuple `i` occupies
/// `values[i * components..(i + 1) * components]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorArray {
    name: String,
    components: usize,
    values: Vec<f32>,
}

impl DescriptorArray {
    /// Create an array from flat tuple storage
    pub fn new(name: impl Into<String>, components: usize, values: Vec<f32>) -> Result<Self> {
        let name = name.into();
        if components == 0 {
            return Err(Error::InvalidData(format!(
                "array '{}' must have at least one component",
                name
            )));
        }
        if values.len() % components != 0 {
            return Err(Error::InvalidData(format!(
                "array '{}' holds {} values, not a multiple of {} components",
                name,
                values.len(),
                components
            )));
        }
        Ok(Self {
            name,
            components,
            values,
        })
    }

    /// Create an array from one vector per point.
    ///
    /// All tuples must have the same, non-zero length.
    pub fn from_tuples(name: impl Into<String>, tuples: Vec<Vec<f32>>) -> Result<Self> {
        let name = name.into();
        let components = match tuples.first() {
            Some(first) => first.len(),
            None => return Self::new(name, 1, Vec::new()),
        };
        if components == 0 {
            return Err(Error::InvalidData(format!(
                "array '{}' must have at least one component",
                name
            )));
        }

        let mut values = Vec::with_capacity(tuples.len() * components);
        for (index, tuple) in tuples.into_iter().enumerate() {
            if tuple.len() != components {
                return Err(Error::InvalidArgument(format!(
                    "tuple {} of array '{}' has {} components, expected {}",
                    index,
                    name,
                    tuple.len(),
                    components
                )));
            }
            values.extend(tuple);
        }

        Self::new(name, components, values)
    }

    /// Create a single-component array
    pub fn scalars(name: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            components: 1,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of components per tuple (the descriptor length D)
    pub fn components(&self) -> usize {
        self.components
    }

    /// Number of tuples
    pub fn len(&self) -> usize {
        self.values.len() / self.components
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the tuple stored for a point
    pub fn tuple(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.components)?;
        let end = start.checked_add(self.components)?;
        self.values.get(start..end)
    }

    /// Iterate over all tuples in point order
    pub fn iter(&self) -> std::slice::ChunksExact<'_, f32> {
        self.values.chunks_exact(self.components)
    }

    /// Flat view of all values
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Range over every stored value
    pub fn value_range(&self) -> Option<ScalarRange> {
        ScalarRange::of(&self.values)
    }
}

/// Ordered collection of named per-point arrays
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointData {
    arrays: Vec<DescriptorArray>,
    active_scalars: Option<String>,
}

impl PointData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an array, replacing any existing array with the same name
    pub fn add_array(&mut self, array: DescriptorArray) {
        match self.arrays.iter_mut().find(|a| a.name == array.name) {
            Some(existing) => *existing = array,
            None => self.arrays.push(array),
        }
    }

    /// Look up an array by name
    pub fn array(&self, name: &str) -> Option<&DescriptorArray> {
        self.arrays.iter().find(|a| a.name == name)
    }

    /// Look up an array by name, failing with `NotFound` when absent
    pub fn get(&self, name: &str) -> Result<&DescriptorArray> {
        self.array(name)
            .ok_or_else(|| Error::NotFound(format!("array '{}' not found", name)))
    }

    /// Remove an array by name, returning it if it was present
    pub fn remove(&mut self, name: &str) -> Option<DescriptorArray> {
        let position = self.arrays.iter().position(|a| a.name == name)?;
        if self.active_scalars.as_deref() == Some(name) {
            self.active_scalars = None;
        }
        Some(self.arrays.remove(position))
    }

    /// Names of all arrays in insertion order
    pub fn array_names(&self) -> Vec<&str> {
        self.arrays.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Mark an existing array as the one a presentation layer should color by
    pub fn set_active_scalars(&mut self, name: &str) -> Result<()> {
        self.get(name)?;
        self.active_scalars = Some(name.to_string());
        Ok(())
    }

    pub fn active_scalars(&self) -> Option<&DescriptorArray> {
        self.active_scalars.as_deref().and_then(|name| self.array(name))
    }
}

/// A point cloud whose points carry named descriptor arrays
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptorCloud {
    pub cloud: PointCloud<Point3f>,
    point_data: PointData,
}

impl DescriptorCloud {
    pub fn new(cloud: PointCloud<Point3f>) -> Self {
        Self {
            cloud,
            point_data: PointData::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cloud.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cloud.is_empty()
    }

    /// Attach an array to the points.
    ///
    /// The array must hold exactly one tuple per point.
    pub fn add_array(&mut self, array: DescriptorArray) -> Result<()> {
        if array.len() != self.cloud.len() {
            return Err(Error::InvalidArgument(format!(
                "array '{}' has {} tuples but the cloud has {} points",
                array.name(),
                array.len(),
                self.cloud.len()
            )));
        }
        self.point_data.add_array(array);
        Ok(())
    }

    /// Builder form of [`DescriptorCloud::add_array`]
    pub fn with_array(mut self, array: DescriptorArray) -> Result<Self> {
        self.add_array(array)?;
        Ok(self)
    }

    pub fn point_data(&self) -> &PointData {
        &self.point_data
    }

    pub fn point_data_mut(&mut self) -> &mut PointData {
        &mut self.point_data
    }

    /// Coordinates of a point
    pub fn point(&self, index: usize) -> Result<Point3f> {
        self.cloud.get(index).copied().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "point index {} out of range for {} points",
                index,
                self.cloud.len()
            ))
        })
    }

    /// Descriptor array by name
    pub fn descriptor(&self, name: &str) -> Result<&DescriptorArray> {
        self.point_data.get(name)
    }

    pub fn array_names(&self) -> Vec<&str> {
        self.point_data.array_names()
    }

    /// Log the names of all arrays attached to the points
    pub fn log_array_names(&self) {
        log::debug!("There are {} arrays.", self.point_data.len());
        for name in self.point_data.array_names() {
            log::debug!("{}", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line_cloud(n: usize) -> DescriptorCloud {
        DescriptorCloud::new((0..n).map(|i| Point3f::new(i as f32, 0.0, 0.0)).collect())
    }

    #[test]
    fn test_array_tuples() {
        let array = DescriptorArray::new("fpfh", 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array.components(), 2);
        assert_eq!(array.tuple(1), Some(&[3.0, 4.0][..]));
        assert_eq!(array.tuple(3), None);
        assert_eq!(array.iter().count(), 3);
    }

    #[test]
    fn test_array_rejects_ragged_storage() {
        let err = DescriptorArray::new("bad", 2, vec![1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));

        let err = DescriptorArray::new("bad", 0, vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_from_tuples_rejects_mismatched_lengths() {
        let err = DescriptorArray::from_tuples("bad", vec![vec![1.0, 2.0], vec![1.0, 2.0, 3.0]])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_value_range_ignores_nan() {
        let range = ScalarRange::of(&[3.0, f32::NAN, -1.0, 2.0]).unwrap();
        assert_relative_eq!(range.min, -1.0);
        assert_relative_eq!(range.max, 3.0);
        assert_relative_eq!(range.span(), 4.0);
        assert!(ScalarRange::of(&[]).is_none());
        assert!(ScalarRange::of(&[f32::NAN]).is_none());
    }

    #[test]
    fn test_point_data_replaces_by_name() {
        let mut data = PointData::new();
        data.add_array(DescriptorArray::scalars("a", vec![1.0]));
        data.add_array(DescriptorArray::scalars("b", vec![2.0]));
        data.add_array(DescriptorArray::scalars("a", vec![3.0]));

        assert_eq!(data.array_names(), vec!["a", "b"]);
        assert_eq!(data.array("a").unwrap().values(), &[3.0]);
    }

    #[test]
    fn test_active_scalars() {
        let mut data = PointData::new();
        assert!(matches!(data.set_active_scalars("missing"), Err(Error::NotFound(_))));

        data.add_array(DescriptorArray::scalars("height", vec![0.5]));
        data.set_active_scalars("height").unwrap();
        assert_eq!(data.active_scalars().unwrap().name(), "height");

        data.remove("height");
        assert!(data.active_scalars().is_none());
    }

    #[test]
    fn test_cloud_checks_tuple_count() {
        let mut cloud = line_cloud(3);
        let err = cloud
            .add_array(DescriptorArray::scalars("short", vec![1.0, 2.0]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        cloud
            .add_array(DescriptorArray::scalars("ok", vec![1.0, 2.0, 3.0]))
            .unwrap();
        assert_eq!(cloud.array_names(), vec!["ok"]);
    }

    #[test]
    fn test_cloud_lookups() {
        let cloud = line_cloud(2)
            .with_array(DescriptorArray::scalars("s", vec![0.0, 1.0]))
            .unwrap();

        assert_eq!(cloud.point(1).unwrap(), Point3f::new(1.0, 0.0, 0.0));
        assert!(matches!(cloud.point(2), Err(Error::InvalidArgument(_))));
        assert!(cloud.descriptor("s").is_ok());
        assert!(matches!(cloud.descriptor("t"), Err(Error::NotFound(_))));
    }
}

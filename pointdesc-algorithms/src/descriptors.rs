//! Descriptor comparison
//!
//! Two descriptors are compared with the L1 norm of their difference: the sum of
//! absolute per-component differences. The batch form compares one reference
//! descriptor against the descriptor of every point in a cloud.

use pointdesc_core::{DescriptorArray, Error, Result};
use rayon::prelude::*;

/// Sum of absolute component differences, without length checks
fn l1_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

/// Distance between two descriptor vectors
///
/// Returns `Σ |a[i] - b[i]|`. Both vectors must have the same, non-zero length.
///
/// # Example
/// ```rust
/// use pointdesc_algorithms::descriptor_distance;
///
/// fn main() -> pointdesc_core::Result<()> {
///     let d = descriptor_distance(&[1.0, 2.0], &[4.0, 6.0])?;
///     assert_eq!(d, 7.0);
///     Ok(())
/// }
/// ```
pub fn descriptor_distance(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::InvalidArgument(format!(
            "descriptor lengths differ: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    if a.is_empty() {
        return Err(Error::InvalidArgument(
            "descriptors must have at least one component".to_string()
        ));
    }

    Ok(l1_distance(a, b))
}

/// Compare the descriptor of one point against every point's descriptor
///
/// # Arguments
/// * `descriptors` - One descriptor tuple per point
/// * `reference_index` - Index of the point whose descriptor is the reference
///
/// # Returns
/// * `Result<Vec<f32>>` - One difference per point; the entry at `reference_index` is 0
pub fn descriptor_differences(descriptors: &DescriptorArray, reference_index: usize) -> Result<Vec<f32>> {
    let reference = descriptors.tuple(reference_index).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "reference index {} out of range for {} descriptors",
            reference_index,
            descriptors.len()
        ))
    })?;

    log::debug!(
        "comparing descriptor {} of '{}' ({} components) against {} points",
        reference_index,
        descriptors.name(),
        descriptors.components(),
        descriptors.len()
    );

    descriptor_differences_to(reference, descriptors)
}

/// Compare an external reference descriptor against every point's descriptor
pub fn descriptor_differences_to(reference: &[f32], descriptors: &DescriptorArray) -> Result<Vec<f32>> {
    if reference.len() != descriptors.components() {
        return Err(Error::InvalidArgument(format!(
            "reference descriptor has {} components, array '{}' has {}",
            reference.len(),
            descriptors.name(),
            descriptors.components()
        )));
    }

    // Lengths are validated once above, so the per-point loop skips the checks.
    Ok(descriptors
        .values()
        .par_chunks_exact(descriptors.components())
        .map(|current| l1_distance(reference, current))
        .collect())
}

//! Interpolator trait for sampling images at continuous indices.

use ndarray::Array3;

use crate::spatial::Point3;

/// Samples a voxel grid at a continuous index.
///
/// Returns `None` when the index falls outside the grid; callers substitute
/// a default pixel value (resampling) or skip the sample (metrics).
pub trait Interpolator {
    fn sample(&self, data: &Array3<f32>, index: &Point3) -> Option<f64>;
}

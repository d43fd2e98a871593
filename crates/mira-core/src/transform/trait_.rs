//! Transform trait for spatial coordinate transformations.

use crate::spatial::Point3;

/// A parametric mapping between physical spaces.
///
/// Registration produces a transform that maps points from the fixed image's
/// physical space into the moving image's physical space. The same transform
/// is applied to moving-space landmarks during evaluation and to the output
/// grid during resampling, so it is shared read-only after construction.
///
/// The flat parameter view (`parameters` / `set_parameters`) is the seam the
/// optimizers drive; its layout is transform-specific.
pub trait Transform {
    /// Map a single physical point through the transform.
    fn transform_point(&self, point: &Point3) -> Point3;

    /// The transform's free parameters as a flat vector.
    fn parameters(&self) -> Vec<f64>;

    /// Replace the free parameters.
    ///
    /// # Panics
    /// Panics if the slice length does not match `parameters().len()`.
    fn set_parameters(&mut self, parameters: &[f64]);
}

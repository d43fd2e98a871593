//! Similarity metric trait.

use mira_core::transform::Transform;
use mira_core::Image;

use crate::error::Result;

/// A similarity metric between a fixed and a transformed moving image.
///
/// Metrics are formulated as costs: lower values mean better alignment,
/// so optimizers minimize them uniformly.
pub trait Metric {
    /// Evaluate the metric for the given transform.
    ///
    /// Samples are drawn on the fixed image grid; each fixed voxel is
    /// mapped through `transform` into the moving image and voxels that
    /// land outside it are skipped.
    fn evaluate(&self, fixed: &Image, moving: &Image, transform: &dyn Transform) -> Result<f64>;

    /// Human-readable metric name for logs and reports.
    fn name(&self) -> &'static str;
}

//! Mean squares intensity metric.

use mira_core::interpolation::{Interpolator, LinearInterpolator};
use mira_core::spatial::Point3;
use mira_core::transform::Transform;
use mira_core::Image;

use super::trait_::Metric;
use crate::error::{RegistrationError, Result};

/// Mean of squared intensity differences.
///
/// Suited to mono-modal registration where corresponding structures have
/// similar intensities in both images. Zero for identical, perfectly
/// aligned images.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSquaresMetric {
    interpolator: LinearInterpolator,
}

impl MeanSquaresMetric {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Metric for MeanSquaresMetric {
    fn evaluate(&self, fixed: &Image, moving: &Image, transform: &dyn Transform) -> Result<f64> {
        let shape = fixed.shape();
        let mut sum = 0.0f64;
        let mut count = 0usize;

        for x in 0..shape[0] {
            for y in 0..shape[1] {
                for z in 0..shape[2] {
                    let index = Point3::new([x as f64, y as f64, z as f64]);
                    let fixed_point = fixed.continuous_index_to_physical_point(&index);
                    let moving_point = transform.transform_point(&fixed_point);
                    let moving_index = moving.physical_point_to_continuous_index(&moving_point);

                    if let Some(moving_value) =
                        self.interpolator.sample(moving.data(), &moving_index)
                    {
                        let diff = fixed.data()[[x, y, z]] as f64 - moving_value;
                        sum += diff * diff;
                        count += 1;
                    }
                }
            }
        }

        if count == 0 {
            return Err(RegistrationError::metric(
                "no overlapping samples between fixed and moving images",
            ));
        }
        Ok(sum / count as f64)
    }

    fn name(&self) -> &'static str {
        "MeanSquares"
    }
}

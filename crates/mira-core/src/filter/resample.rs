//! Resample filter.
//!
//! Maps a moving image into a reference image's grid through a transform.

use ndarray::Array3;

use crate::image::Image;
use crate::interpolation::{Interpolator, LinearInterpolator};
use crate::spatial::Point3;
use crate::transform::Transform;

/// Resamples an input image onto a reference grid.
///
/// For each output voxel the reference grid index is converted to a physical
/// point, mapped through the transform into the input image's physical
/// space, and the input is interpolated there. Points outside the input's
/// field of view receive the default pixel value.
pub struct ResampleFilter {
    default_pixel_value: f64,
}

impl ResampleFilter {
    pub fn new() -> Self {
        Self {
            default_pixel_value: 0.0,
        }
    }

    /// Set the value used outside the input image's field of view.
    pub fn with_default_pixel_value(mut self, value: f64) -> Self {
        self.default_pixel_value = value;
        self
    }

    /// Resample `input` onto the grid of `reference` through `transform`.
    ///
    /// The transform maps reference (fixed) physical space into input
    /// (moving) physical space, which is the transform registration
    /// produces.
    pub fn apply(&self, input: &Image, reference: &Image, transform: &dyn Transform) -> Image {
        let shape = reference.shape();
        let interpolator = LinearInterpolator::new();

        let data = Array3::from_shape_fn((shape[0], shape[1], shape[2]), |(x, y, z)| {
            let index = Point3::new([x as f64, y as f64, z as f64]);
            let reference_point = reference.continuous_index_to_physical_point(&index);
            let input_point = transform.transform_point(&reference_point);
            let input_index = input.physical_point_to_continuous_index(&input_point);
            interpolator
                .sample(input.data(), &input_index)
                .unwrap_or(self.default_pixel_value) as f32
        });

        Image::new(
            data,
            *reference.origin(),
            *reference.spacing(),
            *reference.direction(),
        )
    }
}

impl Default for ResampleFilter {
    fn default() -> Self {
        Self::new()
    }
}

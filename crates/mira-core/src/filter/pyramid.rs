//! Multi-resolution image pyramid.

use crate::image::Image;

use super::downsample::DownsampleFilter;
use super::gaussian::GaussianFilter;

/// A sequence of progressively smoothed and shrunk versions of one image,
/// ordered coarsest first, for coarse-to-fine registration.
pub struct ImagePyramid {
    levels: Vec<Image>,
}

impl ImagePyramid {
    /// Build a pyramid from shrink factors and smoothing sigmas.
    ///
    /// Each level is smoothed (sigma in physical units) then downsampled.
    /// Identity levels (factor 1, sigma 0) reuse the input unchanged.
    ///
    /// # Panics
    /// Panics if the schedules have different lengths.
    pub fn new(input: &Image, shrink_factors: &[usize], smoothing_sigmas: &[f64]) -> Self {
        assert_eq!(
            shrink_factors.len(),
            smoothing_sigmas.len(),
            "schedule lengths must match"
        );

        let mut levels = Vec::with_capacity(shrink_factors.len());
        for (&factor, &sigma) in shrink_factors.iter().zip(smoothing_sigmas.iter()) {
            if factor == 1 && sigma <= 1e-6 {
                levels.push(input.clone());
                continue;
            }

            let smoothed = if sigma > 1e-6 {
                GaussianFilter::new(sigma).apply(input)
            } else {
                input.clone()
            };

            let level = if factor > 1 {
                DownsampleFilter::new(factor).apply(&smoothed)
            } else {
                smoothed
            };
            levels.push(level);
        }

        Self { levels }
    }

    /// Image at the given level (0 = coarsest).
    pub fn level(&self, level: usize) -> &Image {
        &self.levels[level]
    }

    /// Number of levels.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_pyramid_shapes() {
        let image = Image::from_data(Array3::zeros((16, 16, 16)));
        let pyramid = ImagePyramid::new(&image, &[4, 2, 1], &[2.0, 1.0, 0.0]);

        assert_eq!(pyramid.num_levels(), 3);
        assert_eq!(pyramid.level(0).shape(), [4, 4, 4]);
        assert_eq!(pyramid.level(1).shape(), [8, 8, 8]);
        assert_eq!(pyramid.level(2).shape(), [16, 16, 16]);
    }

    #[test]
    fn test_finest_level_is_input() {
        let data = Array3::from_shape_fn((8, 8, 8), |(x, y, z)| (x * 64 + y * 8 + z) as f32);
        let image = Image::from_data(data.clone());
        let pyramid = ImagePyramid::new(&image, &[2, 1], &[1.0, 0.0]);
        assert_eq!(pyramid.level(1).data(), &data);
    }

    #[test]
    fn test_single_level_pyramid() {
        let image = Image::from_data(Array3::zeros((8, 8, 8)));
        let pyramid = ImagePyramid::new(&image, &[1], &[0.0]);
        assert_eq!(pyramid.num_levels(), 1);
        assert_eq!(pyramid.level(0).shape(), [8, 8, 8]);
    }
}

//! Downsample filter.

use ndarray::Array3;

use crate::image::Image;

/// Reduces image size by an integer factor, keeping every Nth voxel.
///
/// Spacing is scaled by the factor; the origin is unchanged because the
/// physical location of the first voxel is preserved.
pub struct DownsampleFilter {
    factor: usize,
}

impl DownsampleFilter {
    /// Create a new downsample filter with the given shrink factor (>= 1).
    pub fn new(factor: usize) -> Self {
        assert!(factor >= 1, "shrink factor must be at least 1");
        Self { factor }
    }

    /// Apply the filter to an image.
    pub fn apply(&self, image: &Image) -> Image {
        if self.factor == 1 {
            return image.clone();
        }

        let shape = image.shape();
        let new_shape = [
            shape[0].div_ceil(self.factor),
            shape[1].div_ceil(self.factor),
            shape[2].div_ceil(self.factor),
        ];

        let src = image.data();
        let data = Array3::from_shape_fn(
            (new_shape[0], new_shape[1], new_shape[2]),
            |(x, y, z)| src[[x * self.factor, y * self.factor, z * self.factor]],
        );

        let mut spacing = *image.spacing();
        for axis in 0..3 {
            spacing[axis] *= self.factor as f64;
        }

        Image::new(data, *image.origin(), spacing, *image.direction())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Point3;
    use ndarray::Array3;

    #[test]
    fn test_downsample_shape_and_spacing() {
        let image = Image::from_data(Array3::zeros((10, 9, 8)));
        let shrunk = DownsampleFilter::new(2).apply(&image);
        assert_eq!(shrunk.shape(), [5, 5, 4]);
        assert_eq!(shrunk.spacing()[0], 2.0);
        assert_eq!(shrunk.origin(), &Point3::origin());
    }

    #[test]
    fn test_downsample_keeps_strided_voxels() {
        let data = Array3::from_shape_fn((4, 4, 4), |(x, y, z)| (x * 100 + y * 10 + z) as f32);
        let image = Image::from_data(data);
        let shrunk = DownsampleFilter::new(2).apply(&image);
        assert_eq!(shrunk.data()[[0, 0, 0]], 0.0);
        assert_eq!(shrunk.data()[[1, 1, 1]], 222.0);
    }

    #[test]
    fn test_factor_one_is_identity() {
        let image = Image::from_data(Array3::from_elem((3, 3, 3), 1.5));
        let same = DownsampleFilter::new(1).apply(&image);
        assert_eq!(same.shape(), [3, 3, 3]);
    }

    #[test]
    fn test_physical_location_preserved() {
        // Voxel (1,0,0) of the shrunk image is voxel (2,0,0) of the input,
        // so both must map to the same physical point.
        let image = Image::from_data(Array3::zeros((8, 8, 8)));
        let shrunk = DownsampleFilter::new(2).apply(&image);
        let p = shrunk.continuous_index_to_physical_point(&Point3::new([1.0, 0.0, 0.0]));
        let q = image.continuous_index_to_physical_point(&Point3::new([2.0, 0.0, 0.0]));
        assert_eq!(p, q);
    }
}

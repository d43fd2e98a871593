//! Gaussian smoothing filter.

use ndarray::Array3;

use crate::image::Image;

/// Separable Gaussian smoothing.
///
/// The standard deviation is given in physical units (mm) and converted to
/// voxels per axis using the image spacing, so anisotropic volumes are
/// blurred isotropically in physical space. Borders are handled by edge
/// replication.
pub struct GaussianFilter {
    sigma: f64,
    max_kernel_radius: usize,
}

impl GaussianFilter {
    /// Create a new Gaussian filter with the given standard deviation (mm).
    pub fn new(sigma: f64) -> Self {
        Self {
            sigma,
            max_kernel_radius: 16,
        }
    }

    /// Limit the kernel radius (voxels) to bound the cost of large sigmas.
    pub fn with_max_kernel_radius(mut self, radius: usize) -> Self {
        self.max_kernel_radius = radius;
        self
    }

    /// Apply the filter to an image.
    pub fn apply(&self, image: &Image) -> Image {
        if self.sigma <= 1e-6 {
            return image.clone();
        }

        let mut data = image.data().clone();
        for axis in 0..3 {
            let voxel_sigma = self.sigma / image.spacing()[axis];
            if voxel_sigma <= 1e-6 {
                continue;
            }
            let radius = ((3.0 * voxel_sigma).ceil() as usize)
                .max(1)
                .min(self.max_kernel_radius);
            let kernel = gaussian_kernel(voxel_sigma, radius);
            data = convolve_axis(&data, &kernel, axis);
        }

        Image::new(data, *image.origin(), *image.spacing(), *image.direction())
    }
}

fn gaussian_kernel(sigma: f64, radius: usize) -> Vec<f64> {
    let two_sigma2 = 2.0 * sigma * sigma;
    let mut kernel = Vec::with_capacity(2 * radius + 1);
    let mut sum = 0.0;
    for i in 0..=(2 * radius) {
        let x = i as f64 - radius as f64;
        let value = (-x * x / two_sigma2).exp();
        kernel.push(value);
        sum += value;
    }
    for value in &mut kernel {
        *value /= sum;
    }
    kernel
}

fn convolve_axis(data: &Array3<f32>, kernel: &[f64], axis: usize) -> Array3<f32> {
    let dims = [data.dim().0, data.dim().1, data.dim().2];
    let radius = kernel.len() / 2;
    let n = dims[axis] as isize;

    let mut out = Array3::zeros(data.raw_dim());
    for x in 0..dims[0] {
        for y in 0..dims[1] {
            for z in 0..dims[2] {
                let idx = [x, y, z];
                let mut acc = 0.0;
                for (k, weight) in kernel.iter().enumerate() {
                    let offset = k as isize - radius as isize;
                    let pos = (idx[axis] as isize + offset).clamp(0, n - 1) as usize;
                    let mut tap = idx;
                    tap[axis] = pos;
                    acc += weight * data[[tap[0], tap[1], tap[2]]] as f64;
                }
                out[[x, y, z]] = acc as f32;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_kernel_normalized() {
        let kernel = gaussian_kernel(1.5, 5);
        let sum: f64 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert_eq!(kernel.len(), 11);
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let data = Array3::from_shape_fn((4, 4, 4), |(x, y, z)| (x * 16 + y * 4 + z) as f32);
        let image = Image::from_data(data.clone());
        let smoothed = GaussianFilter::new(0.0).apply(&image);
        assert_eq!(smoothed.data(), &data);
    }

    #[test]
    fn test_smoothing_preserves_constant_volume() {
        let image = Image::from_data(Array3::from_elem((6, 6, 6), 3.0));
        let smoothed = GaussianFilter::new(1.0).apply(&image);
        for &v in smoothed.data().iter() {
            assert!((v - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_smoothing_reduces_peak() {
        let mut data = Array3::zeros((7, 7, 7));
        data[[3, 3, 3]] = 1.0;
        let image = Image::from_data(data);
        let smoothed = GaussianFilter::new(1.0).apply(&image);
        assert!(smoothed.data()[[3, 3, 3]] < 1.0);
        assert!(smoothed.data()[[3, 3, 2]] > 0.0);
    }
}

//! Trilinear interpolation.

use ndarray::Array3;

use super::trait_::Interpolator;
use crate::spatial::Point3;

/// Trilinear interpolator.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    pub fn new() -> Self {
        Self
    }
}

impl Interpolator for LinearInterpolator {
    fn sample(&self, data: &Array3<f32>, index: &Point3) -> Option<f64> {
        let (nx, ny, nz) = data.dim();
        let (x, y, z) = (index[0], index[1], index[2]);

        if x < 0.0
            || y < 0.0
            || z < 0.0
            || x > (nx - 1) as f64
            || y > (ny - 1) as f64
            || z > (nz - 1) as f64
        {
            return None;
        }

        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let z0 = z.floor() as usize;
        let x1 = (x0 + 1).min(nx - 1);
        let y1 = (y0 + 1).min(ny - 1);
        let z1 = (z0 + 1).min(nz - 1);

        let fx = x - x0 as f64;
        let fy = y - y0 as f64;
        let fz = z - z0 as f64;

        let c000 = data[[x0, y0, z0]] as f64;
        let c100 = data[[x1, y0, z0]] as f64;
        let c010 = data[[x0, y1, z0]] as f64;
        let c110 = data[[x1, y1, z0]] as f64;
        let c001 = data[[x0, y0, z1]] as f64;
        let c101 = data[[x1, y0, z1]] as f64;
        let c011 = data[[x0, y1, z1]] as f64;
        let c111 = data[[x1, y1, z1]] as f64;

        let c00 = c000 * (1.0 - fx) + c100 * fx;
        let c10 = c010 * (1.0 - fx) + c110 * fx;
        let c01 = c001 * (1.0 - fx) + c101 * fx;
        let c11 = c011 * (1.0 - fx) + c111 * fx;

        let c0 = c00 * (1.0 - fy) + c10 * fy;
        let c1 = c01 * (1.0 - fy) + c11 * fy;

        Some(c0 * (1.0 - fz) + c1 * fz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn gradient_volume(n: usize) -> Array3<f32> {
        Array3::from_shape_fn((n, n, n), |(x, y, z)| (x + y + z) as f32)
    }

    #[test]
    fn test_sample_at_voxel() {
        let data = gradient_volume(5);
        let interp = LinearInterpolator::new();
        let value = interp.sample(&data, &Point3::new([1.0, 2.0, 3.0])).unwrap();
        assert!((value - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_sample_between_voxels() {
        let data = gradient_volume(5);
        let interp = LinearInterpolator::new();
        // The gradient field is linear, so interpolation is exact.
        let value = interp.sample(&data, &Point3::new([1.5, 2.5, 0.5])).unwrap();
        assert!((value - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_sample_outside_is_none() {
        let data = gradient_volume(5);
        let interp = LinearInterpolator::new();
        assert!(interp.sample(&data, &Point3::new([-0.1, 0.0, 0.0])).is_none());
        assert!(interp.sample(&data, &Point3::new([0.0, 4.5, 0.0])).is_none());
    }

    #[test]
    fn test_sample_at_far_corner() {
        let data = gradient_volume(5);
        let interp = LinearInterpolator::new();
        let value = interp.sample(&data, &Point3::new([4.0, 4.0, 4.0])).unwrap();
        assert!((value - 12.0).abs() < 1e-9);
    }
}

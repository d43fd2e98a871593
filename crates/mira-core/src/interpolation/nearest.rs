//! Nearest-neighbor interpolation.

use ndarray::Array3;

use super::trait_::Interpolator;
use crate::spatial::Point3;

/// Nearest-neighbor interpolator, for label maps and quick previews.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborInterpolator;

impl NearestNeighborInterpolator {
    pub fn new() -> Self {
        Self
    }
}

impl Interpolator for NearestNeighborInterpolator {
    fn sample(&self, data: &Array3<f32>, index: &Point3) -> Option<f64> {
        let (nx, ny, nz) = data.dim();
        let x = index[0].round();
        let y = index[1].round();
        let z = index[2].round();

        if x < 0.0 || y < 0.0 || z < 0.0 || x >= nx as f64 || y >= ny as f64 || z >= nz as f64 {
            return None;
        }

        Some(data[[x as usize, y as usize, z as usize]] as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_rounds_to_nearest_voxel() {
        let mut data = Array3::zeros((3, 3, 3));
        data[[1, 2, 0]] = 7.0;
        let interp = NearestNeighborInterpolator::new();
        let value = interp.sample(&data, &Point3::new([1.2, 1.8, 0.3])).unwrap();
        assert_eq!(value, 7.0);
    }

    #[test]
    fn test_outside_is_none() {
        let data = Array3::<f32>::zeros((3, 3, 3));
        let interp = NearestNeighborInterpolator::new();
        assert!(interp.sample(&data, &Point3::new([2.6, 0.0, 0.0])).is_none());
    }
}

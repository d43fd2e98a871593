//! Image type with physical metadata and coordinate transformations.
//!
//! An image combines a 3-D scalar voxel grid with the physical-space
//! metadata (origin, spacing, direction) that maps voxel indices to
//! physical coordinates.

use ndarray::Array3;

use crate::spatial::{Direction3, Point3, Spacing3, Vector3};

/// A 3-D scalar medical image.
///
/// # Coordinate Systems
/// * **Index space**: discrete voxel indices `[x, y, z]`
/// * **Physical space**: continuous coordinates in mm
///
/// The mappings between the two are:
/// `point = origin + Direction * (index * spacing)` and
/// `index = (Direction^-1 * (point - origin)) / spacing`.
///
/// Images are immutable once constructed; registration and evaluation
/// share them by reference.
#[derive(Debug, Clone)]
pub struct Image {
    /// Voxel data, indexed `[x, y, z]`.
    data: Array3<f32>,
    /// Physical coordinate of voxel (0, 0, 0).
    origin: Point3,
    /// Physical distance between voxels along each axis.
    spacing: Spacing3,
    /// Orientation of the image axes.
    direction: Direction3,
    /// Inverse of `direction`, computed once at construction and reused
    /// by every physical-to-index conversion.
    inverse_direction: Direction3,
}

impl Image {
    /// Create a new image with the given data and metadata.
    ///
    /// # Panics
    /// Panics if the direction matrix is not invertible.
    pub fn new(data: Array3<f32>, origin: Point3, spacing: Spacing3, direction: Direction3) -> Self {
        let inverse_direction = direction
            .try_inverse()
            .expect("direction matrix must be invertible");
        Self {
            data,
            origin,
            spacing,
            direction,
            inverse_direction,
        }
    }

    /// Create an image on a unit grid at the origin.
    pub fn from_data(data: Array3<f32>) -> Self {
        Self::new(data, Point3::origin(), Spacing3::ones(), Direction3::identity())
    }

    /// Get the voxel data.
    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    /// Get the origin (physical coordinate of the first voxel).
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Get the spacing (physical distance between voxels).
    pub fn spacing(&self) -> &Spacing3 {
        &self.spacing
    }

    /// Get the direction (orientation matrix).
    pub fn direction(&self) -> &Direction3 {
        &self.direction
    }

    /// Get the image size as `[x, y, z]` voxel counts.
    pub fn shape(&self) -> [usize; 3] {
        let (nx, ny, nz) = self.data.dim();
        [nx, ny, nz]
    }

    /// Convert a physical point to a continuous voxel index.
    pub fn physical_point_to_continuous_index(&self, point: &Point3) -> Point3 {
        let diff = *point - self.origin;
        let rotated = self.inverse_direction * diff;

        let mut index = Point3::origin();
        for i in 0..3 {
            index[i] = rotated[i] / self.spacing[i];
        }
        index
    }

    /// Convert a continuous voxel index to a physical point.
    pub fn continuous_index_to_physical_point(&self, index: &Point3) -> Point3 {
        let mut scaled = Vector3::zeros();
        for i in 0..3 {
            scaled[i] = index[i] * self.spacing[i];
        }
        self.origin + self.direction * scaled
    }

    /// Physical coordinate of the geometric center of the image grid.
    ///
    /// The geometric center is the physical point of the continuous index
    /// `(size - 1) / 2` along each axis; no intensity information is used.
    pub fn geometric_center(&self) -> Point3 {
        let shape = self.shape();
        let center_index = Point3::new([
            (shape[0] as f64 - 1.0) / 2.0,
            (shape[1] as f64 - 1.0) / 2.0,
            (shape[2] as f64 - 1.0) / 2.0,
        ]);
        self.continuous_index_to_physical_point(&center_index)
    }
}

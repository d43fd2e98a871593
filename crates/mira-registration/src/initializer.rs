//! Transform initialization from image geometry.

use mira_core::transform::EulerTransform;
use mira_core::Image;

/// Build an initial rigid transform that aligns the geometric centers of
/// the two images.
///
/// The rotation is zero, the center of rotation is the fixed image's
/// geometric center, and the translation moves that center onto the moving
/// image's geometric center. Only grid geometry is used; voxel intensities
/// play no part.
pub fn center_initializer(fixed: &Image, moving: &Image) -> EulerTransform {
    let fixed_center = fixed.geometric_center();
    let moving_center = moving.geometric_center();
    let translation = moving_center - fixed_center;
    EulerTransform::new([0.0; 3], translation, fixed_center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mira_core::spatial::{Direction3, Point3, Spacing3};
    use mira_core::transform::Transform;
    use ndarray::Array3;

    #[test]
    fn test_identical_geometry_yields_identity() {
        let image = Image::from_data(Array3::zeros((10, 10, 10)));
        let transform = center_initializer(&image, &image);
        assert_eq!(transform.angles(), [0.0; 3]);
        for i in 0..3 {
            assert_relative_eq!(transform.translation()[i], 0.0);
        }
    }

    #[test]
    fn test_translation_matches_center_offset() {
        let fixed = Image::from_data(Array3::zeros((10, 10, 10)));
        let moving = Image::new(
            Array3::zeros((10, 10, 10)),
            Point3::new([5.0, -3.0, 2.0]),
            Spacing3::ones(),
            Direction3::identity(),
        );
        let transform = center_initializer(&fixed, &moving);

        // The fixed center must land exactly on the moving center.
        let mapped = transform.transform_point(&fixed.geometric_center());
        let expected = moving.geometric_center();
        for i in 0..3 {
            assert_relative_eq!(mapped[i], expected[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_center_is_fixed_image_center() {
        let fixed = Image::new(
            Array3::zeros((11, 11, 11)),
            Point3::new([1.0, 2.0, 3.0]),
            Spacing3::new([2.0, 2.0, 2.0]),
            Direction3::identity(),
        );
        let moving = Image::from_data(Array3::zeros((8, 8, 8)));
        let transform = center_initializer(&fixed, &moving);
        assert_eq!(transform.center(), fixed.geometric_center());
    }
}

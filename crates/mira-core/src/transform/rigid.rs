//! Rigid transform (rotation + translation) with a fixed center.

use nalgebra::{Rotation3, Vector3 as NaVector3};
use serde::{Deserialize, Serialize};

use super::trait_::Transform;
use crate::spatial::{Point3, Vector3};

/// Rigid 3-D transform parameterized by ZYX Euler angles.
///
/// `T(x) = R(x - c) + c + t` where `R = Rz(az) * Ry(ay) * Rx(ax)`,
/// `c` is a fixed center of rotation and `t` the translation.
///
/// The optimizable parameter vector is `[ax, ay, az, tx, ty, tz]`
/// (angles in radians, translations in mm); the center is a fixed
/// parameter and is not optimized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EulerTransform {
    angles: [f64; 3],
    translation: Vector3,
    center: Point3,
}

impl EulerTransform {
    /// Create a transform from explicit angles, translation, and center.
    pub fn new(angles: [f64; 3], translation: Vector3, center: Point3) -> Self {
        Self {
            angles,
            translation,
            center,
        }
    }

    /// Identity transform about the given center.
    pub fn identity(center: Point3) -> Self {
        Self::new([0.0; 3], Vector3::zeros(), center)
    }

    /// Euler angles `[ax, ay, az]` in radians.
    pub fn angles(&self) -> [f64; 3] {
        self.angles
    }

    /// Translation component.
    pub fn translation(&self) -> Vector3 {
        self.translation
    }

    /// Fixed center of rotation.
    pub fn center(&self) -> Point3 {
        self.center
    }

    fn rotation(&self) -> Rotation3<f64> {
        // nalgebra's from_euler_angles(r, p, y) builds Rz(y) * Ry(p) * Rx(r),
        // the ZYX convention used here.
        Rotation3::from_euler_angles(self.angles[0], self.angles[1], self.angles[2])
    }
}

impl Transform for EulerTransform {
    fn transform_point(&self, point: &Point3) -> Point3 {
        let centered = NaVector3::new(
            point[0] - self.center[0],
            point[1] - self.center[1],
            point[2] - self.center[2],
        );
        let rotated = self.rotation() * centered;
        Point3::new([
            rotated[0] + self.center[0] + self.translation[0],
            rotated[1] + self.center[1] + self.translation[1],
            rotated[2] + self.center[2] + self.translation[2],
        ])
    }

    fn parameters(&self) -> Vec<f64> {
        vec![
            self.angles[0],
            self.angles[1],
            self.angles[2],
            self.translation[0],
            self.translation[1],
            self.translation[2],
        ]
    }

    fn set_parameters(&mut self, parameters: &[f64]) {
        assert_eq!(parameters.len(), 6, "EulerTransform has 6 parameters");
        self.angles = [parameters[0], parameters[1], parameters[2]];
        self.translation = Vector3::new([parameters[3], parameters[4], parameters[5]]);
    }
}

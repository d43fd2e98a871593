//! Pure translation transform.

use serde::{Deserialize, Serialize};

use super::trait_::Transform;
use crate::spatial::{Point3, Vector3};

/// Translation-only transform: `T(x) = x + t`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationTransform {
    offset: Vector3,
}

impl TranslationTransform {
    /// Create a new translation transform.
    pub fn new(offset: Vector3) -> Self {
        Self { offset }
    }

    /// The translation offset.
    pub fn offset(&self) -> Vector3 {
        self.offset
    }
}

impl Transform for TranslationTransform {
    fn transform_point(&self, point: &Point3) -> Point3 {
        *point + self.offset
    }

    fn parameters(&self) -> Vec<f64> {
        vec![self.offset[0], self.offset[1], self.offset[2]]
    }

    fn set_parameters(&mut self, parameters: &[f64]) {
        assert_eq!(parameters.len(), 3, "TranslationTransform has 3 parameters");
        self.offset = Vector3::new([parameters[0], parameters[1], parameters[2]]);
    }
}

//! Spacing type for representing physical pixel spacing.

use nalgebra::SVector;
use serde::{Deserialize, Serialize};

/// Physical distance between adjacent pixels along each axis (mm).
///
/// All components must be strictly positive. Stored as an nalgebra
/// vector like the sibling [`Vector`](super::Vector) wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing<const D: usize>(SVector<f64, D>);

impl<const D: usize> Spacing<D> {
    /// Create a new spacing.
    ///
    /// # Panics
    /// Panics if any component is not strictly positive.
    pub fn new(components: [f64; D]) -> Self {
        assert!(
            components.iter().all(|&s| s > 0.0),
            "spacing components must be strictly positive"
        );
        Self(SVector::from(components))
    }

    /// Unit spacing (1 mm along every axis).
    pub fn ones() -> Self {
        Self(SVector::repeat(1.0))
    }

    /// Components as a fixed-size array.
    pub fn as_array(&self) -> [f64; D] {
        let mut components = [0.0; D];
        for i in 0..D {
            components[i] = self.0[i];
        }
        components
    }
}

impl<const D: usize> std::ops::Index<usize> for Spacing<D> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<const D: usize> std::ops::IndexMut<usize> for Spacing<D> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

//! Spatial types for points, vectors, spacing, and direction matrices.
//!
//! All types are thin wrappers around nalgebra to give the physical-space
//! quantities used throughout mira distinct, domain-specific names.

pub mod point;
pub mod vector;
pub mod spacing;
pub mod direction;

pub use point::Point;
pub use vector::Vector;
pub use spacing::Spacing;
pub use direction::Direction;

// Images in mira are 3-D; the generic forms exist for the linear algebra.
pub type Point3 = Point<3>;
pub type Vector3 = Vector<3>;
pub type Spacing3 = Spacing<3>;
pub type Direction3 = Direction<3>;

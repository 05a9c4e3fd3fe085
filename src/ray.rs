//! Ray representation for 3D ray tracing.
//!
//! A ray is defined as r(t) = origin + t * direction, representing a semi-infinite
//! line in 3D space used for intersection testing.

use crate::vector::Vector;

/// Ray in 3D space defined by origin and direction.
///
/// Mathematical representation: r(t) = origin + t * direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    ///
    /// For primary rays this is the camera eye position.
    pub origin: Vector,

    /// Direction vector of the ray.
    ///
    /// Not required to be normalized. Camera rays point at a spot on the
    /// viewport, so their length varies across the image.
    pub direction: Vector,
}

impl Ray {
    /// Create a new ray with origin and direction.
    pub fn new(origin: Vector, direction: Vector) -> Self {
        Self { origin, direction }
    }

    /// Compute a point at parameter t along the ray.
    ///
    /// Returns r(t) = origin + t * direction. Negative `t` is allowed and
    /// lands behind the origin.
    pub fn at(&self, t: f64) -> Vector {
        self.origin + t * self.direction
    }
}

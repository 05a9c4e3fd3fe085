//! Sphere primitive for ray tracing.
//!
//! Solves the full quadratic `a t² + b t + c = 0` and keeps only the near root,
//! which gives nearest-hit semantics for an opaque sphere seen from outside.

use crate::ray::Ray;
use crate::vector::Vector;

/// Sphere primitive defined by center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center point of the sphere in world coordinates.
    pub center: Vector,

    /// Radius of the sphere, strictly positive.
    pub radius: f64,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// `radius` must be strictly positive; a degenerate sphere would shade its
    /// hits with the normal of a zero-length vector.
    pub fn new(center: Vector, radius: f64) -> Self {
        debug_assert!(radius > 0.0, "sphere radius must be positive, got {radius}");
        Self { center, radius }
    }

    /// Distance parameter of the near intersection, or `None` on a miss.
    ///
    /// Only the smaller root is considered and it must be strictly positive.
    /// A ray starting inside the sphere therefore misses, because its near
    /// root lies behind the origin. A tangent ray is a single hit.
    pub fn hit(&self, r: &Ray) -> Option<f64> {
        let oc = r.origin - self.center;

        let a = r.direction.dot(r.direction);
        let b = 2.0 * oc.dot(r.direction);
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let t = (-b - discriminant.sqrt()) / (2.0 * a);
        (t > 0.0).then_some(t)
    }
}

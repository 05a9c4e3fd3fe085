//! Per-ray shading.
//!
//! The scene is a single sphere. Hits are colored by their surface normal,
//! misses by a vertical white-to-blue sky gradient.

use crate::ray::Ray;
use crate::sphere::Sphere;
use crate::vector::{Color, Vector};

/// The one sphere in the scene.
pub const SCENE_SPHERE: Sphere = Sphere {
    center: Vector::new(0.0, 0.0, -1.0),
    radius: 0.5,
};

/// Sky color at the horizon.
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

/// Sky color at the zenith.
pub const SKY_BLUE: Color = Color::new(0.5, 0.7, 1.0);

/// Color seen along `r` in the fixed scene.
///
/// `r.direction` must be non-zero.
pub fn ray_color(r: &Ray) -> Color {
    shade(r, &SCENE_SPHERE)
}

/// Color seen along `r` when `sphere` is the only object.
pub fn shade(r: &Ray, sphere: &Sphere) -> Color {
    debug_assert!(r.direction != Vector::ZERO, "cannot shade a ray with zero direction");
    if let Some(t) = sphere.hit(r) {
        let normal = (r.at(t) - sphere.center).normalize();
        // Map each normal component from [-1, 1] to [0, 1]
        return 0.5 * (normal + Color::ONE);
    }

    sky(r)
}

/// Background gradient, blended on the ray's elevation.
pub fn sky(r: &Ray) -> Color {
    debug_assert!(r.direction != Vector::ZERO, "cannot shade a ray with zero direction");
    let unit_direction = r.direction.normalize();
    // Y = -1 (down) gives a = 0, Y = 1 (up) gives a = 1
    let a = 0.5 * (unit_direction.y + 1.0);

    (1.0 - a) * WHITE + a * SKY_BLUE
}

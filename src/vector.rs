//! 3D vector algebra.
//!
//! [`Vector`] is glam's double precision `DVec3`, which already provides the
//! componentwise operators, dot and cross products, length and normalization.
//! [`VectorExt`] adds the two operations the renderer needs on top of it:
//! a normalization that reports degenerate input and Rodrigues rotation.

use glam::DVec3;

use crate::error::RenderError;

/// Three component `f64` vector used for points, directions and colors.
pub type Vector = DVec3;

/// RGB color with each channel nominally in [0, 1].
pub type Color = Vector;

/// Extra vector operations used by the camera and shader.
pub trait VectorExt: Sized {
    /// Unit vector in the same direction.
    ///
    /// Fails with [`RenderError::ZeroLengthVector`] when the length is zero or
    /// not finite.
    fn try_unit(self) -> Result<Self, RenderError>;

    /// Rotate by `angle` radians about `axis` using Rodrigues' formula.
    ///
    /// `axis` must already be unit length. It is not normalized here; a
    /// non-unit axis produces a scaled, skewed result (and trips a debug
    /// assertion).
    fn rotate(self, axis: Self, angle: f64) -> Self;
}

impl VectorExt for Vector {
    fn try_unit(self) -> Result<Self, RenderError> {
        self.try_normalize().ok_or(RenderError::ZeroLengthVector)
    }

    fn rotate(self, axis: Self, angle: f64) -> Self {
        debug_assert!(
            (axis.length_squared() - 1.0).abs() < 1e-6,
            "rotation axis {axis} is not unit length"
        );
        let (sin, cos) = angle.sin_cos();
        self * cos + axis.cross(self) * sin + axis * axis.dot(self) * (1.0 - cos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    #[test]
    fn addition_is_componentwise() {
        let sum = Vector::new(1.0, 2.0, 3.0) + Vector::new(4.0, 5.0, 6.0);
        assert_eq!(sum, Vector::new(5.0, 7.0, 9.0));
        let diff = Vector::new(1.0, 2.0, 3.0) - Vector::new(4.0, 5.0, 6.0);
        assert_eq!(diff, Vector::new(-3.0, -3.0, -3.0));
    }

    #[test]
    fn addition_commutes_and_associates() {
        let a = Vector::new(1.5, -2.0, 3.25);
        let b = Vector::new(-4.0, 0.5, 8.0);
        let c = Vector::new(0.125, 7.0, -1.0);
        assert_eq!(a + b, b + a);
        assert_eq!((a + b) + c, a + (b + c));
    }

    #[test]
    fn scalar_and_componentwise_multiply() {
        let v = Vector::new(1.0, -2.0, 3.0);
        assert_eq!(v * 2.0, Vector::new(2.0, -4.0, 6.0));
        assert_eq!(2.0 * v, v * 2.0);
        assert_eq!(v * Vector::new(2.0, 3.0, 4.0), Vector::new(2.0, -6.0, 12.0));
    }

    #[test]
    fn dot_is_symmetric() {
        let a = Vector::new(1.0, 2.0, 3.0);
        let b = Vector::new(-7.0, 0.5, 2.0);
        assert_eq!(a.dot(b), b.dot(a));
        assert_eq!(a.dot(b), -7.0 + 1.0 + 6.0);
    }

    #[test]
    fn cross_is_right_handed_and_antisymmetric() {
        assert_eq!(Vector::X.cross(Vector::Y), Vector::Z);
        let a = Vector::new(1.0, 2.0, 3.0);
        let b = Vector::new(4.0, 5.0, 6.0);
        assert_eq!(a.cross(b), Vector::new(-3.0, 6.0, -3.0));
        assert_eq!(a.cross(b), -b.cross(a));
    }

    #[test]
    fn unit_vectors_have_length_one() {
        for v in [
            Vector::new(3.0, 4.0, 0.0),
            Vector::new(-0.001, 0.002, 0.0005),
            Vector::new(1e6, -2e6, 3e6),
        ] {
            let unit = v.try_unit().unwrap();
            assert!((unit.length() - 1.0).abs() < EPS);
        }
        assert_eq!(Vector::new(3.0, 4.0, 0.0).length(), 5.0);
    }

    #[test]
    fn zero_vector_cannot_be_normalized() {
        assert_eq!(Vector::ZERO.try_unit(), Err(RenderError::ZeroLengthVector));
        assert_eq!(
            Vector::new(f64::NAN, 0.0, 0.0).try_unit(),
            Err(RenderError::ZeroLengthVector)
        );
    }

    #[test]
    fn quarter_turn_about_z_maps_x_to_y() {
        let rotated = Vector::X.rotate(Vector::Z, FRAC_PI_2);
        assert!(rotated.abs_diff_eq(Vector::Y, EPS));
    }

    #[test]
    fn rotation_preserves_length_and_axis_component() {
        let axis = Vector::new(1.0, 1.0, 1.0).try_unit().unwrap();
        let v = Vector::new(2.0, -1.0, 0.5);
        let rotated = v.rotate(axis, 1.234);
        assert!((rotated.length() - v.length()).abs() < EPS);
        assert!((rotated.dot(axis) - v.dot(axis)).abs() < EPS);
    }

    #[test]
    fn vectors_along_the_axis_are_fixed() {
        let v = Vector::new(0.0, 3.0, 0.0);
        assert!(v.rotate(Vector::Y, PI / 3.0).abs_diff_eq(v, EPS));
    }

    #[test]
    fn full_turn_is_identity() {
        let v = Vector::new(0.3, -0.7, 2.0);
        assert!(v.rotate(Vector::X, 2.0 * PI).abs_diff_eq(v, EPS));
    }
}

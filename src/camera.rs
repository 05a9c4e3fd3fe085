//! Camera for ray generation
//!
//! [`CameraConfig`] is the plain value an interactive shell owns and edits;
//! [`Camera`] is the derived viewport that turns normalized screen coordinates
//! into world-space rays. Reconfiguring always rebuilds every derived vector
//! from scratch, so a camera never mixes old and new state.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::ray::Ray;
use crate::vector::{Vector, VectorExt};

/// User-facing camera parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Point camera is looking from (eye position)
    pub look_from: Vector,
    /// Point camera is looking at (look target)
    pub look_at: Vector,
    /// Camera-relative "up" direction vector
    pub vup: Vector,
    /// Vertical field of view in degrees
    pub vfov: f64,
    /// Viewport width divided by viewport height
    pub aspect_ratio: f64,
}

impl Default for CameraConfig {
    /// Eye at the origin looking down -Z with a 90° vertical field of view.
    fn default() -> Self {
        Self {
            look_from: Vector::ZERO,
            look_at: Vector::new(0.0, 0.0, -1.0),
            vup: Vector::Y,
            vfov: 90.0,
            aspect_ratio: 1.0,
        }
    }
}

impl CameraConfig {
    /// Default eye position and orientation with the given aspect ratio.
    pub fn with_aspect_ratio(aspect_ratio: f64) -> Self {
        Self {
            aspect_ratio,
            ..Self::default()
        }
    }

    /// Explicit eye and target with the default up vector and field of view.
    pub fn looking(look_from: Vector, look_at: Vector, aspect_ratio: f64) -> Self {
        Self {
            look_from,
            look_at,
            aspect_ratio,
            ..Self::default()
        }
    }

    /// Same view with a different aspect ratio.
    pub fn resized(&self, aspect_ratio: f64) -> Self {
        Self {
            aspect_ratio,
            ..*self
        }
    }

    /// Orthonormal camera frame `(u, v, w)`: right, up, and backwards.
    pub fn basis(&self) -> Result<(Vector, Vector, Vector), RenderError> {
        let w = (self.look_from - self.look_at)
            .try_unit()
            .map_err(|_| RenderError::CoincidentEye(self.look_from))?;
        let u = self
            .vup
            .cross(w)
            .try_unit()
            .map_err(|_| RenderError::UpParallelToView(self.vup))?;
        let v = w.cross(u);
        Ok((u, v, w))
    }

    /// Swing the eye around the target.
    ///
    /// `yaw` rotates about `vup` (positive moves the eye toward the camera's
    /// right), then `pitch` rotates about the camera's right axis (positive
    /// raises the eye). Both angles are in radians. The distance to the
    /// target is preserved.
    pub fn orbited(&self, yaw: f64, pitch: f64) -> Result<Self, RenderError> {
        self.basis()?;
        let up = self.vup.try_unit()?;

        let offset = (self.look_from - self.look_at).rotate(up, yaw);
        let right = up
            .cross(offset)
            .try_unit()
            .map_err(|_| RenderError::UpParallelToView(self.vup))?;
        let offset = offset.rotate(right, -pitch);

        let orbited = Self {
            look_from: self.look_at + offset,
            ..*self
        };
        orbited.basis()?;
        Ok(orbited)
    }

    /// Slide eye and target together along the camera's right and up axes.
    pub fn panned(&self, dx: f64, dy: f64) -> Result<Self, RenderError> {
        let (u, v, _) = self.basis()?;
        let shift = dx * u + dy * v;
        Ok(Self {
            look_from: self.look_from + shift,
            look_at: self.look_at + shift,
            ..*self
        })
    }

    /// Move the eye toward the target, dividing their distance by `factor`.
    pub fn zoomed(&self, factor: f64) -> Result<Self, RenderError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(RenderError::InvalidZoom(factor));
        }
        self.basis()?;
        let zoomed = Self {
            look_from: self.look_at + (self.look_from - self.look_at) / factor,
            ..*self
        };
        // A huge factor can round the eye onto the target
        zoomed.basis()?;
        Ok(zoomed)
    }
}

/// Pinhole camera with a precomputed viewport.
///
/// Normalized coordinate `(0, 0)` is the bottom-left corner of the viewport
/// and `(1, 1)` the top-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    config: CameraConfig,
    /// Eye position in world space (same as look_from)
    origin: Vector,
    /// Full viewport width along the camera's right axis
    horizontal: Vector,
    /// Full viewport height along the camera's up axis
    vertical: Vector,
    /// World position of the viewport's bottom-left corner
    lower_left_corner: Vector,
}

impl Camera {
    /// Derive a camera from its configuration.
    ///
    /// Rejects coincident eye and target, an up vector parallel to the view
    /// direction, a non-positive aspect ratio, and a field of view outside
    /// (0°, 180°).
    pub fn new(config: CameraConfig) -> Result<Self, RenderError> {
        if !(config.aspect_ratio.is_finite() && config.aspect_ratio > 0.0) {
            return Err(RenderError::InvalidAspectRatio(config.aspect_ratio));
        }
        if !(config.vfov > 0.0 && config.vfov < 180.0) {
            return Err(RenderError::InvalidFieldOfView(config.vfov));
        }

        // Determine viewport dimensions
        let theta = config.vfov.to_radians();
        let viewport_height = 2.0 * (theta / 2.0).tan();
        let viewport_width = config.aspect_ratio * viewport_height;

        let (u, v, w) = config.basis()?;

        let origin = config.look_from;
        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - w;

        Ok(Self {
            config,
            origin,
            horizontal,
            vertical,
            lower_left_corner,
        })
    }

    /// Camera at the default eye position with the given aspect ratio.
    pub fn with_aspect_ratio(aspect_ratio: f64) -> Result<Self, RenderError> {
        Self::new(CameraConfig::with_aspect_ratio(aspect_ratio))
    }

    /// Camera looking from `look_from` to `look_at` with the default up
    /// vector and field of view.
    pub fn look_at(look_from: Vector, look_at: Vector, aspect_ratio: f64) -> Result<Self, RenderError> {
        Self::new(CameraConfig::looking(look_from, look_at, aspect_ratio))
    }

    /// Replace the configuration and rederive the viewport.
    ///
    /// On error the camera keeps its previous state.
    pub fn update(&mut self, config: CameraConfig) -> Result<(), RenderError> {
        *self = Self::new(config)?;
        Ok(())
    }

    /// Configuration this camera was derived from.
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Eye position.
    pub fn origin(&self) -> Vector {
        self.origin
    }

    /// Vector spanning the viewport from left to right.
    pub fn horizontal(&self) -> Vector {
        self.horizontal
    }

    /// Vector spanning the viewport from bottom to top.
    pub fn vertical(&self) -> Vector {
        self.vertical
    }

    /// Bottom-left corner of the viewport in world space.
    pub fn lower_left_corner(&self) -> Vector {
        self.lower_left_corner
    }

    /// Ray from the eye through normalized viewport coordinate `(s, t)`.
    pub fn get_ray(&self, s: f64, t: f64) -> Ray {
        Ray::new(
            self.origin,
            self.lower_left_corner + s * self.horizontal + t * self.vertical - self.origin,
        )
    }
}

//! Error types shared by the rendering pipeline.
//!
//! Every variant of [`RenderError`] is a caller precondition violation. They are
//! reported up front instead of letting NaN leak into the image.

use thiserror::Error;

use crate::vector::Vector;

/// Invalid geometry, camera or image configuration.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RenderError {
    /// Normalizing a vector of zero (or non-finite) length.
    #[error("cannot normalize a zero-length vector")]
    ZeroLengthVector,

    /// Camera eye and target are the same point.
    #[error("degenerate camera: look_from and look_at are both {0}")]
    CoincidentEye(Vector),

    /// Camera up vector is parallel to the view direction.
    #[error("degenerate camera: up vector {0} is parallel to the view direction")]
    UpParallelToView(Vector),

    /// Aspect ratio is not a positive finite number.
    #[error("aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f64),

    /// Vertical field of view outside (0, 180) degrees.
    #[error("vertical field of view must lie strictly between 0 and 180 degrees, got {0}")]
    InvalidFieldOfView(f64),

    /// Zoom factor is not a positive finite number.
    #[error("zoom factor must be positive and finite, got {0}")]
    InvalidZoom(f64),

    /// Image smaller than 2x2; the pixel to viewport mapping divides by `size - 1`.
    #[error("invalid image size {width}x{height}: both dimensions must be at least 2")]
    InvalidImageSize {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },
}

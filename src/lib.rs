//! Spherecast ray tracer
//!
//! Renders one normal-shaded sphere against a white-to-blue sky by casting a
//! single ray per pixel. The pipeline is pure: a [`Camera`] and an image size
//! go in, a [`PixelBuffer`] comes out. Writing files, streaming to a viewer and
//! background scheduling live in [`sink`] and [`session`].

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod camera;
pub mod config;
pub mod error;
pub mod ray;
pub mod render;
pub mod session;
pub mod shader;
pub mod sink;
pub mod sphere;
pub mod vector;

pub use camera::{Camera, CameraConfig};
pub use error::RenderError;
pub use ray::Ray;
pub use render::{render, PixelBuffer};
pub use shader::ray_color;
pub use sphere::Sphere;
pub use vector::{Color, Vector, VectorExt};

//! # Image sinks
//!
//! A rendered [`PixelBuffer`] is handed to an [`ImageSink`], which turns it into
//! something a front end can show or keep:
//! - [`DisplaySink`]: in-memory 8-bit RGB image for a view to draw
//! - [`PngSink`]: 8-bit PNG file
//! - [`ExrSink`]: linear 32-bit OpenEXR file
//! - [`TevSink`]: live upload to a running tev viewer over TCP
//!
//! ## Tone curves
//!
//! Shaded colors are already in [0, 1]. [`ToneCurve::Linear`] writes them
//! straight into bytes; [`ToneCurve::Srgb`] applies the sRGB transfer
//! function first. EXR and tev always receive the linear values.

use std::net::TcpStream;
use std::path::{Path, PathBuf};

use exr::prelude::write_rgb_file;
use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tev_client::{PacketCreateImage, PacketUpdateImage, TevClient};
use thiserror::Error;

use crate::render::PixelBuffer;

/// Default tev port, used when an address has none.
pub const TEV_DEFAULT_PORT: u16 = 14158;

/// Failure while publishing an image.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Encoding or writing an 8-bit image failed.
    #[error("failed to write image {path:?}: {source}")]
    Image {
        /// Destination file
        path: PathBuf,
        /// Underlying encoder error
        #[source]
        source: image::ImageError,
    },

    /// Writing an OpenEXR file failed.
    #[error("failed to write EXR image {path:?}: {source}")]
    Exr {
        /// Destination file
        path: PathBuf,
        /// Underlying EXR error
        #[source]
        source: exr::error::Error,
    },

    /// Connecting or sending to tev failed.
    #[error("failed to send image to tev at {address}: {source}")]
    Tev {
        /// Address the connection was attempted on
        address: String,
        /// Underlying socket error
        #[source]
        source: std::io::Error,
    },

    /// The output path has no supported extension.
    #[error("unsupported output file {0:?}: only .png and .exr are supported")]
    UnsupportedFormat(PathBuf),
}

/// Destination for a finished render.
pub trait ImageSink {
    /// What publishing produces, such as a displayable image or nothing.
    type Output;

    /// Hand over a complete image.
    fn publish(&mut self, image: &PixelBuffer) -> Result<Self::Output, SinkError>;
}

/// Mapping from linear channel values to display bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneCurve {
    /// Byte = round(value * 255)
    #[default]
    Linear,
    /// sRGB transfer function before quantization
    Srgb,
}

impl ToneCurve {
    /// Convert one linear channel to a byte, clamping to [0, 1] first.
    pub fn encode(self, linear: f32) -> u8 {
        let linear = linear.clamp(0.0, 1.0);
        let encoded = match self {
            ToneCurve::Linear => linear,
            ToneCurve::Srgb if linear <= 0.0031308 => 12.92 * linear,
            ToneCurve::Srgb => 1.055 * linear.powf(1.0 / 2.4) - 0.055,
        };
        (encoded * 255.0).round() as u8
    }
}

/// Produces an in-memory 8-bit image ready for display.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplaySink {
    /// Curve applied while quantizing
    pub tone: ToneCurve,
}

impl ImageSink for DisplaySink {
    type Output = RgbImage;

    fn publish(&mut self, image: &PixelBuffer) -> Result<RgbImage, SinkError> {
        let tone = self.tone;
        Ok(ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
            let pixel = image.get_pixel(x, y);
            Rgb([tone.encode(pixel[0]), tone.encode(pixel[1]), tone.encode(pixel[2])])
        }))
    }
}

/// Writes an 8-bit PNG file.
#[derive(Debug, Clone)]
pub struct PngSink {
    /// Destination file
    pub path: PathBuf,
    /// Curve applied while quantizing
    pub tone: ToneCurve,
}

impl ImageSink for PngSink {
    type Output = ();

    fn publish(&mut self, image: &PixelBuffer) -> Result<(), SinkError> {
        let ldr = DisplaySink { tone: self.tone }.publish(image)?;
        ldr.save_with_format(&self.path, ImageFormat::Png)
            .map_err(|source| SinkError::Image {
                path: self.path.clone(),
                source,
            })?;
        info!("Image saved as {}", self.path.display());
        Ok(())
    }
}

/// Writes a linear 32-bit float OpenEXR file.
#[derive(Debug, Clone)]
pub struct ExrSink {
    /// Destination file
    pub path: PathBuf,
}

impl ImageSink for ExrSink {
    type Output = ();

    fn publish(&mut self, image: &PixelBuffer) -> Result<(), SinkError> {
        write_rgb_file(&self.path, image.width() as usize, image.height() as usize, |x, y| {
            let pixel = image.get_pixel(x as u32, y as u32);
            (pixel[0], pixel[1], pixel[2])
        })
        .map_err(|source| SinkError::Exr {
            path: self.path.clone(),
            source,
        })?;
        info!("HDR image saved as EXR: {}", self.path.display());
        Ok(())
    }
}

/// Streams images to a tev viewer.
#[derive(Debug, Clone)]
pub struct TevSink {
    address: String,
    /// Name the image is shown under in tev
    pub image_name: String,
}

impl TevSink {
    /// Sink for `address`, appending the default port when none is given.
    pub fn new(address: &str) -> Self {
        let address = if address.contains(':') {
            address.to_string()
        } else {
            format!("{}:{}", address, TEV_DEFAULT_PORT)
        };
        Self {
            address,
            image_name: "spherecast".to_string(),
        }
    }

    /// Resolved `host:port` address.
    pub fn address(&self) -> &str {
        &self.address
    }

    fn tev_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Tev {
            address: self.address.clone(),
            source,
        }
    }
}

impl ImageSink for TevSink {
    type Output = ();

    fn publish(&mut self, image: &PixelBuffer) -> Result<(), SinkError> {
        let (width, height) = image.dimensions();
        debug!("Connecting to tev at {}", self.address);

        let stream = TcpStream::connect(&self.address).map_err(|e| self.tev_error(e))?;
        if let Err(e) = stream.set_nodelay(true) {
            debug!("Failed to set TCP_NODELAY: {}", e);
        }
        let mut client = TevClient::wrap(stream);

        client
            .send(PacketCreateImage {
                image_name: &self.image_name,
                grab_focus: true,
                width,
                height,
                channel_names: &["R", "G", "B"],
            })
            .map_err(|e| self.tev_error(e))?;

        let (planar, pixel_count) = planar_rgb(image);

        let start_time = std::time::Instant::now();
        client
            .send(PacketUpdateImage {
                image_name: &self.image_name,
                grab_focus: false,
                channel_names: &["R", "G", "B"],
                channel_offsets: &[0, pixel_count, 2 * pixel_count],
                channel_strides: &[1, 1, 1],
                x: 0,
                y: 0,
                width,
                height,
                data: &planar,
            })
            .map_err(|e| self.tev_error(e))?;

        info!("Image sent to tev at {} in {:.2?}", self.address, start_time.elapsed());
        Ok(())
    }
}

/// Split interleaved RGB into tev's planar layout (RRR...GGG...BBB...).
///
/// Also returns the per-channel length, which is the offset of the green plane.
fn planar_rgb(image: &PixelBuffer) -> (Vec<f32>, u64) {
    let (width, height) = image.dimensions();
    let pixel_count = width as usize * height as usize;
    let mut planar = vec![0.0f32; pixel_count * 3];
    for (index, pixel) in image.pixels().enumerate() {
        planar[index] = pixel[0];
        planar[pixel_count + index] = pixel[1];
        planar[2 * pixel_count + index] = pixel[2];
    }
    (planar, pixel_count as u64)
}

/// File sink chosen by the extension of `path` (`.png` or `.exr`).
pub fn file_sink(path: &Path, tone: ToneCurve) -> Result<Box<dyn ImageSink<Output = ()>>, SinkError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => Ok(Box::new(PngSink {
            path: path.to_path_buf(),
            tone,
        })),
        Some("exr") => Ok(Box::new(ExrSink {
            path: path.to_path_buf(),
        })),
        _ => Err(SinkError::UnsupportedFormat(path.to_path_buf())),
    }
}

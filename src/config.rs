//! Render settings loaded from a TOML file.
//!
//! ```toml
//! [image]
//! width = 800
//! height = 450
//!
//! [camera]
//! look_from = [0.0, 0.5, 1.0]
//! look_at = [0.0, 0.0, -1.0]
//! vfov = 60.0
//! # aspect_ratio defaults to width / height
//!
//! [output]
//! path = "sphere.png"
//! tone_curve = "srgb"
//! tev_address = "localhost"
//! ```
//!
//! Every table and key is optional.

use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::camera::CameraConfig;
use crate::sink::ToneCurve;
use crate::vector::Vector;

/// Default location of the settings file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Failure while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path:?}: {source}")]
    Read {
        /// File that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`RenderConfig`].
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        /// File that was parsed
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },
}

/// Complete render settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// `[image]` table
    pub image: ImageConfig,
    /// `[camera]` table
    pub camera: CameraSettings,
    /// `[output]` table
    pub output: OutputConfig,
}

/// Output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Camera overrides; anything unset falls back to [`CameraConfig::default`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraSettings {
    /// Eye position
    pub look_from: Option<Vector>,
    /// Look target
    pub look_at: Option<Vector>,
    /// Up direction
    pub vup: Option<Vector>,
    /// Vertical field of view in degrees
    pub vfov: Option<f64>,
    /// Derived from the image size when unset
    pub aspect_ratio: Option<f64>,
}

impl CameraSettings {
    /// Fill in defaults for an image of the given size.
    pub fn resolve(&self, width: u32, height: u32) -> CameraConfig {
        let defaults = CameraConfig::default();
        CameraConfig {
            look_from: self.look_from.unwrap_or(defaults.look_from),
            look_at: self.look_at.unwrap_or(defaults.look_at),
            vup: self.vup.unwrap_or(defaults.vup),
            vfov: self.vfov.unwrap_or(defaults.vfov),
            aspect_ratio: self
                .aspect_ratio
                .unwrap_or_else(|| f64::from(width) / f64::from(height)),
        }
    }
}

/// Where the finished image goes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// `.png` or `.exr` file
    pub path: PathBuf,
    /// Byte encoding for PNG output
    pub tone_curve: ToneCurve,
    /// Also stream the image to tev at this address
    pub tev_address: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("output.png"),
            tone_curve: ToneCurve::Linear,
            tev_address: None,
        }
    }
}

impl RenderConfig {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read and parse a settings file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if given, otherwise [`DEFAULT_CONFIG_PATH`] when it exists,
    /// otherwise the built-in defaults.
    ///
    /// An explicitly requested file that is missing is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    debug!("No {} found, using built-in settings", DEFAULT_CONFIG_PATH);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Camera configuration for the configured image size.
    pub fn camera_config(&self) -> CameraConfig {
        self.camera.resolve(self.image.width, self.image.height)
    }
}

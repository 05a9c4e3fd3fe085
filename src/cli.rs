use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use spherecast::vector::Vector;

/// Verbosity accepted by `--debug-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Failures only
    Error,
    /// Failures and skipped outputs, such as an unreachable tev viewer
    Warn,
    /// Startup banner, resolution and render timing
    Info,
    /// Camera parameters and sink connections
    Debug,
    /// Everything
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Debug, Parser)]
#[command(name = "spherecast")]
#[command(about = "Render a normal-shaded sphere under a gradient sky")]
pub struct Args {
    /// Shorthand for --debug-level debug
    #[arg(short, long)]
    pub verbose: bool,

    /// TOML settings file (config.toml is used when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, help = "Image width in pixels")]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long, help = "Image height in pixels")]
    pub height: Option<u32>,

    /// Vertical field of view in degrees
    #[arg(long)]
    pub vfov: Option<f64>,

    /// Camera position as X,Y,Z
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
    pub look_from: Option<Vector>,

    /// Camera target as X,Y,Z
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
    pub look_at: Option<Vector>,

    /// Orbit the camera around its target by YAW,PITCH degrees
    #[arg(long, value_parser = parse_orbit, allow_hyphen_values = true)]
    pub orbit: Option<(f64, f64)>,

    /// Output file path (.png for 8-bit, .exr for linear float)
    #[arg(short, long, help = "Output file path (.png for 8-bit, .exr for linear float)")]
    pub output: Option<PathBuf>,

    /// Apply the sRGB transfer curve when writing 8-bit images
    #[arg(long)]
    pub srgb: bool,

    /// Send image to tev for visualization
    #[arg(long, help = "Send image to tev for visualization")]
    pub tev: bool,

    /// tev IP address and port (automatically enables --tev)
    #[arg(long, help = "tev IP address and port (automatically enables --tev)")]
    pub tev_address: Option<String>,
}

impl Args {
    /// Effective log level, taking --verbose into account.
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug.max(self.debug_level.into())
        } else {
            self.debug_level.into()
        }
    }
}

fn parse_components<const N: usize>(s: &str) -> Result<[f64; N], String> {
    let values = s
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|e| format!("{part:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    values
        .try_into()
        .map_err(|values: Vec<f64>| format!("expected {N} comma-separated numbers, got {}", values.len()))
}

fn parse_vector(s: &str) -> Result<Vector, String> {
    parse_components::<3>(s).map(Vector::from_array)
}

fn parse_orbit(s: &str) -> Result<(f64, f64), String> {
    parse_components::<2>(s).map(|[yaw, pitch]| (yaw, pitch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_everything_to_the_config() {
        let args = Args::parse_from(["spherecast"]);
        assert!(args.config.is_none());
        assert!(args.width.is_none());
        assert!(args.output.is_none());
        assert_eq!(args.log_level(), LevelFilter::Info);
    }

    #[test]
    fn vectors_parse_from_comma_lists() {
        let args = Args::parse_from([
            "spherecast",
            "--look-from",
            "0,1.5,-2",
            "--orbit",
            "-30,10",
        ]);
        assert_eq!(args.look_from, Some(Vector::new(0.0, 1.5, -2.0)));
        assert_eq!(args.orbit, Some((-30.0, 10.0)));
    }

    #[test]
    fn wrong_vector_arity_is_rejected() {
        assert!(Args::try_parse_from(["spherecast", "--look-at", "1,2"]).is_err());
        assert!(Args::try_parse_from(["spherecast", "--orbit", "1,2,3"]).is_err());
        assert!(Args::try_parse_from(["spherecast", "--look-at", "1,x,2"]).is_err());
    }

    #[test]
    fn verbose_raises_the_level() {
        let args = Args::parse_from(["spherecast", "-v"]);
        assert_eq!(args.log_level(), LevelFilter::Debug);
        let args = Args::parse_from(["spherecast", "-v", "--debug-level", "trace"]);
        assert_eq!(args.log_level(), LevelFilter::Trace);
    }
}

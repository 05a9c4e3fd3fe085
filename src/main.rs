use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use spherecast::config::RenderConfig;
use spherecast::render::render_with_progress;
use spherecast::sink::{file_sink, ImageSink, TevSink, ToneCurve};
use spherecast::Camera;

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;

fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(args.log_level())?;

    // Log application startup with version information
    info!("Spherecast - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    let mut settings = RenderConfig::load_or_default(args.config.as_deref())
        .context("failed to load render settings")?;
    apply_overrides(&mut settings, &args);

    let (width, height) = (settings.image.width, settings.image.height);
    info!("Image resolution: {}x{}", width, height);

    let mut camera_config = settings.camera_config();
    if let Some((yaw, pitch)) = args.orbit {
        camera_config = camera_config
            .orbited(yaw.to_radians(), pitch.to_radians())
            .context("cannot orbit the camera")?;
    }
    let camera = Camera::new(camera_config).context("invalid camera configuration")?;

    // Resolve the output format before spending time on the render
    let mut output = file_sink(&settings.output.path, settings.output.tone_curve)?;

    let pb = ProgressBar::new(u64::from(height));
    pb.set_style(ProgressStyle::default_bar().template("{bar:40} {pos}/{len} rows ETA: {eta}")?);
    let image = render_with_progress(width, height, &camera, &pb).context("rendering failed")?;

    if let Some(address) = settings.output.tev_address.as_deref() {
        if let Err(e) = TevSink::new(address).publish(&image) {
            warn!("{}", e);
        }
    }

    output
        .publish(&image)
        .with_context(|| format!("failed to save {}", settings.output.path.display()))?;

    Ok(())
}

/// Command line flags take precedence over the settings file.
fn apply_overrides(settings: &mut RenderConfig, args: &Args) {
    if let Some(width) = args.width {
        settings.image.width = width;
    }
    if let Some(height) = args.height {
        settings.image.height = height;
    }
    if let Some(vfov) = args.vfov {
        settings.camera.vfov = Some(vfov);
    }
    if let Some(look_from) = args.look_from {
        settings.camera.look_from = Some(look_from);
    }
    if let Some(look_at) = args.look_at {
        settings.camera.look_at = Some(look_at);
    }
    if let Some(output) = &args.output {
        settings.output.path = output.clone();
    }
    if args.srgb {
        settings.output.tone_curve = ToneCurve::Srgb;
    }
    if let Some(address) = &args.tev_address {
        settings.output.tev_address = Some(address.clone());
    } else if args.tev && settings.output.tev_address.is_none() {
        settings.output.tev_address = Some("localhost".to_string());
    }
}

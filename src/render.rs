//! Pixel buffer rasterization.
//!
//! Casts one ray per pixel through the camera viewport and writes the shaded
//! color into a row-major RGB buffer whose first row is the top of the image.
//! Rows are independent, so they are rendered in parallel with Rayon.

use image::{ImageBuffer, Rgb};
use indicatif::ProgressBar;
use log::{debug, info};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::error::RenderError;
use crate::shader::ray_color;

/// Linear RGB image with `f32` channels in [0, 1].
pub type PixelBuffer = ImageBuffer<Rgb<f32>, Vec<f32>>;

/// Render the scene as seen by `camera` into a `width` x `height` buffer.
///
/// Both dimensions must be at least 2: pixel column `i` maps to
/// `u = i / (width - 1)` and row `j` to `v = j / (height - 1)`.
pub fn render(width: u32, height: u32, camera: &Camera) -> Result<PixelBuffer, RenderError> {
    render_with_progress(width, height, camera, &ProgressBar::hidden())
}

/// Same as [`render`], advancing `progress` by one for every finished row.
pub fn render_with_progress(
    width: u32,
    height: u32,
    camera: &Camera,
    progress: &ProgressBar,
) -> Result<PixelBuffer, RenderError> {
    if width < 2 || height < 2 {
        return Err(RenderError::InvalidImageSize { width, height });
    }

    let mut image = PixelBuffer::new(width, height);
    let u_span = f64::from(width - 1);
    let v_span = f64::from(height - 1);
    let row_len = width as usize * 3;

    info!("Rendering {}x{} using {} CPU cores...", width, height, rayon::current_num_threads());
    debug!("Camera: {:?}", camera.config());
    progress.set_length(u64::from(height));
    let generation_start = std::time::Instant::now();

    image.par_chunks_mut(row_len).enumerate().for_each(|(row, pixels)| {
        // Buffer row 0 is the top of the image, where v = 1
        let j = height - 1 - row as u32;
        let v = f64::from(j) / v_span;

        for (i, pixel) in pixels.chunks_exact_mut(3).enumerate() {
            let u = i as f64 / u_span;
            let color = ray_color(&camera.get_ray(u, v));
            pixel.copy_from_slice(&[color.x as f32, color.y as f32, color.z as f32]);
        }
        progress.inc(1);
    });

    progress.finish();
    info!("Image generated in {:.2?}", generation_start.elapsed());

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector;

    #[test]
    fn tiny_images_are_rejected() {
        let camera = Camera::with_aspect_ratio(1.0).unwrap();
        for (width, height) in [(0, 10), (1, 10), (10, 1), (0, 0)] {
            assert_eq!(
                render(width, height, &camera).unwrap_err(),
                RenderError::InvalidImageSize { width, height }
            );
        }
    }

    #[test]
    fn smallest_image_holds_the_viewport_corners() {
        let camera = Camera::with_aspect_ratio(1.0).unwrap();
        let image = render(2, 2, &camera).unwrap();
        let expect = |u: f64, v: f64| {
            let c = ray_color(&camera.get_ray(u, v));
            Rgb([c.x as f32, c.y as f32, c.z as f32])
        };
        assert_eq!(*image.get_pixel(0, 0), expect(0.0, 1.0));
        assert_eq!(*image.get_pixel(1, 0), expect(1.0, 1.0));
        assert_eq!(*image.get_pixel(0, 1), expect(0.0, 0.0));
        assert_eq!(*image.get_pixel(1, 1), expect(1.0, 0.0));
    }

    #[test]
    fn every_pixel_matches_its_own_ray() {
        let camera = Camera::look_at(Vector::new(0.3, 0.2, 0.5), Vector::new(0.0, 0.0, -1.0), 16.0 / 9.0).unwrap();
        let (width, height) = (16, 9);
        let image = render(width, height, &camera).unwrap();
        assert_eq!(image.dimensions(), (width, height));

        for (x, y, pixel) in image.enumerate_pixels() {
            let u = f64::from(x) / f64::from(width - 1);
            let v = f64::from(height - 1 - y) / f64::from(height - 1);
            let c = ray_color(&camera.get_ray(u, v));
            assert_eq!(*pixel, Rgb([c.x as f32, c.y as f32, c.z as f32]), "pixel ({x}, {y})");
        }
    }

    #[test]
    fn top_rows_are_bluer_than_bottom_rows() {
        let camera = Camera::with_aspect_ratio(1.0).unwrap();
        let image = render(20, 20, &camera).unwrap();
        // Red drops toward the zenith in the sky gradient
        assert!(image.get_pixel(0, 0)[0] < image.get_pixel(0, 19)[0]);
    }

    #[test]
    fn progress_counts_rows() {
        let camera = Camera::with_aspect_ratio(2.0).unwrap();
        let progress = ProgressBar::hidden();
        render_with_progress(8, 5, &camera, &progress).unwrap();
        assert_eq!(progress.position(), 5);
        assert_eq!(progress.length(), Some(5));
    }
}

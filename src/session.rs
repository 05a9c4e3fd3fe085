//! Background rendering for interactive front ends.
//!
//! [`render`](crate::render::render) itself is synchronous and cannot be
//! interrupted. A front end that keeps changing the camera runs each render on
//! a worker thread and attaches a [`CancellationToken`]; a job whose token was
//! cancelled still finishes computing but its image is discarded instead of
//! being published.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use log::debug;

use crate::camera::{Camera, CameraConfig};
use crate::error::RenderError;
use crate::render::{render, PixelBuffer};

/// Shared flag telling a render job its result is no longer wanted.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the job as abandoned. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// A render running on its own thread.
#[derive(Debug)]
pub struct RenderJob {
    handle: JoinHandle<Result<PixelBuffer, RenderError>>,
    token: CancellationToken,
}

impl RenderJob {
    /// Token controlling this job.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Block until the render finishes.
    ///
    /// Returns `Ok(None)` when the job was cancelled before it could publish.
    /// A panic on the worker thread is propagated to the caller.
    pub fn wait(self) -> Result<Option<PixelBuffer>, RenderError> {
        let image = match self.handle.join() {
            Ok(result) => result?,
            Err(panic) => std::panic::resume_unwind(panic),
        };
        if self.token.is_cancelled() {
            debug!("Discarding cancelled render");
            return Ok(None);
        }
        Ok(Some(image))
    }

    /// Whether the worker thread has returned.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the worker exits, dropping whatever it produced.
    fn discard(self) {
        if self.handle.join().is_err() {
            debug!("Abandoned render panicked");
        }
    }
}

/// Start rendering `camera` on a new thread.
pub fn spawn_render(width: u32, height: u32, camera: Camera, token: CancellationToken) -> RenderJob {
    let handle = std::thread::spawn(move || render(width, height, &camera));
    RenderJob { handle, token }
}

/// Owns the camera of an interactive view and its newest render job.
///
/// Every reconfiguration abandons the previous job, so only the image for the
/// latest camera is ever published.
///
/// An abandoned job keeps running until its frame is done. At most one such
/// job is kept draining: abandoning another first joins the older one, so
/// rapid reconfiguration never holds more than two render threads.
#[derive(Debug)]
pub struct RenderSession {
    width: u32,
    height: u32,
    camera: Camera,
    in_flight: Option<RenderJob>,
    draining: Option<RenderJob>,
}

impl RenderSession {
    /// Session rendering `width` x `height` images with the given camera.
    pub fn new(width: u32, height: u32, config: CameraConfig) -> Result<Self, RenderError> {
        if width < 2 || height < 2 {
            return Err(RenderError::InvalidImageSize { width, height });
        }
        Ok(Self {
            width,
            height,
            camera: Camera::new(config)?,
            in_flight: None,
            draining: None,
        })
    }

    /// Current camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Start a render for the current camera, cancelling any older one.
    pub fn refresh(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            previous.token().cancel();
            if let Some(stale) = self.draining.replace(previous) {
                stale.discard();
            }
        }
        self.in_flight = Some(spawn_render(
            self.width,
            self.height,
            self.camera,
            CancellationToken::new(),
        ));
    }

    /// Switch to a new camera configuration and start rendering it.
    ///
    /// An invalid configuration leaves the camera and the running job alone.
    pub fn reconfigure(&mut self, config: CameraConfig) -> Result<(), RenderError> {
        self.camera.update(config)?;
        self.refresh();
        Ok(())
    }

    /// Wait for the newest job, if any, and return its image.
    pub fn latest(&mut self) -> Result<Option<PixelBuffer>, RenderError> {
        match self.in_flight.take() {
            Some(job) => job.wait(),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector;

    #[test]
    fn uncancelled_job_publishes() {
        let camera = Camera::with_aspect_ratio(1.0).unwrap();
        let job = spawn_render(6, 6, camera, CancellationToken::new());
        let image = job.wait().unwrap().expect("job was not cancelled");
        assert_eq!(image, render(6, 6, &camera).unwrap());
    }

    #[test]
    fn cancelled_job_is_discarded() {
        let camera = Camera::with_aspect_ratio(1.0).unwrap();
        let token = CancellationToken::new();
        let job = spawn_render(6, 6, camera, token.clone());
        token.cancel();
        assert_eq!(job.wait().unwrap(), None);
    }

    #[test]
    fn job_reports_render_errors() {
        let camera = Camera::with_aspect_ratio(1.0).unwrap();
        let job = spawn_render(1, 6, camera, CancellationToken::new());
        assert_eq!(
            job.wait().unwrap_err(),
            RenderError::InvalidImageSize { width: 1, height: 6 }
        );
    }

    #[test]
    fn reconfigure_cancels_previous_job() {
        let mut session = RenderSession::new(8, 8, CameraConfig::default()).unwrap();
        session.refresh();
        let first = session.in_flight.as_ref().unwrap().token().clone();

        let moved = CameraConfig::default().panned(0.25, 0.0).unwrap();
        session.reconfigure(moved).unwrap();
        assert!(first.is_cancelled());
        assert_eq!(session.camera().config(), &moved);

        let image = session.latest().unwrap().unwrap();
        assert_eq!(image, render(8, 8, &Camera::new(moved).unwrap()).unwrap());
        assert_eq!(session.latest().unwrap(), None);
    }

    #[test]
    fn rapid_refreshes_keep_at_most_two_jobs() {
        let mut session = RenderSession::new(64, 64, CameraConfig::default()).unwrap();
        session.refresh();
        let first = session.in_flight.as_ref().unwrap().token().clone();
        session.refresh();
        let second = session.in_flight.as_ref().unwrap().token().clone();
        session.refresh();

        // The first job was joined when the second one was abandoned
        assert!(first.is_cancelled());
        let draining = session.draining.as_ref().unwrap();
        assert!(Arc::ptr_eq(&draining.token().0, &second.0));
        assert!(draining.token().is_cancelled());
        assert!(!session.in_flight.as_ref().unwrap().token().is_cancelled());

        assert!(session.latest().unwrap().is_some());
    }

    #[test]
    fn job_reports_when_its_thread_returns() {
        let camera = Camera::with_aspect_ratio(1.0).unwrap();
        let job = spawn_render(4, 4, camera, CancellationToken::new());
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(30);
        while !job.is_finished() && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        assert!(job.is_finished());
        assert!(job.wait().unwrap().is_some());
    }

    #[test]
    fn invalid_reconfiguration_keeps_session_state() {
        let mut session = RenderSession::new(4, 4, CameraConfig::default()).unwrap();
        let before = *session.camera();
        let broken = CameraConfig::looking(Vector::ONE, Vector::ONE, 1.0);
        assert!(session.reconfigure(broken).is_err());
        assert_eq!(session.camera(), &before);
        assert!(session.in_flight.is_none());
    }

    #[test]
    fn session_rejects_tiny_images() {
        assert!(RenderSession::new(1, 1, CameraConfig::default()).is_err());
    }
}

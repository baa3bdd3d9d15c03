//! Traits for the external collaborators feeding the pipeline.

use std::marker::PhantomData;

use nalgebra::Vector2;

use crate::tracks::TrackedDetection;

/// Object detector combined with an identity-assigning tracker.
///
/// Implement this trait to connect any detection model to the pipeline.
///
/// # Example
///
/// ```ignore
/// use court_tracks::{DetectionSource, TrackedDetection};
///
/// struct MyDetector {
///     // Your model and tracker here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Frame = Vec<u8>;
///     type Error = std::io::Error;
///
///     fn detect(
///         &mut self,
///         frames: &[Vec<u8>],
///     ) -> Result<Vec<Vec<TrackedDetection>>, Self::Error> {
///         Ok(vec![vec![]; frames.len()])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Decoded video frame.
    type Frame;
    /// Error type for detection failures.
    type Error;

    /// Run detection and tracking on a batch of consecutive frames.
    ///
    /// Called with batches in frame order; tracker state is expected to carry
    /// over between calls. Must return exactly one list per input frame.
    fn detect(
        &mut self,
        frames: &[Self::Frame],
    ) -> Result<Vec<Vec<TrackedDetection>>, Self::Error>;
}

/// Camera ego-motion estimator.
pub trait CameraMotionSource {
    /// Decoded video frame.
    type Frame;
    /// Error type for estimation failures.
    type Error;

    /// Per-frame camera displacement in pixels, relative to the first frame.
    fn camera_motion(&mut self, frames: &[Self::Frame]) -> Result<Vec<Vector2<f64>>, Self::Error>;
}

/// Camera source for a static camera: zero displacement on every frame.
#[derive(Debug, Clone)]
pub struct StaticCamera<F> {
    _frame: PhantomData<F>,
}

impl<F> StaticCamera<F> {
    pub fn new() -> Self {
        Self {
            _frame: PhantomData,
        }
    }
}

impl<F> Default for StaticCamera<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> CameraMotionSource for StaticCamera<F> {
    type Frame = F;
    type Error = std::convert::Infallible;

    fn camera_motion(&mut self, frames: &[F]) -> Result<Vec<Vector2<f64>>, Self::Error> {
        Ok(vec![Vector2::zeros(); frames.len()])
    }
}

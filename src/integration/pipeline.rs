//! TrackingPipeline for combining detection with the tracking-data stages.

use std::path::PathBuf;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cache;
use crate::error::{Error, Result};
use crate::interpolation::interpolate_ball_positions;
use crate::kinematics::{KinematicsConfig, SpeedDistanceEstimator};
use crate::tracks::{TrackStore, TrackedDetection, add_adjusted_positions, add_positions};
use crate::view::{CourtCalibration, ViewTransformer};

use super::{CameraMotionSource, DetectionSource};

/// Configuration for the TrackingPipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Frames per detector call
    pub batch_size: usize,
    /// Where the track store is persisted after detection
    pub cache_path: Option<PathBuf>,
    /// Load the track store from `cache_path` instead of running detection
    pub read_from_cache: bool,
    pub calibration: CourtCalibration,
    pub kinematics: KinematicsConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 20,
            cache_path: None,
            read_from_cache: false,
            calibration: CourtCalibration::default(),
            kinematics: KinematicsConfig::default(),
        }
    }
}

/// Run every stage after detection on an existing store, in order: ball
/// interpolation, anchor positions, camera adjustment, court mapping, speed
/// and distance.
///
/// Running it again on its own output reproduces the same store.
pub fn annotate_tracks(
    store: &mut TrackStore,
    camera_motion: &[Vector2<f64>],
    calibration: &CourtCalibration,
    kinematics: &KinematicsConfig,
) -> Result<()> {
    let view = ViewTransformer::new(calibration)?;
    let estimator = SpeedDistanceEstimator::new(kinematics.clone())?;
    run_stages(store, camera_motion, &view, &estimator)
}

fn run_stages(
    store: &mut TrackStore,
    camera_motion: &[Vector2<f64>],
    view: &ViewTransformer,
    estimator: &SpeedDistanceEstimator,
) -> Result<()> {
    interpolate_ball_positions(store)?;
    add_positions(store);
    add_adjusted_positions(store, camera_motion)?;
    view.add_transformed_positions(store);
    estimator.add_speed_and_distance(store);
    Ok(())
}

fn source_error<E>(err: E) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    Error::Source(Box::new(err))
}

/// A combined pipeline that bundles detection, camera motion and the
/// tracking-data stages.
pub struct TrackingPipeline<D, C> {
    detector: D,
    camera: C,
    config: PipelineConfig,
    view: ViewTransformer,
    estimator: SpeedDistanceEstimator,
}

impl<D, C> TrackingPipeline<D, C>
where
    D: DetectionSource,
    D::Error: std::error::Error + Send + Sync + 'static,
    C: CameraMotionSource<Frame = D::Frame>,
    C::Error: std::error::Error + Send + Sync + 'static,
{
    /// Create a new pipeline, validating the calibration and configuration.
    pub fn new(detector: D, camera: C, config: PipelineConfig) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(Error::InvalidConfig(
                "batch_size must be positive".to_string(),
            ));
        }
        let view = ViewTransformer::new(&config.calibration)?;
        let estimator = SpeedDistanceEstimator::new(config.kinematics.clone())?;
        Ok(Self {
            detector,
            camera,
            config,
            view,
            estimator,
        })
    }

    /// Create a new pipeline with the default configuration.
    pub fn with_default_config(detector: D, camera: C) -> Result<Self> {
        Self::new(detector, camera, PipelineConfig::default())
    }

    /// Run the whole pipeline over a buffered frame sequence.
    pub fn process(&mut self, frames: &[D::Frame]) -> Result<TrackStore> {
        let mut store = self.get_object_tracks(frames)?;
        let camera_motion = self.camera.camera_motion(frames).map_err(source_error)?;
        self.annotate(&mut store, &camera_motion)?;
        Ok(store)
    }

    /// Run every stage after detection on an existing store.
    pub fn annotate(&self, store: &mut TrackStore, camera_motion: &[Vector2<f64>]) -> Result<()> {
        run_stages(store, camera_motion, &self.view, &self.estimator)
    }

    /// Build the raw track store, from the cache when configured and present,
    /// otherwise by running the detector (and writing the cache if a path is set).
    pub fn get_object_tracks(&mut self, frames: &[D::Frame]) -> Result<TrackStore> {
        if self.config.read_from_cache
            && let Some(path) = &self.config.cache_path
            && let Some(store) = cache::load_if_present(path)?
        {
            if store.frame_count() != frames.len() {
                warn!(
                    path = %path.display(),
                    cached = store.frame_count(),
                    frames = frames.len(),
                    "Cached track store does not match the input frames"
                );
                return Err(Error::FrameCountMismatch {
                    expected: frames.len(),
                    got: store.frame_count(),
                });
            }
            return Ok(store);
        }

        let detections = self.detect_frames(frames)?;
        let store = TrackStore::from_detections(&detections);

        if let Some(path) = &self.config.cache_path {
            cache::save(&store, path)?;
        }
        Ok(store)
    }

    /// Run the detector over the frames in fixed-size batches.
    pub fn detect_frames(&mut self, frames: &[D::Frame]) -> Result<Vec<Vec<TrackedDetection>>> {
        let mut detections = Vec::with_capacity(frames.len());
        for batch in frames.chunks(self.config.batch_size) {
            let batch_detections = self.detector.detect(batch).map_err(source_error)?;
            if batch_detections.len() != batch.len() {
                return Err(Error::FrameCountMismatch {
                    expected: batch.len(),
                    got: batch_detections.len(),
                });
            }
            detections.extend(batch_detections);
        }
        info!(
            frames = frames.len(),
            batch_size = self.config.batch_size,
            "Ran detection"
        );
        Ok(detections)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn view_transformer(&self) -> &ViewTransformer {
        &self.view
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the camera motion source.
    pub fn camera(&self) -> &C {
        &self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::{DetectionBuilder, StaticCamera};
    use crate::tracks::{DetectionClass, ObjectKind};

    /// Emits one player per frame and records the batch sizes it was called with.
    struct MockDetector {
        next_frame: usize,
        batches: Vec<usize>,
    }

    impl DetectionSource for MockDetector {
        type Frame = ();
        type Error = std::convert::Infallible;

        fn detect(
            &mut self,
            frames: &[()],
        ) -> std::result::Result<Vec<Vec<TrackedDetection>>, Self::Error> {
            self.batches.push(frames.len());
            let out = (0..frames.len())
                .map(|i| {
                    let y = 800.0 - 10.0 * (self.next_frame + i) as f64;
                    vec![
                        DetectionBuilder::new()
                            .foot(600.0, y, 30.0, 80.0)
                            .class(DetectionClass::Player)
                            .track_id(3)
                            .score(0.9)
                            .build(),
                    ]
                })
                .collect();
            self.next_frame += frames.len();
            Ok(out)
        }
    }

    fn detector() -> MockDetector {
        MockDetector {
            next_frame: 0,
            batches: Vec::new(),
        }
    }

    #[test]
    fn test_detection_is_batched() {
        let mut pipeline =
            TrackingPipeline::with_default_config(detector(), StaticCamera::<()>::new()).unwrap();
        let store = pipeline.process(&[(); 45]).unwrap();

        assert_eq!(pipeline.detector().batches, vec![20, 20, 5]);
        assert_eq!(store.frame_count(), 45);
        let record = store.get(ObjectKind::Player, 0, 3).unwrap();
        assert!(record.position_transformed.is_some());
        assert!(record.speed.is_some());
    }

    #[test]
    fn test_invalid_batch_size() {
        let config = PipelineConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            TrackingPipeline::new(detector(), StaticCamera::<()>::new(), config),
            Err(Error::InvalidConfig(_))
        ));
    }

    struct ShortDetector;

    impl DetectionSource for ShortDetector {
        type Frame = ();
        type Error = std::convert::Infallible;

        fn detect(
            &mut self,
            _frames: &[()],
        ) -> std::result::Result<Vec<Vec<TrackedDetection>>, Self::Error> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_detector_frame_count_checked() {
        let mut pipeline =
            TrackingPipeline::with_default_config(ShortDetector, StaticCamera::<()>::new())
                .unwrap();
        assert!(matches!(
            pipeline.process(&[(); 3]),
            Err(Error::FrameCountMismatch {
                expected: 3,
                got: 0
            })
        ));
    }
}

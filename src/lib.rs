//! # court-tracks
//!
//! Turns per-frame tracked detections of a sports video (players, referees, ball)
//! into temporally consistent tracks with court-space positions, speed and
//! cumulative distance.
//!
//! Stages, in pipeline order:
//!
//! - [`TrackStore`] built from tracked detections ([`TrackedDetection`])
//! - ball gap filling ([`interpolation::interpolate_ball`])
//! - anchor point resolution and camera-motion adjustment
//! - perspective mapping to court meters ([`ViewTransformer`])
//! - windowed speed/distance ([`SpeedDistanceEstimator`])
//!
//! ## Example
//!
//! ```rust,ignore
//! use court_tracks::{annotate_tracks, CourtCalibration, KinematicsConfig, TrackStore};
//!
//! let mut store = TrackStore::from_detections(&per_frame_detections);
//! let calibration = CourtCalibration::default();
//! annotate_tracks(&mut store, &camera_motion, &calibration, &KinematicsConfig::default())?;
//! ```

pub mod cache;
pub mod error;
pub mod integration;
pub mod interpolation;
pub mod kinematics;
pub mod tracks;
pub mod view;

pub use error::{Error, Result};
pub use integration::{
    CameraMotionSource, DetectionBuilder, DetectionSource, PipelineConfig, StaticCamera,
    TrackingPipeline, annotate_tracks,
};
pub use kinematics::{KinematicsConfig, SpeedDistanceEstimator};
pub use tracks::{
    BALL_TRACK_ID, BoundingBox, DetectionClass, FrameTracks, ObjectKind, Point, TrackId,
    TrackRecord, TrackStore, TrackedDetection,
};
pub use view::{CourtCalibration, ViewTransformer};

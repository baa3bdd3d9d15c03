//! Integration module for connecting external collaborators with the
//! tracking-data stages.
//!
//! This module provides traits for the detector+tracker and camera-motion
//! collaborators, and the pipeline that drives every stage in order.

mod builder;
mod detector;
mod pipeline;

pub use builder::DetectionBuilder;
pub use detector::{CameraMotionSource, DetectionSource, StaticCamera};
pub use pipeline::{PipelineConfig, TrackingPipeline, annotate_tracks};

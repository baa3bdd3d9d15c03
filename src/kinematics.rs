//! Windowed speed and cumulative distance from court-space positions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::tracks::{FrameTracks, ObjectKind, TrackId, TrackStore};

/// Meters per second to kilometers per hour.
pub const KMH_PER_MPS: f64 = 3.6;

/// Configuration for the speed/distance estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicsConfig {
    /// Frames per estimation window
    pub window_size: usize,
    /// Video frame rate used to turn frame deltas into seconds
    pub frame_rate: f64,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            window_size: 5,
            frame_rate: 24.0,
        }
    }
}

impl KinematicsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(Error::InvalidConfig(
                "window_size must be positive".to_string(),
            ));
        }
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "frame_rate must be positive, got {}",
                self.frame_rate
            )));
        }
        Ok(())
    }
}

/// Whether speed and distance are estimated for a category.
pub fn is_measured(kind: ObjectKind) -> bool {
    matches!(kind, ObjectKind::Player)
}

/// Estimates speed (km/h) and cumulative distance (m) per identifier over
/// fixed frame windows.
///
/// Every window `[start, end)` compares the court positions at `start` and
/// `end`, where `end = min(start + window_size, frame_count - 1)`. The result
/// is written to every frame of the window that holds the identifier.
#[derive(Debug, Clone)]
pub struct SpeedDistanceEstimator {
    config: KinematicsConfig,
}

impl SpeedDistanceEstimator {
    pub fn new(config: KinematicsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &KinematicsConfig {
        &self.config
    }

    /// `(start, end)` frame pairs of every window over `frame_count` frames.
    ///
    /// The last window is clamped to end at `frame_count - 1`, so it may be
    /// shorter than `window_size` or even empty (`start == end`).
    pub fn windows(&self, frame_count: usize) -> Vec<(usize, usize)> {
        (0..frame_count)
            .step_by(self.config.window_size)
            .map(|start| {
                let end = (start + self.config.window_size).min(frame_count - 1);
                (start, end)
            })
            .collect()
    }

    /// Write speed and distance into every measured category of the store.
    ///
    /// Existing kinematics of measured categories are cleared first, so the
    /// result depends only on `position_transformed`. Returns the total
    /// distance per `(category, identifier)`.
    pub fn add_speed_and_distance(
        &self,
        store: &mut TrackStore,
    ) -> BTreeMap<(ObjectKind, TrackId), f64> {
        let mut totals = BTreeMap::new();
        for kind in ObjectKind::ALL.into_iter().filter(|k| is_measured(*k)) {
            let frames = store.frames_mut(kind);
            for tracks in frames.iter_mut() {
                for record in tracks.values_mut() {
                    record.clear_kinematics();
                }
            }

            let category_totals = self.estimate(frames);
            info!(
                object = kind.name(),
                tracks = category_totals.len(),
                "Estimated speed and distance"
            );
            totals.extend(category_totals.into_iter().map(|(id, d)| ((kind, id), d)));
        }
        totals
    }

    /// Estimate one category. The distance accumulator lives only for the
    /// duration of this call.
    pub fn estimate(&self, frames: &mut [FrameTracks]) -> BTreeMap<TrackId, f64> {
        let mut total_distance: BTreeMap<TrackId, f64> = BTreeMap::new();

        for (start, end) in self.windows(frames.len()) {
            if end <= start {
                debug!(start, end, "Skipping empty window");
                continue;
            }
            let elapsed = (end - start) as f64 / self.config.frame_rate;

            let mut updates = Vec::new();
            for (&track_id, record) in &frames[start] {
                let Some(last) = frames[end].get(&track_id) else {
                    debug!(track_id, start, end, "Identifier missing at window end");
                    continue;
                };
                let (Some(from), Some(to)) =
                    (record.position_transformed, last.position_transformed)
                else {
                    continue;
                };

                let covered = nalgebra::distance(&from, &to);
                let speed = covered / elapsed * KMH_PER_MPS;
                let total = total_distance.entry(track_id).or_insert(0.0);
                *total += covered;
                updates.push((track_id, speed, *total));
            }

            for tracks in &mut frames[start..end] {
                for &(track_id, speed, distance) in &updates {
                    if let Some(record) = tracks.get_mut(&track_id) {
                        record.set_kinematics(speed, distance);
                    }
                }
            }
        }

        total_distance
    }
}

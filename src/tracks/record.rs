//! Per-frame record of one tracked object.

use serde::{Deserialize, Serialize};

use crate::tracks::Point;
use crate::tracks::rect::BoundingBox;

/// Attributes of one (category, frame, identifier) triple.
///
/// Every stage owns a subset of the optional fields and fills them in place;
/// a field stays `None` until its stage has run (or when the stage had nothing
/// to write, e.g. a point outside the court).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Detected (or interpolated) bounding box in pixels
    pub bbox: BoundingBox,
    /// Raw anchor point in pixels
    pub position: Option<Point>,
    /// Anchor point with camera ego-motion removed, in pixels
    pub position_adjusted: Option<Point>,
    /// Court-space position in meters, `None` outside the calibrated area
    pub position_transformed: Option<Point>,
    /// Speed over the enclosing window, km/h
    pub speed: Option<f64>,
    /// Cumulative distance up to the end of the enclosing window, meters
    pub distance: Option<f64>,
    /// Team assigned by an external collaborator
    pub team: Option<u8>,
    /// Team color (RGB) assigned by an external collaborator
    pub team_color: Option<[u8; 3]>,
    /// Ball possession flag set by an external collaborator
    pub has_ball: bool,
}

impl TrackRecord {
    /// Create a record holding only a bounding box.
    pub fn new(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            ..Default::default()
        }
    }

    /// Set speed and cumulative distance for this frame.
    pub fn set_kinematics(&mut self, speed: f64, distance: f64) {
        self.speed = Some(speed);
        self.distance = Some(distance);
    }

    pub fn clear_kinematics(&mut self) {
        self.speed = None;
        self.distance = None;
    }
}

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::tracks::{Point, TrackStore};
use crate::view::homography::Homography;
use crate::view::polygon::polygon_contains;

/// Four pixel vertices of the playing area and the court vertices (meters)
/// they correspond to, in the same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourtCalibration {
    pub pixel_vertices: [[f64; 2]; 4],
    pub court_vertices: [[f64; 2]; 4],
}

impl CourtCalibration {
    /// Calibration for a court rectangle of `width` x `length` meters whose
    /// corners appear at `pixel_vertices` (bottom-left, top-left, top-right,
    /// bottom-right as seen by the camera).
    pub fn rectangle(pixel_vertices: [[f64; 2]; 4], width: f64, length: f64) -> Self {
        Self {
            pixel_vertices,
            court_vertices: [[0.0, width], [0.0, 0.0], [length, 0.0], [length, width]],
        }
    }
}

impl Default for CourtCalibration {
    fn default() -> Self {
        Self::rectangle(
            [[110.0, 1035.0], [265.0, 275.0], [910.0, 260.0], [1640.0, 915.0]],
            68.0,
            23.32,
        )
    }
}

/// Maps pixel positions inside the calibrated area to court coordinates.
#[derive(Debug, Clone)]
pub struct ViewTransformer {
    polygon: [Point; 4],
    homography: Homography,
}

impl ViewTransformer {
    pub fn new(calibration: &CourtCalibration) -> Result<Self> {
        let polygon = calibration.pixel_vertices.map(|[x, y]| Point::new(x, y));
        let court = calibration.court_vertices.map(|[x, y]| Point::new(x, y));
        let homography = Homography::from_correspondences(&polygon, &court)?;
        Ok(Self {
            polygon,
            homography,
        })
    }

    pub fn homography(&self) -> &Homography {
        &self.homography
    }

    /// Court position of a pixel point, or `None` when the point lies outside
    /// the calibrated area.
    pub fn transform_point(&self, point: &Point) -> Option<Point> {
        if !polygon_contains(&self.polygon, point) {
            return None;
        }
        self.homography.apply(point)
    }

    /// Fill `position_transformed` of every record from `position_adjusted`.
    pub fn add_transformed_positions(&self, store: &mut TrackStore) {
        let mut mapped = 0usize;
        let mut outside = 0usize;
        for (kind, frame, track_id, record) in store.iter_mut() {
            record.position_transformed = record
                .position_adjusted
                .and_then(|p| self.transform_point(&p));
            match record.position_transformed {
                Some(_) => mapped += 1,
                None => {
                    outside += 1;
                    debug!(object = kind.name(), frame, track_id, "Position outside court");
                }
            }
        }
        info!(mapped, outside, "Transformed positions to court space");
    }
}

//! Builder for creating TrackedDetection objects from various input formats.

use crate::tracks::{BoundingBox, DetectionClass, TrackId, TrackedDetection};

/// Builder for creating `TrackedDetection` objects from various input formats.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    class: DetectionClass,
    track_id: TrackId,
    score: f64,
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f64, cy: f64, w: f64, h: f64) -> Self {
        self.x1 = cx - w / 2.0;
        self.y1 = cy - h / 2.0;
        self.x2 = cx + w / 2.0;
        self.y2 = cy + h / 2.0;
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, l: f64, t: f64, w: f64, h: f64) -> Self {
        self.x1 = l;
        self.y1 = t;
        self.x2 = l + w;
        self.y2 = t + h;
        self
    }

    /// Set bounding box from a box whose bottom-center sits at `(x, y)`.
    pub fn foot(mut self, x: f64, y: f64, w: f64, h: f64) -> Self {
        self.x1 = x - w / 2.0;
        self.y1 = y - h;
        self.x2 = x + w / 2.0;
        self.y2 = y;
        self
    }

    pub fn class(mut self, class: DetectionClass) -> Self {
        self.class = class;
        self
    }

    /// Set the tracker identifier.
    pub fn track_id(mut self, track_id: TrackId) -> Self {
        self.track_id = track_id;
        self
    }

    /// Set the confidence score.
    pub fn score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Build the final `TrackedDetection`.
    pub fn build(self) -> TrackedDetection {
        TrackedDetection::new(
            BoundingBox::new(self.x1, self.y1, self.x2, self.y2),
            self.class,
            self.track_id,
            self.score,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_builder() {
        let det = DetectionBuilder::new()
            .tlbr(10.0, 20.0, 50.0, 80.0)
            .class(DetectionClass::Referee)
            .track_id(12)
            .score(0.95)
            .build();

        assert_eq!(det.score, 0.95);
        assert_eq!(det.track_id, 12);
        assert_eq!(det.class, DetectionClass::Referee);
        assert_eq!(det.bbox.to_tlbr(), [10.0, 20.0, 50.0, 80.0]);
    }

    #[test]
    fn test_box_formats_agree() {
        let a = DetectionBuilder::new().xywh(30.0, 50.0, 40.0, 60.0).build();
        let b = DetectionBuilder::new().tlwh(10.0, 20.0, 40.0, 60.0).build();
        let c = DetectionBuilder::new().foot(30.0, 80.0, 40.0, 60.0).build();
        assert_eq!(a.bbox, b.bbox);
        assert_eq!(a.bbox, c.bbox);
        assert_eq!(c.bbox.foot().y, 80.0);
    }
}

use serde::{Deserialize, Serialize};

use crate::tracks::Point;

/// Axis-aligned bounding box in TLBR format (x1, y1, x2, y2), in pixels.
///
/// The detector does not guarantee `x1 < x2` and `y1 < y2`; use
/// [`BoundingBox::is_valid`] before trusting a box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Top-left x coordinate
    pub x1: f64,
    /// Top-left y coordinate
    pub y1: f64,
    /// Bottom-right x coordinate
    pub x2: f64,
    /// Bottom-right y coordinate
    pub y2: f64,
}

impl BoundingBox {
    /// Create a box from TLBR coordinates.
    #[inline]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a box from a TLBR array.
    #[inline]
    pub fn from_tlbr(tlbr: [f64; 4]) -> Self {
        Self::new(tlbr[0], tlbr[1], tlbr[2], tlbr[3])
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Centroid of the box.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Bottom-center of the box, where a standing object touches the ground.
    #[inline]
    pub fn foot(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, self.y2)
    }

    /// True when every coordinate is finite and the box has positive extent.
    pub fn is_valid(&self) -> bool {
        self.to_tlbr().iter().all(|v| v.is_finite()) && self.x1 < self.x2 && self.y1 < self.y2
    }
}

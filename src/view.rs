//! Perspective mapping from pixel space to court meters.

mod homography;
mod polygon;
mod transformer;

pub use homography::Homography;
pub use polygon::polygon_contains;
pub use transformer::{CourtCalibration, ViewTransformer};

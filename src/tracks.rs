mod position;
mod possession;
mod record;
mod rect;
mod store;

pub use position::{add_adjusted_positions, add_positions, anchor_point};
pub use possession::team_ball_control;
pub use record::TrackRecord;
pub use rect::BoundingBox;
pub use store::{
    BALL_TRACK_ID, DetectionClass, FrameTracks, ObjectKind, TrackId, TrackStore, TrackedDetection,
};

/// A 2D point, in pixels or court meters depending on the field it lives in.
pub type Point = nalgebra::Point2<f64>;

//! Anchor point resolution and camera-motion adjustment.

use nalgebra::Vector2;
use tracing::info;

use crate::error::{Error, Result};
use crate::tracks::Point;
use crate::tracks::rect::BoundingBox;
use crate::tracks::store::{ObjectKind, TrackStore};

/// Ground reference point of an object: box centroid for the ball, bottom
/// center for everything that stands on the court.
#[inline]
pub fn anchor_point(kind: ObjectKind, bbox: &BoundingBox) -> Point {
    match kind {
        ObjectKind::Ball => bbox.center(),
        ObjectKind::Player | ObjectKind::Referee => bbox.foot(),
    }
}

/// Fill `position` of every record from its bounding box.
pub fn add_positions(store: &mut TrackStore) {
    let mut count = 0usize;
    for (kind, _, _, record) in store.iter_mut() {
        record.position = Some(anchor_point(kind, &record.bbox));
        count += 1;
    }
    info!(records = count, "Resolved anchor positions");
}

/// Fill `position_adjusted` by subtracting the per-frame camera displacement
/// from `position`.
///
/// `camera_motion` must hold one displacement per frame.
pub fn add_adjusted_positions(
    store: &mut TrackStore,
    camera_motion: &[Vector2<f64>],
) -> Result<()> {
    if camera_motion.len() != store.frame_count() {
        return Err(Error::FrameCountMismatch {
            expected: store.frame_count(),
            got: camera_motion.len(),
        });
    }

    for (_, frame, _, record) in store.iter_mut() {
        record.position_adjusted = record.position.map(|p| p - camera_motion[frame]);
    }
    info!(
        frames = camera_motion.len(),
        "Applied camera motion adjustment"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracks::store::{BALL_TRACK_ID, DetectionClass, TrackedDetection};

    fn store() -> TrackStore {
        let bbox = BoundingBox::new(100.0, 200.0, 140.0, 300.0);
        TrackStore::from_detections(&[
            vec![
                TrackedDetection::new(bbox, DetectionClass::Player, 7, 0.9),
                TrackedDetection::new(bbox, DetectionClass::Ball, 0, 0.9),
            ],
            vec![TrackedDetection::new(bbox, DetectionClass::Referee, 2, 0.9)],
        ])
    }

    #[test]
    fn test_positions_by_kind() {
        let mut store = store();
        add_positions(&mut store);

        let player = store.get(ObjectKind::Player, 0, 7).unwrap();
        assert_eq!(player.position, Some(Point::new(120.0, 300.0)));
        let ball = store.get(ObjectKind::Ball, 0, BALL_TRACK_ID).unwrap();
        assert_eq!(ball.position, Some(Point::new(120.0, 250.0)));
        let referee = store.get(ObjectKind::Referee, 1, 2).unwrap();
        assert_eq!(referee.position, Some(Point::new(120.0, 300.0)));
    }

    #[test]
    fn test_adjusted_positions_subtract_displacement() {
        let mut store = store();
        add_positions(&mut store);
        let motion = [Vector2::new(5.0, -3.0), Vector2::new(1.0, 1.0)];
        add_adjusted_positions(&mut store, &motion).unwrap();

        let player = store.get(ObjectKind::Player, 0, 7).unwrap();
        assert_eq!(player.position_adjusted, Some(Point::new(115.0, 303.0)));
        let referee = store.get(ObjectKind::Referee, 1, 2).unwrap();
        assert_eq!(referee.position_adjusted, Some(Point::new(119.0, 299.0)));
    }

    #[test]
    fn test_adjusted_positions_require_one_vector_per_frame() {
        let mut store = store();
        add_positions(&mut store);
        let res = add_adjusted_positions(&mut store, &[Vector2::zeros()]);
        assert!(matches!(
            res,
            Err(Error::FrameCountMismatch {
                expected: 2,
                got: 1
            })
        ));
    }
}

use crate::tracks::store::{ObjectKind, TrackStore};

/// Team in control of the ball for every frame.
///
/// A frame takes the team of the player flagged `has_ball`. Frames without a
/// holder carry the previous frame's value forward; frames before the first
/// possession are `None`.
pub fn team_ball_control(store: &TrackStore) -> Vec<Option<u8>> {
    let mut last = None;
    store
        .frames(ObjectKind::Player)
        .iter()
        .map(|players| {
            if let Some(team) = players.values().find(|r| r.has_ball).and_then(|r| r.team) {
                last = Some(team);
            }
            last
        })
        .collect()
}

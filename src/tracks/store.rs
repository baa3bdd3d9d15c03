//! Per-category, per-frame storage of track records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::tracks::record::TrackRecord;
use crate::tracks::rect::BoundingBox;

/// Identifier assigned by the external tracker.
pub type TrackId = u64;

/// The single logical identifier used for the ball in every frame.
pub const BALL_TRACK_ID: TrackId = 1;

/// Track records of one category in one frame, keyed by identifier.
pub type FrameTracks = BTreeMap<TrackId, TrackRecord>;

/// Object category held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Player,
    Referee,
    Ball,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 3] = [ObjectKind::Player, ObjectKind::Referee, ObjectKind::Ball];

    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Player => "players",
            ObjectKind::Referee => "referees",
            ObjectKind::Ball => "ball",
        }
    }
}

/// Class label emitted by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DetectionClass {
    #[default]
    Player,
    Goalkeeper,
    Referee,
    Ball,
}

impl DetectionClass {
    /// Store category for this class. Goalkeepers are tracked as players.
    pub fn kind(&self) -> ObjectKind {
        match self {
            DetectionClass::Player | DetectionClass::Goalkeeper => ObjectKind::Player,
            DetectionClass::Referee => ObjectKind::Referee,
            DetectionClass::Ball => ObjectKind::Ball,
        }
    }
}

/// Detection input for the store, already identity-resolved by the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedDetection {
    /// Bounding box in TLBR format (x1, y1, x2, y2)
    pub bbox: BoundingBox,
    pub class: DetectionClass,
    /// Tracker identifier; ignored for the ball
    pub track_id: TrackId,
    /// Detection confidence score
    pub score: f64,
}

impl TrackedDetection {
    pub fn new(bbox: BoundingBox, class: DetectionClass, track_id: TrackId, score: f64) -> Self {
        Self {
            bbox,
            class,
            track_id,
            score,
        }
    }
}

/// Track sequences for players, referees and the ball.
///
/// All three sequences always have the same length, the frame count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackStore {
    players: Vec<FrameTracks>,
    referees: Vec<FrameTracks>,
    ball: Vec<FrameTracks>,
}

impl TrackStore {
    /// Create a store with `frame_count` empty frames.
    pub fn new(frame_count: usize) -> Self {
        Self {
            players: vec![FrameTracks::new(); frame_count],
            referees: vec![FrameTracks::new(); frame_count],
            ball: vec![FrameTracks::new(); frame_count],
        }
    }

    /// Build a store from per-frame tracked detections.
    pub fn from_detections(frames: &[Vec<TrackedDetection>]) -> Self {
        let mut store = Self::default();
        for detections in frames {
            store.push_frame(detections);
        }
        info!(
            frames = store.frame_count(),
            records = store.record_count(),
            "Built track store"
        );
        store
    }

    /// Append one frame of detections.
    ///
    /// Invalid boxes are treated as missing detections. Only the first ball
    /// detection of a frame is kept.
    pub fn push_frame(&mut self, detections: &[TrackedDetection]) {
        let frame = self.frame_count();
        self.players.push(FrameTracks::new());
        self.referees.push(FrameTracks::new());
        self.ball.push(FrameTracks::new());

        for det in detections {
            if !det.bbox.is_valid() {
                debug!(frame, track_id = det.track_id, bbox = ?det.bbox, "Dropping invalid box");
                continue;
            }

            let kind = det.class.kind();
            let tracks = &mut self.frames_vec_mut(kind)[frame];
            match kind {
                ObjectKind::Ball => {
                    if tracks.contains_key(&BALL_TRACK_ID) {
                        debug!(
                            frame,
                            score = det.score,
                            "Dropping duplicate ball detection"
                        );
                        continue;
                    }
                    tracks.insert(BALL_TRACK_ID, TrackRecord::new(det.bbox));
                }
                ObjectKind::Player | ObjectKind::Referee => {
                    tracks.insert(det.track_id, TrackRecord::new(det.bbox));
                }
            }
        }
    }

    pub fn frame_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// Total number of records across all categories and frames.
    pub fn record_count(&self) -> usize {
        ObjectKind::ALL
            .iter()
            .map(|&kind| self.frames(kind).iter().map(|f| f.len()).sum::<usize>())
            .sum()
    }

    /// Frame sequence of one category.
    pub fn frames(&self, kind: ObjectKind) -> &[FrameTracks] {
        match kind {
            ObjectKind::Player => &self.players,
            ObjectKind::Referee => &self.referees,
            ObjectKind::Ball => &self.ball,
        }
    }

    /// Mutable frame sequence of one category. The length cannot change.
    pub fn frames_mut(&mut self, kind: ObjectKind) -> &mut [FrameTracks] {
        self.frames_vec_mut(kind)
    }

    /// Replace the frame sequence of one category.
    pub fn set_frames(&mut self, kind: ObjectKind, frames: Vec<FrameTracks>) -> Result<()> {
        if frames.len() != self.frame_count() {
            return Err(Error::FrameCountMismatch {
                expected: self.frame_count(),
                got: frames.len(),
            });
        }
        *self.frames_vec_mut(kind) = frames;
        Ok(())
    }

    pub fn get(&self, kind: ObjectKind, frame: usize, track_id: TrackId) -> Option<&TrackRecord> {
        self.frames(kind).get(frame)?.get(&track_id)
    }

    pub fn get_mut(
        &mut self,
        kind: ObjectKind,
        frame: usize,
        track_id: TrackId,
    ) -> Option<&mut TrackRecord> {
        self.frames_vec_mut(kind).get_mut(frame)?.get_mut(&track_id)
    }

    /// Insert a record, returning the one it replaced.
    ///
    /// # Panics
    /// Panics if `frame` is not below [`TrackStore::frame_count`].
    pub fn insert(
        &mut self,
        kind: ObjectKind,
        frame: usize,
        track_id: TrackId,
        record: TrackRecord,
    ) -> Option<TrackRecord> {
        self.frames_vec_mut(kind)[frame].insert(track_id, record)
    }

    /// Iterate over every record as `(kind, frame, track_id, record)`.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectKind, usize, TrackId, &TrackRecord)> {
        ObjectKind::ALL.into_iter().flat_map(move |kind| {
            self.frames(kind)
                .iter()
                .enumerate()
                .flat_map(move |(frame, tracks)| {
                    tracks.iter().map(move |(id, rec)| (kind, frame, *id, rec))
                })
        })
    }

    /// Iterate mutably over every record as `(kind, frame, track_id, record)`.
    pub fn iter_mut(
        &mut self,
    ) -> impl Iterator<Item = (ObjectKind, usize, TrackId, &mut TrackRecord)> {
        let Self {
            players,
            referees,
            ball,
        } = self;
        [
            (ObjectKind::Player, players),
            (ObjectKind::Referee, referees),
            (ObjectKind::Ball, ball),
        ]
        .into_iter()
        .flat_map(|(kind, frames)| {
            frames
                .iter_mut()
                .enumerate()
                .flat_map(move |(frame, tracks)| {
                    tracks
                        .iter_mut()
                        .map(move |(id, rec)| (kind, frame, *id, rec))
                })
        })
    }

    /// Check the structural invariants of the store.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let n = self.frame_count();
        for kind in [ObjectKind::Referee, ObjectKind::Ball] {
            let len = self.frames(kind).len();
            if len != n {
                return Err(format!(
                    "{} has {} frames, players has {}",
                    kind.name(),
                    len,
                    n
                ));
            }
        }
        for (frame, tracks) in self.ball.iter().enumerate() {
            if tracks.keys().any(|&id| id != BALL_TRACK_ID) {
                return Err(format!("frame {frame} holds a ball id other than {BALL_TRACK_ID}"));
            }
        }
        Ok(())
    }

    fn frames_vec_mut(&mut self, kind: ObjectKind) -> &mut Vec<FrameTracks> {
        match kind {
            ObjectKind::Player => &mut self.players,
            ObjectKind::Referee => &mut self.referees,
            ObjectKind::Ball => &mut self.ball,
        }
    }
}

//! Gap filling for the ball track.
//!
//! The ball has a single logical identity, so its per-frame boxes form one
//! series. Missing frames are filled by linear interpolation between the
//! nearest known frames; frames before the first (after the last) known frame
//! repeat that frame's value. No extrapolation is performed.

use ndarray::{Array2, ArrayViewMut1, Axis};
use tracing::{debug, info};

use crate::error::Result;
use crate::tracks::{BALL_TRACK_ID, BoundingBox, FrameTracks, ObjectKind, TrackRecord, TrackStore};

/// Fill missing (`NaN`) values of every column of an `(frames, k)` series.
///
/// A column with no known value is left untouched.
pub fn interpolate_series(series: &Array2<f64>) -> Array2<f64> {
    let mut filled = series.clone();
    for column in filled.axis_iter_mut(Axis(1)) {
        fill_column(column);
    }
    filled
}

fn fill_column(mut column: ArrayViewMut1<f64>) {
    let known: Vec<usize> = column
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, _)| i)
        .collect();

    let (Some(&first), Some(&last)) = (known.first(), known.last()) else {
        return;
    };

    for i in 0..first {
        column[i] = column[first];
    }
    for i in last + 1..column.len() {
        column[i] = column[last];
    }
    for pair in known.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if hi - lo < 2 {
            continue;
        }
        let (v_lo, v_hi) = (column[lo], column[hi]);
        let span = (hi - lo) as f64;
        for i in lo + 1..hi {
            let t = (i - lo) as f64 / span;
            column[i] = v_lo + (v_hi - v_lo) * t;
        }
    }
}

/// Return a ball sequence of the same length where every frame holds a box,
/// unless no frame holds one at all.
///
/// Frames that already hold a ball record keep it unchanged; filled frames
/// get a fresh record carrying only the interpolated box.
pub fn interpolate_ball(frames: &[FrameTracks]) -> Vec<FrameTracks> {
    let mut series = Array2::from_elem((frames.len(), 4), f64::NAN);
    for (i, tracks) in frames.iter().enumerate() {
        if let Some(record) = tracks.get(&BALL_TRACK_ID) {
            for (j, v) in record.bbox.to_tlbr().into_iter().enumerate() {
                series[[i, j]] = v;
            }
        }
    }

    let filled = interpolate_series(&series);

    frames
        .iter()
        .zip(filled.axis_iter(Axis(0)))
        .map(|(tracks, row)| {
            if tracks.contains_key(&BALL_TRACK_ID) || !row.iter().all(|v| v.is_finite()) {
                return tracks.clone();
            }
            let bbox = BoundingBox::new(row[0], row[1], row[2], row[3]);
            FrameTracks::from([(BALL_TRACK_ID, TrackRecord::new(bbox))])
        })
        .collect()
}

/// Fill ball gaps in place.
pub fn interpolate_ball_positions(store: &mut TrackStore) -> Result<()> {
    let before = count_ball_frames(store.frames(ObjectKind::Ball));
    if before == 0 {
        debug!(
            frames = store.frame_count(),
            "No ball detections to interpolate"
        );
        return Ok(());
    }

    let filled = interpolate_ball(store.frames(ObjectKind::Ball));
    let after = count_ball_frames(&filled);
    store.set_frames(ObjectKind::Ball, filled)?;
    info!(
        detected = before,
        filled = after - before,
        "Interpolated ball track"
    );
    Ok(())
}

fn count_ball_frames(frames: &[FrameTracks]) -> usize {
    frames
        .iter()
        .filter(|f| f.contains_key(&BALL_TRACK_ID))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(bbox: Option<[f64; 4]>) -> FrameTracks {
        match bbox {
            Some(b) => {
                let record = TrackRecord::new(BoundingBox::from_tlbr(b));
                FrameTracks::from([(BALL_TRACK_ID, record)])
            }
            None => FrameTracks::new(),
        }
    }

    fn bbox_at(frames: &[FrameTracks], i: usize) -> [f64; 4] {
        frames[i][&BALL_TRACK_ID].bbox.to_tlbr()
    }

    #[test]
    fn test_complete_series_unchanged() {
        let frames: Vec<_> = (0..4)
            .map(|i| ball(Some([i as f64, 0.0, i as f64 + 10.0, 10.0])))
            .collect();
        assert_eq!(interpolate_ball(&frames), frames);
    }

    #[test]
    fn test_gap_is_linear() {
        let frames = vec![
            ball(Some([0.0, 0.0, 10.0, 10.0])),
            ball(None),
            ball(None),
            ball(None),
            ball(Some([40.0, 80.0, 50.0, 90.0])),
        ];
        let filled = interpolate_ball(&frames);

        assert_eq!(bbox_at(&filled, 1), [10.0, 20.0, 20.0, 30.0]);
        assert_eq!(bbox_at(&filled, 2), [20.0, 40.0, 30.0, 50.0]);
        assert_eq!(bbox_at(&filled, 3), [30.0, 60.0, 40.0, 70.0]);
    }

    #[test]
    fn test_leading_and_trailing_are_flat() {
        let frames = vec![
            ball(None),
            ball(None),
            ball(Some([5.0, 6.0, 7.0, 8.0])),
            ball(None),
        ];
        let filled = interpolate_ball(&frames);
        for i in 0..4 {
            assert_eq!(bbox_at(&filled, i), [5.0, 6.0, 7.0, 8.0]);
        }
    }

    #[test]
    fn test_empty_series_stays_empty() {
        let frames = vec![ball(None); 3];
        let filled = interpolate_ball(&frames);
        assert_eq!(filled.len(), 3);
        assert!(filled.iter().all(|f| f.is_empty()));

        assert!(interpolate_ball(&[]).is_empty());
    }

    #[test]
    fn test_known_records_keep_their_fields() {
        let mut first = TrackRecord::new(BoundingBox::new(0.0, 0.0, 2.0, 2.0));
        first.has_ball = true;
        let frames = vec![
            FrameTracks::from([(BALL_TRACK_ID, first.clone())]),
            ball(None),
            ball(Some([2.0, 2.0, 4.0, 4.0])),
        ];
        let filled = interpolate_ball(&frames);
        assert_eq!(filled[0][&BALL_TRACK_ID], first);
        assert!(!filled[1][&BALL_TRACK_ID].has_ball);
        assert_eq!(bbox_at(&filled, 1), [1.0, 1.0, 3.0, 3.0]);
    }

    #[test]
    fn test_series_columns_are_independent() {
        let series = ndarray::array![[0.0, f64::NAN], [f64::NAN, 1.0], [4.0, f64::NAN]];
        let filled = interpolate_series(&series);
        assert_eq!(filled, ndarray::array![[0.0, 1.0], [2.0, 1.0], [4.0, 1.0]]);
    }

    #[test]
    fn test_store_interpolation() {
        let mut store = TrackStore::new(3);
        let record = TrackRecord::new(BoundingBox::new(1.0, 1.0, 3.0, 3.0));
        store.insert(ObjectKind::Ball, 2, BALL_TRACK_ID, record);
        interpolate_ball_positions(&mut store).unwrap();
        assert!(store.frames(ObjectKind::Ball).iter().all(|f| f.len() == 1));
    }
}

//! Lane tracking across a time series of fields.
//!
//! Each frame is scanned independently; every lane of frame `t` is then paired
//! with its best match in frame `t + 1`.

use glam::Vec3;
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::detect::{Lane, LaneDetector};
use crate::automaton::voxel::VoxelField;

/// Frames needed before any tracking is attempted.
pub const MIN_TRACKED_FRAMES: usize = 3;

/// How a lane changed between two frames.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LaneEvolution {
    /// Center-of-mass displacement.
    pub translation: Vec3,
    /// Later length minus earlier length.
    pub length_change: i64,
    pub similarity: f32,
}

/// A lane of frame `time_start` matched into frame `time_end`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HyperspaceLane {
    pub lane: Lane,
    pub time_start: usize,
    pub time_end: usize,
    pub evolution: LaneEvolution,
}

/// Fraction of `a`'s points lying within `tolerance` (per axis) of some point of
/// `b`, over the longer lane's length. Lanes on different axes score 0.
pub fn lane_similarity(a: &Lane, b: &Lane, tolerance: i16) -> f32 {
    if a.direction != b.direction {
        return 0.0;
    }
    let longest = a.length.max(b.length);
    if longest == 0 {
        return 0.0;
    }

    let common = a
        .points
        .iter()
        .filter(|p| b.points.iter().any(|q| p.near(q, tolerance)))
        .count();

    common as f32 / longest as f32
}

/// Highest-scoring candidate whose similarity strictly exceeds `threshold`.
/// Ties keep the earliest candidate.
pub fn find_matching_lane<'a>(
    target: &Lane,
    candidates: &'a [Lane],
    tolerance: i16,
    threshold: f32,
) -> Option<&'a Lane> {
    let mut best: Option<&'a Lane> = None;
    let mut best_score = 0.0;

    for candidate in candidates {
        let score = lane_similarity(target, candidate, tolerance);
        if score > best_score && score > threshold {
            best_score = score;
            best = Some(candidate);
        }
    }

    best
}

pub fn lane_evolution(from: &Lane, to: &Lane, tolerance: i16) -> LaneEvolution {
    LaneEvolution {
        translation: to.center_of_mass() - from.center_of_mass(),
        length_change: to.length as i64 - from.length as i64,
        similarity: lane_similarity(from, to, tolerance),
    }
}

impl LaneDetector {
    /// Track lanes through `frames`, oldest first.
    ///
    /// Returns nothing for fewer than [`MIN_TRACKED_FRAMES`] frames. Frames are
    /// scanned in parallel; pass numbers follow frame order.
    pub fn detect_hyperspace_lanes(&self, frames: &[VoxelField]) -> Vec<HyperspaceLane> {
        if frames.len() < MIN_TRACKED_FRAMES {
            return Vec::new();
        }

        let base_pass = self.reserve_passes(frames.len() as u64);
        let per_frame: Vec<Vec<Lane>> = frames
            .par_iter()
            .enumerate()
            .map(|(t, frame)| {
                self.detect_with_pass(frame.cells(), frame.resolution(), base_pass + t as u64)
            })
            .collect();

        let tolerance = self.config().match_tolerance;
        let threshold = self.config().match_threshold;
        let mut tracked = Vec::new();

        for (t, pair) in per_frame.windows(2).enumerate() {
            let (current, next) = (&pair[0], &pair[1]);
            for lane in current {
                if let Some(matched) = find_matching_lane(lane, next, tolerance, threshold) {
                    tracked.push(HyperspaceLane {
                        lane: lane.clone(),
                        time_start: t,
                        time_end: t + 1,
                        evolution: lane_evolution(lane, matched, tolerance),
                    });
                }
            }
        }

        tracked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::voxel::Axis;
    use crate::lanes::detect::LaneConfig;

    fn x_line(resolution: i16, xs: std::ops::Range<i16>, y: i16, z: i16) -> VoxelField {
        let mut field = VoxelField::new(resolution).unwrap();
        for x in xs {
            field.set(x, y, z, 1);
        }
        field
    }

    #[test]
    fn test_translating_lane_is_tracked() {
        let frames: Vec<VoxelField> = (1..4).map(|y| x_line(8, 2..6, y, 1)).collect();
        let tracked = LaneDetector::default().detect_hyperspace_lanes(&frames);

        assert_eq!(tracked.len(), 2);
        for (t, h) in tracked.iter().enumerate() {
            assert_eq!(h.time_start, t);
            assert_eq!(h.time_end, t + 1);
            assert_eq!(h.lane.direction, Axis::X);
            assert_eq!(h.evolution.translation, Vec3::new(0.0, 1.0, 0.0));
            assert_eq!(h.evolution.length_change, 0);
            assert!((h.evolution.similarity - 1.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_pass_numbers_follow_frame_order() {
        let detector = LaneDetector::default();
        let frames: Vec<VoxelField> = (1..4).map(|y| x_line(8, 2..6, y, 1)).collect();
        let tracked = detector.detect_hyperspace_lanes(&frames);

        assert_eq!(tracked[0].lane.id.to_string(), "x_1_1_0");
        assert_eq!(tracked[1].lane.id.to_string(), "x_2_1_1");
        assert_eq!(detector.passes_run(), 3);
    }

    #[test]
    fn test_too_few_frames() {
        let frames = vec![x_line(8, 0..4, 0, 0), x_line(8, 0..4, 0, 0)];
        assert!(LaneDetector::default().detect_hyperspace_lanes(&frames).is_empty());
        assert!(LaneDetector::default().detect_hyperspace_lanes(&[]).is_empty());
    }

    #[test]
    fn test_jump_beyond_tolerance_is_not_matched() {
        let frames = vec![
            x_line(8, 0..4, 0, 0),
            x_line(8, 0..4, 3, 0),
            x_line(8, 0..4, 6, 0),
        ];
        assert!(LaneDetector::default().detect_hyperspace_lanes(&frames).is_empty());

        let loose = LaneDetector::new(LaneConfig::default().with_match_tolerance(3));
        assert_eq!(loose.detect_hyperspace_lanes(&frames).len(), 2);
    }

    #[test]
    fn test_shrinking_lane_reports_length_change() {
        let frames = vec![
            x_line(8, 0..6, 0, 0),
            x_line(8, 0..5, 0, 0),
            x_line(8, 0..5, 0, 0),
        ];
        let tracked = LaneDetector::default().detect_hyperspace_lanes(&frames);

        assert_eq!(tracked.len(), 2);
        assert_eq!(tracked[0].evolution.length_change, -1);
        // The dropped end cell is still within one cell of the new end
        assert!((tracked[0].evolution.similarity - 1.0).abs() < f32::EPSILON);
        assert_eq!(tracked[0].evolution.translation, Vec3::new(-0.5, 0.0, 0.0));
        assert_eq!(tracked[1].evolution.length_change, 0);
    }

    #[test]
    fn test_similarity_threshold_is_strict() {
        // 3 of 5 points near: exactly 0.6, rejected
        let a = x_line(8, 0..5, 0, 0);
        let b = x_line(8, 3..6, 0, 0);
        let detector = LaneDetector::default();
        let la = detector.detect_lanes(&a);
        let lb = detector.detect_lanes(&b);
        // a points 2,3,4 are within 1 of b's 3,4,5 -> 3 / 5
        assert!((lane_similarity(&la[0], &lb[0], 1) - 0.6).abs() < 1e-6);
        assert!(find_matching_lane(&la[0], &lb, 1, 0.6).is_none());
        assert!(find_matching_lane(&la[0], &lb, 1, 0.5).is_some());
    }

    #[test]
    fn test_different_axes_score_zero() {
        let detector = LaneDetector::default();
        let x = detector.detect_lanes(&x_line(8, 0..4, 0, 0));
        // The x=0 cells stop every x ray short of the x=4 column
        let mut y_field = VoxelField::new(8).unwrap();
        for y in 0..4 {
            y_field.set(0, y, 0, 1);
            y_field.set(4, y, 0, 1);
        }
        let y = detector.detect_lanes(&y_field);
        assert_eq!(y[0].direction, Axis::Y);
        assert_eq!(lane_similarity(&x[0], &y[0], 1), 0.0);
    }

    #[test]
    fn test_best_candidate_wins() {
        let detector = LaneDetector::default();
        let target = detector.detect_lanes(&x_line(8, 0..5, 0, 0));

        let mut next = VoxelField::new(8).unwrap();
        for x in 2..7 {
            next.set(x, 0, 4, 1); // far away on z
        }
        for x in 1..6 {
            next.set(x, 1, 0, 1); // shifted by one on x and y
        }
        let candidates = detector.detect_lanes(&next);
        assert_eq!(candidates.len(), 2);

        let matched = find_matching_lane(&target[0], &candidates, 1, 0.6).unwrap();
        assert_eq!(matched.points[0].y, 1);
    }
}

//! Axis-aligned lane detection on a single field.
//!
//! Every ray along x, then y, then z is traced from its start. Active cells
//! extend the run; inactive or already claimed cells count as gap, and the ray
//! is abandoned once the gap exceeds `max_gap`. Every collected cell is claimed
//! whether or not its run reaches `min_lane_length`, so later rays skip it.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::automaton::voxel::{cell_count, Axis, VoxelField};
use crate::error::FieldError;

/// Detection and matching thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LaneConfig {
    /// Shortest run reported as a lane.
    pub min_lane_length: usize,
    /// Consecutive gap cells tolerated inside a run.
    pub max_gap: usize,
    /// Per-axis distance at which two points count as the same across frames.
    pub match_tolerance: i16,
    /// Similarity a cross-frame match must strictly exceed.
    pub match_threshold: f32,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            min_lane_length: 3,
            max_gap: 1,
            match_tolerance: 1,
            match_threshold: 0.6,
        }
    }
}

impl LaneConfig {
    pub fn with_min_lane_length(mut self, min_lane_length: usize) -> Self {
        self.min_lane_length = min_lane_length;
        self
    }

    pub fn with_max_gap(mut self, max_gap: usize) -> Self {
        self.max_gap = max_gap;
        self
    }

    pub fn with_match_tolerance(mut self, match_tolerance: i16) -> Self {
        self.match_tolerance = match_tolerance;
        self
    }

    pub fn with_match_threshold(mut self, match_threshold: f32) -> Self {
        self.match_threshold = match_threshold;
        self
    }
}

/// One active cell on a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LanePoint {
    pub x: i16,
    pub y: i16,
    pub z: i16,
    /// Flat index into the field.
    pub index: usize,
}

impl LanePoint {
    #[inline]
    pub fn same_cell(&self, other: &LanePoint) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }

    /// Within `tolerance` of `other` on every axis.
    #[inline]
    pub fn near(&self, other: &LanePoint, tolerance: i16) -> bool {
        let t = i32::from(tolerance);
        (i32::from(self.x) - i32::from(other.x)).abs() <= t
            && (i32::from(self.y) - i32::from(other.y)).abs() <= t
            && (i32::from(self.z) - i32::from(other.z)).abs() <= t
    }
}

/// Reproducible lane identity: traced axis, the fixed pair of coordinates on
/// the other two axes, and the detection pass that produced it.
///
/// Formats as `{axis}_{i}_{j}_{pass}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LaneId {
    pub axis: Axis,
    pub i: i16,
    pub j: i16,
    pub pass: u64,
}

impl std::fmt::Display for LaneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}_{}", self.axis, self.i, self.j, self.pass)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Lane {
    pub direction: Axis,
    /// Cells in trace order.
    pub points: Vec<LanePoint>,
    pub length: usize,
    pub id: LaneId,
}

impl Lane {
    /// Mean position of the lane's cells; the origin for an empty lane.
    pub fn center_of_mass(&self) -> Vec3 {
        if self.points.is_empty() {
            return Vec3::ZERO;
        }
        let sum = self.points.iter().fold(Vec3::ZERO, |acc, p| {
            acc + Vec3::new(f32::from(p.x), f32::from(p.y), f32::from(p.z))
        });
        sum / self.points.len() as f32
    }
}

/// Coordinates of step `k` along the ray fixed at `(i, j)`.
#[inline]
fn ray_coordinate(axis: Axis, i: i16, j: i16, k: i16) -> (i16, i16, i16) {
    match axis {
        Axis::X => (k, i, j),
        Axis::Y => (i, k, j),
        Axis::Z => (i, j, k),
    }
}

/// Trace the first run along one ray, claiming every cell it collects.
fn trace_lane(
    cells: &[u8],
    resolution: i16,
    axis: Axis,
    i: i16,
    j: i16,
    visited: &mut [bool],
    max_gap: usize,
) -> Vec<LanePoint> {
    let r = resolution as usize;
    let mut lane = Vec::new();
    let mut gap_count = 0;

    for k in 0..resolution {
        let (x, y, z) = ray_coordinate(axis, i, j, k);
        let index = x as usize + y as usize * r + z as usize * r * r;

        if cells[index] > 0 && !visited[index] {
            lane.push(LanePoint { x, y, z, index });
            visited[index] = true;
            gap_count = 0;
        } else if !lane.is_empty() {
            gap_count += 1;
            if gap_count > max_gap {
                break;
            }
        }
    }

    lane
}

/// Same axis, and more than half of the shorter lane's cells appear in both.
pub fn lanes_overlap(a: &Lane, b: &Lane) -> bool {
    if a.direction != b.direction {
        return false;
    }

    let shared = a
        .points
        .iter()
        .filter(|p| b.points.iter().any(|q| p.same_cell(q)))
        .count();

    2 * shared > a.length.min(b.length)
}

/// Keep lanes in order, dropping any that overlaps an already kept lane.
pub fn filter_overlapping(lanes: Vec<Lane>) -> Vec<Lane> {
    let mut filtered: Vec<Lane> = Vec::with_capacity(lanes.len());
    for lane in lanes {
        if !filtered.iter().any(|kept| lanes_overlap(&lane, kept)) {
            filtered.push(lane);
        }
    }
    filtered
}

/// Lane detector with a monotonic pass counter for lane ids.
#[derive(Debug, Default)]
pub struct LaneDetector {
    config: LaneConfig,
    passes: AtomicU64,
}

impl LaneDetector {
    pub fn new(config: LaneConfig) -> Self {
        Self {
            config,
            passes: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &LaneConfig {
        &self.config
    }

    /// Number of detection passes run so far.
    pub fn passes_run(&self) -> u64 {
        self.passes.load(Ordering::Relaxed)
    }

    /// Claim `count` consecutive pass numbers, returning the first.
    pub(crate) fn reserve_passes(&self, count: u64) -> u64 {
        self.passes.fetch_add(count, Ordering::Relaxed)
    }

    /// Find lanes along x, y and z, in that order of precedence.
    pub fn detect_lanes(&self, field: &VoxelField) -> Vec<Lane> {
        let pass = self.reserve_passes(1);
        self.detect_with_pass(field.cells(), field.resolution(), pass)
    }

    /// Like [`LaneDetector::detect_lanes`] over a bare cell buffer of `resolution³` cells.
    pub fn detect_lanes_raw(&self, cells: &[u8], resolution: i16) -> Result<Vec<Lane>, FieldError> {
        if resolution < 1 {
            return Err(FieldError::InvalidResolution { resolution });
        }
        let expected = cell_count(resolution);
        if cells.len() != expected {
            return Err(FieldError::SizeMismatch {
                expected,
                actual: cells.len(),
            });
        }
        let pass = self.reserve_passes(1);
        Ok(self.detect_with_pass(cells, resolution, pass))
    }

    pub(crate) fn detect_with_pass(&self, cells: &[u8], resolution: i16, pass: u64) -> Vec<Lane> {
        let mut visited = vec![false; cells.len()];
        let mut lanes = Vec::new();

        for axis in Axis::ALL {
            for i in 0..resolution {
                for j in 0..resolution {
                    let points = trace_lane(
                        cells,
                        resolution,
                        axis,
                        i,
                        j,
                        &mut visited,
                        self.config.max_gap,
                    );
                    if points.is_empty() || points.len() < self.config.min_lane_length {
                        continue;
                    }

                    lanes.push(Lane {
                        direction: axis,
                        length: points.len(),
                        points,
                        id: LaneId { axis, i, j, pass },
                    });
                }
            }
        }

        filter_overlapping(lanes)
    }
}

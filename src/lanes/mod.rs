//! Lane analysis over voxel fields.
//!
//! `detect` finds axis-aligned runs of active cells in one field; `track`
//! follows them across consecutive fields.

pub mod detect;
pub mod track;

pub use crate::automaton::voxel::Axis;
pub use detect::{filter_overlapping, lanes_overlap, Lane, LaneConfig, LaneDetector, LaneId, LanePoint};
pub use track::{
    find_matching_lane, lane_evolution, lane_similarity, HyperspaceLane, LaneEvolution,
    MIN_TRACKED_FRAMES,
};

//! Reversible Automata - 3D Margolus cellular automata with lane analysis.
//!
//! A cubic field of binary voxels is advanced by block-partitioned reversible
//! rules. Forward steps are recorded in a bounded history so they can be undone,
//! and a heuristic search can look for predecessors beyond it. The `lanes`
//! module finds axis-aligned runs of active cells and follows them over time.
//!
//! A C ABI in [`ffi`] exposes the engine through an opaque handle.

pub mod automaton;
pub mod error;
pub mod ffi;
pub mod lanes;

pub use automaton::{CaEngine, EngineConfig, RuleKind, VoxelField};
pub use error::{EngineError, FieldError};
pub use lanes::{HyperspaceLane, Lane, LaneConfig, LaneDetector};

#[cfg(test)]
mod tests;

//! Core automaton logic.
//!
//! This module contains the voxel field, the Margolus block rules and
//! stepping, the snapshot history and the engine that ties them together.
//! The FFI layer in `ffi/` calls into [`CaEngine`].

pub mod engine;
pub mod history;
pub mod margolus;
pub mod region;
pub mod reverse;
pub mod rules;
pub mod voxel;

pub use engine::{CaEngine, EngineConfig, SEED_EVENTS};
pub use history::{History, DEFAULT_MAX_HISTORY};
pub use margolus::margolus_step;
pub use region::{extract_region, import_region};
pub use reverse::{NoiseReverseSearch, ReverseOutcome, ReverseSearch, SearchResult};
pub use rules::{apply_rule, audit_all_rules, audit_rule, reverse_rule, Block, RuleAudit, RuleKind};
pub use voxel::{Axis, VoxelField};

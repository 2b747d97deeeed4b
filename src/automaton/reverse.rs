//! Heuristic whole-field reversal.
//!
//! This is not an inverse of the Margolus step. A strategy proposes candidate
//! predecessors and keeps the first one the forward step maps exactly onto
//! the current field. Failure is the common case.

use super::voxel::VoxelField;

/// Default number of candidates tried by [`NoiseReverseSearch`].
pub const DEFAULT_REVERSE_ATTEMPTS: usize = 10;

/// What a reversal strategy found.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// A field that steps forward onto the current one, if any was found.
    pub candidate: Option<VoxelField>,
    /// Candidates generated before stopping.
    pub attempts: usize,
}

/// Outcome reported by [`CaEngine::reverse_step_outcome`](super::CaEngine::reverse_step_outcome).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReverseOutcome {
    pub succeeded: bool,
    pub attempts: usize,
}

/// A pluggable predecessor search.
///
/// `forward` is the engine's own step with the partition offset that produced
/// `current`; a candidate is accepted only if `forward(candidate) == current`.
pub trait ReverseSearch: Send + Sync {
    fn search(
        &self,
        current: &VoxelField,
        forward: &dyn Fn(&VoxelField) -> VoxelField,
    ) -> SearchResult;
}

/// Flips cells of the current field by a fixed arithmetic noise pattern keyed
/// on attempt number and cell index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseReverseSearch {
    pub max_attempts: usize,
}

impl Default for NoiseReverseSearch {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_REVERSE_ATTEMPTS,
        }
    }
}

/// Whether cell `index` is flipped on attempt `attempt`.
#[inline]
fn noise_flip(attempt: usize, index: usize) -> bool {
    // Reduce first so large grids cannot overflow; the result is the same mod 256.
    let noise = ((attempt % 256) * 1337 + (index % 256) * 7919) % 256;
    noise > 128
}

/// Candidate predecessor for one attempt. Output cells are always 0 or 1.
pub fn noise_candidate(current: &VoxelField, attempt: usize) -> VoxelField {
    let cells = current
        .cells()
        .iter()
        .enumerate()
        .map(|(i, &c)| ((c as u16 + u16::from(noise_flip(attempt, i))) % 2) as u8)
        .collect();
    current.with_cells(cells)
}

impl ReverseSearch for NoiseReverseSearch {
    fn search(
        &self,
        current: &VoxelField,
        forward: &dyn Fn(&VoxelField) -> VoxelField,
    ) -> SearchResult {
        for attempt in 0..self.max_attempts {
            let candidate = noise_candidate(current, attempt);
            if forward(&candidate) == *current {
                return SearchResult {
                    candidate: Some(candidate),
                    attempts: attempt + 1,
                };
            }
        }

        SearchResult {
            candidate: None,
            attempts: self.max_attempts,
        }
    }
}

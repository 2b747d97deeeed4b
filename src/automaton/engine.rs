//! Margolus cellular automaton engine.
//!
//! Owns the current field, the snapshot history used for backward stepping,
//! the active block rule and a pluggable reversal strategy. All transitions are
//! synchronous; the rayon pool only parallelises work inside a single step.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::history::{History, DEFAULT_MAX_HISTORY};
use super::margolus::margolus_step;
use super::reverse::{NoiseReverseSearch, ReverseOutcome, ReverseSearch};
use super::rules::RuleKind;
use super::voxel::VoxelField;
use crate::error::EngineError;

/// Impulse origins placed by [`CaEngine::initialize`].
pub const SEED_EVENTS: [[i16; 3]; 4] = [[10, 10, 10], [11, 10, 10], [10, 11, 10], [11, 11, 10]];

/// Engine construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Edge length of the cubic field. Must be even.
    pub resolution: i16,
    pub rule: RuleKind,
    /// Snapshots retained for backward stepping (at least 2).
    pub max_history: usize,
    /// Worker threads for block transforms (0 is treated as 1).
    pub num_threads: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resolution: 20,
            rule: RuleKind::Rotate,
            max_history: DEFAULT_MAX_HISTORY,
            num_threads: 1,
        }
    }
}

impl EngineConfig {
    pub fn with_resolution(mut self, resolution: i16) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_rule(mut self, rule: RuleKind) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    pub fn with_num_threads(mut self, num_threads: u8) -> Self {
        self.num_threads = num_threads;
        self
    }
}

fn build_thread_pool(num_threads: u8) -> Result<rayon::ThreadPool, EngineError> {
    let num_threads = num_threads.max(1) as usize;
    match rayon::ThreadPoolBuilder::new().num_threads(num_threads).build() {
        Ok(pool) => Ok(pool),
        Err(_) => Ok(rayon::ThreadPoolBuilder::new().num_threads(1).build()?),
    }
}

pub struct CaEngine {
    field: VoxelField,
    history: History,
    rule: RuleKind,
    generation: u64,
    /// Partition offset of the next forward step. Flips on every transition.
    parity: usize,
    reverse_search: Box<dyn ReverseSearch>,
    thread_pool: rayon::ThreadPool,
}

impl CaEngine {
    /// Build an engine and seed it with [`CaEngine::initialize`].
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let field = VoxelField::new(config.resolution)?;
        if config.resolution % 2 != 0 {
            return Err(EngineError::OddResolution {
                resolution: config.resolution,
            });
        }

        let mut engine = CaEngine {
            field,
            history: History::with_capacity(config.max_history.max(2)),
            rule: config.rule,
            generation: 0,
            parity: 0,
            reverse_search: Box::new(NoiseReverseSearch::default()),
            thread_pool: build_thread_pool(config.num_threads)?,
        };
        engine.initialize();
        Ok(engine)
    }

    /// Clear field and history, place the four seed impulses, and record the
    /// seeded field as the first snapshot.
    pub fn initialize(&mut self) {
        self.field.fill(0);
        self.history.clear();
        self.generation = 0;
        self.parity = 0;

        for [x, y, z] in SEED_EVENTS {
            self.add_dirac_event(x, y, z);
        }

        self.history.push(self.field.clone());
    }

    pub fn reset(&mut self) {
        self.initialize();
    }

    /// Activate a cell and its +x, +y, +z neighbours. Out-of-bounds cells are skipped.
    pub fn add_dirac_event(&mut self, x: i16, y: i16, z: i16) {
        self.field.set(x, y, z, 1);
        self.field.set(x.saturating_add(1), y, z, 1);
        self.field.set(x, y.saturating_add(1), z, 1);
        self.field.set(x, y, z.saturating_add(1), 1);
    }

    /// Partition offset the next forward step will use.
    ///
    /// Tracked apart from the generation counter, which saturates at 0, so a
    /// field adopted by [`CaEngine::reverse_step`] still steps forward onto the
    /// field it was reversed from.
    pub fn partition_offset(&self) -> usize {
        self.parity
    }

    /// Partition offset that produced the current field.
    fn previous_partition_offset(&self) -> usize {
        self.parity ^ 1
    }

    /// Snapshot the field, then replace it with one Margolus step under the active rule.
    pub fn step_forward(&mut self) {
        self.history.push(self.field.clone());

        let offset = self.partition_offset();
        let rule = self.rule;
        let field = &self.field;
        let next = self
            .thread_pool
            .install(|| margolus_step(field, offset, rule));

        self.field = next;
        self.generation += 1;
        self.parity ^= 1;
    }

    /// Restore the newest snapshot. Does nothing once only the first snapshot remains.
    ///
    /// Returns whether the field changed.
    pub fn step_backward(&mut self) -> bool {
        if self.history.len() <= 1 {
            return false;
        }
        match self.history.pop() {
            Some(previous) => {
                self.field = previous;
                self.generation = self.generation.saturating_sub(1);
                self.parity ^= 1;
                true
            }
            None => false,
        }
    }

    /// Experimental predecessor search. History is left untouched.
    ///
    /// Returns `true` if a candidate was adopted as the current field.
    pub fn reverse_step(&mut self) -> bool {
        self.reverse_step_outcome().succeeded
    }

    /// Like [`CaEngine::reverse_step`], also reporting how many candidates were tried.
    pub fn reverse_step_outcome(&mut self) -> ReverseOutcome {
        let offset = self.previous_partition_offset();
        let rule = self.rule;
        let search = &self.reverse_search;
        let current = &self.field;

        let result = self.thread_pool.install(|| {
            search.search(current, &|candidate: &VoxelField| {
                margolus_step(candidate, offset, rule)
            })
        });

        match result.candidate {
            Some(candidate) => {
                self.field = candidate;
                self.generation = self.generation.saturating_sub(1);
                self.parity ^= 1;
                ReverseOutcome {
                    succeeded: true,
                    attempts: result.attempts,
                }
            }
            None => ReverseOutcome {
                succeeded: false,
                attempts: result.attempts,
            },
        }
    }

    /// Swap the predecessor search used by [`CaEngine::reverse_step`].
    pub fn set_reverse_search(&mut self, search: Box<dyn ReverseSearch>) {
        self.reverse_search = search;
    }

    pub fn active_count(&self) -> usize {
        self.field.active_count()
    }

    pub fn get_cell(&self, x: i16, y: i16, z: i16) -> u8 {
        self.field.get(x, y, z)
    }

    pub fn set_cell(&mut self, x: i16, y: i16, z: i16, value: u8) {
        self.field.set(x, y, z, value);
    }

    pub fn field(&self) -> &VoxelField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut VoxelField {
        &mut self.field
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn resolution(&self) -> i16 {
        self.field.resolution()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn rule(&self) -> RuleKind {
        self.rule
    }

    pub fn set_rule(&mut self, rule: RuleKind) {
        self.rule = rule;
    }
}

//! Bounded snapshot stack for backward stepping.
//!
//! Stores whole-field copies, oldest first. Pushing past capacity evicts the
//! oldest snapshot, so the newest `capacity` entries are always retained.

use std::collections::VecDeque;

use super::voxel::VoxelField;

/// Default number of retained snapshots.
pub const DEFAULT_MAX_HISTORY: usize = 100;

#[derive(Debug, Clone)]
pub struct History {
    /// All snapshots (oldest first).
    snapshots: VecDeque<VoxelField>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_HISTORY)
    }
}

impl History {
    /// Create an empty history. A capacity of 0 is raised to 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a snapshot, evicting the oldest when over capacity.
    pub fn push(&mut self, snapshot: VoxelField) {
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
        }
    }

    /// Remove and return the newest snapshot.
    pub fn pop(&mut self) -> Option<VoxelField> {
        self.snapshots.pop_back()
    }

    /// Newest snapshot.
    pub fn last(&self) -> Option<&VoxelField> {
        self.snapshots.back()
    }

    /// Oldest retained snapshot.
    pub fn oldest(&self) -> Option<&VoxelField> {
        self.snapshots.front()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    /// Snapshots oldest first, ready to hand to time-series lane tracking.
    pub fn frames(&self) -> Vec<VoxelField> {
        self.snapshots.iter().cloned().collect()
    }
}

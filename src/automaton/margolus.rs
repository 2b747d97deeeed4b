//! Margolus partition stepping.
//!
//! The grid is cut into 2×2×2 blocks whose corners sit on even coordinates
//! shifted by `offset` (0 or 1) and wrapped around every axis. Each block is
//! read from the generation-N buffer, transformed by the rule, and written into
//! a fresh generation-N+1 buffer, so block order never affects the result.

use rayon::prelude::*;

use super::rules::{Block, RuleKind};
use super::voxel::VoxelField;

/// Block corners in z, y, x sweep order, before the partition offset is applied.
pub fn block_origins(resolution: usize) -> Vec<[usize; 3]> {
    let mut origins = Vec::new();
    for z in (0..resolution).step_by(2) {
        for y in (0..resolution).step_by(2) {
            for x in (0..resolution).step_by(2) {
                origins.push([x, y, z]);
            }
        }
    }
    origins
}

/// Flat indices of the eight cells of the block at `origin + offset`,
/// wrapped toroidally, in block order (`dx + 2*dy + 4*dz`).
#[inline]
pub fn block_cells(resolution: usize, origin: [usize; 3], offset: usize) -> [usize; 8] {
    let r = resolution;
    let [x, y, z] = origin;
    let (bx, by, bz) = ((x + offset) % r, (y + offset) % r, (z + offset) % r);

    std::array::from_fn(|k| {
        let cx = (bx + (k & 1)) % r;
        let cy = (by + ((k >> 1) & 1)) % r;
        let cz = (bz + ((k >> 2) & 1)) % r;
        cx + cy * r + cz * r * r
    })
}

/// Gather a block from the flat cell buffer.
#[inline]
pub fn extract_block(cells: &[u8], indices: &[usize; 8]) -> Block {
    indices.map(|i| cells[i])
}

/// Advance `field` by one Margolus step with the given partition offset.
///
/// Blocks are transformed in parallel on the current rayon pool and written
/// back in sweep order.
pub fn margolus_step(field: &VoxelField, offset: usize, rule: RuleKind) -> VoxelField {
    let r = field.resolution() as usize;
    let source = field.cells();

    let transformed: Vec<([usize; 8], Block)> = block_origins(r)
        .par_iter()
        .map(|&origin| {
            let indices = block_cells(r, origin, offset);
            let block = extract_block(source, &indices);
            (indices, rule.transform_block(block))
        })
        .collect();

    let mut next = vec![0u8; source.len()];
    for (indices, block) in transformed {
        for (idx, value) in indices.into_iter().zip(block) {
            next[idx] = value;
        }
    }

    field.with_cells(next)
}

//! Dense cubic voxel field with bounds-checked cell access.
//!
//! Cells are stored flat in x-fastest order: `index = x + y*R + z*R²`.
//! Any coordinate outside `[0, R)` on any axis reads as 0 and ignores writes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// One of the three principal axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Axes in scan order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of cells in a cube of the given edge length.
#[inline]
pub fn cell_count(resolution: i16) -> usize {
    let r = resolution.max(0) as usize;
    r * r * r
}

/// A cubic grid of 8-bit cell states. 0 = inactive, anything else = active.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoxelField {
    resolution: i16,
    cells: Vec<u8>,
}

impl VoxelField {
    /// Create an all-inactive field with edge length `resolution`.
    pub fn new(resolution: i16) -> Result<Self, FieldError> {
        if resolution < 1 {
            return Err(FieldError::InvalidResolution { resolution });
        }
        Ok(VoxelField {
            resolution,
            cells: vec![0; cell_count(resolution)],
        })
    }

    /// Wrap an existing cell buffer. The buffer must hold exactly `resolution³` cells.
    pub fn from_cells(resolution: i16, cells: Vec<u8>) -> Result<Self, FieldError> {
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
        Ok(VoxelField { resolution, cells })
    }

    /// Build a field of the same resolution from a freshly computed buffer.
    pub(crate) fn with_cells(&self, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), self.cells.len());
        VoxelField {
            resolution: self.resolution,
            cells,
        }
    }

    #[inline]
    pub fn resolution(&self) -> i16 {
        self.resolution
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Read-only view of the dense cell buffer.
    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Calculate the linear index for an in-bounds coordinate.
    #[inline]
    pub fn index_of(&self, x: i16, y: i16, z: i16) -> usize {
        let r = self.resolution as usize;
        z as usize * r * r + y as usize * r + x as usize
    }

    /// Check if coordinates are within field bounds.
    #[inline]
    pub fn in_bounds(&self, x: i16, y: i16, z: i16) -> bool {
        let r = self.resolution;
        x >= 0 && x < r && y >= 0 && y < r && z >= 0 && z < r
    }

    /// Get a cell value. Out-of-bounds reads return 0.
    pub fn get(&self, x: i16, y: i16, z: i16) -> u8 {
        if self.in_bounds(x, y, z) {
            self.cells[self.index_of(x, y, z)]
        } else {
            0
        }
    }

    /// Set a cell value. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i16, y: i16, z: i16, value: u8) {
        if self.in_bounds(x, y, z) {
            let idx = self.index_of(x, y, z);
            self.cells[idx] = value;
        }
    }

    pub fn fill(&mut self, value: u8) {
        self.cells.fill(value);
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    /// Scalar density for isosurface extraction: 1 for an active cell, 0 otherwise
    /// (including everywhere outside the grid).
    #[inline]
    pub fn density(&self, x: i16, y: i16, z: i16) -> u8 {
        u8::from(self.get(x, y, z) > 0)
    }

    /// Number of active cells.
    pub fn active_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c > 0).count()
    }

    /// Active cells of one axis-aligned slice, projected to 2D.
    ///
    /// An x-slice yields `(y, z)` points, a y-slice `(x, z)`, a z-slice `(x, y)`.
    /// An index outside the grid yields no points.
    pub fn slice_points(&self, axis: Axis, index: i16) -> Vec<[i16; 2]> {
        let r = self.resolution;
        let mut points = Vec::new();
        if index < 0 || index >= r {
            return points;
        }

        for i in 0..r {
            for j in 0..r {
                let (x, y, z, point) = match axis {
                    Axis::X => (index, j, i, [j, i]),
                    Axis::Y => (i, index, j, [i, j]),
                    Axis::Z => (i, j, index, [i, j]),
                };
                if self.get(x, y, z) > 0 {
                    points.push(point);
                }
            }
        }

        points
    }
}

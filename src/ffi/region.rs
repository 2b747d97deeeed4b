//! Bulk transfer of a box of cells between the engine field and a caller buffer.
//!
//! Buffers are laid out z-major then y then x, one byte per cell.

use crate::automaton::{self, CaEngine};

fn region_len(min: [i16; 3], max: [i16; 3]) -> usize {
    (0..3)
        .map(|axis| (i32::from(max[axis]) - i32::from(min[axis])).max(0) as usize)
        .product()
}

/// Copies the cells in `[min, max)` into `out_buf`.
///
/// # Safety
/// - `ptr` must be a valid pointer to an engine, or null
/// - `out_buf` must be valid for writes of `(max_x-min_x)*(max_y-min_y)*(max_z-min_z)` bytes
///
/// # Returns
/// Number of bytes written, or 0 on null pointers.
#[no_mangle]
pub unsafe extern "C" fn va_engine_extract_region(
    ptr: *const CaEngine,
    out_buf: *mut u8,
    min_x: i16,
    min_y: i16,
    min_z: i16,
    max_x: i16,
    max_y: i16,
    max_z: i16,
) -> u64 {
    if ptr.is_null() || out_buf.is_null() {
        return 0;
    }

    let engine = &*ptr;
    let min = [min_x, min_y, min_z];
    let max = [max_x, max_y, max_z];

    let buf_slice = std::slice::from_raw_parts_mut(out_buf, region_len(min, max));
    automaton::extract_region(engine.field(), buf_slice, min, max)
}

/// Writes `in_buf` into the cells in `[min, max)`. Non-zero bytes become 1.
///
/// # Safety
/// - `ptr` must be a valid pointer to an engine, or null
/// - `in_buf` must be valid for reads of `(max_x-min_x)*(max_y-min_y)*(max_z-min_z)` bytes
///
/// # Returns
/// Number of bytes read, or 0 on null pointers.
#[no_mangle]
pub unsafe extern "C" fn va_engine_import_region(
    ptr: *mut CaEngine,
    in_buf: *const u8,
    min_x: i16,
    min_y: i16,
    min_z: i16,
    max_x: i16,
    max_y: i16,
    max_z: i16,
) -> u64 {
    if ptr.is_null() || in_buf.is_null() {
        return 0;
    }

    let engine = &mut *ptr;
    let min = [min_x, min_y, min_z];
    let max = [max_x, max_y, max_z];

    let buf_slice = std::slice::from_raw_parts(in_buf, region_len(min, max));
    automaton::import_region(engine.field_mut(), buf_slice, min, max)
}

//! Region extraction and import operations.
//!
//! Used to hand dense sub-volumes of the field to mesh extraction and to load
//! externally edited cells back in.

use super::voxel::VoxelField;

/// Clamp a half-open box to the field, or `None` if it is empty after clamping.
fn clamp_region(
    field: &VoxelField,
    min: [i16; 3],
    max: [i16; 3],
) -> Option<([i16; 3], [i16; 3])> {
    let r = field.resolution();
    let min = min.map(|v| v.clamp(0, r));
    let max = max.map(|v| v.clamp(0, r));

    if (0..3).any(|axis| min[axis] >= max[axis]) {
        return None;
    }
    Some((min, max))
}

/// Extract a rectangular region from the field into a flat buffer.
///
/// # Layout
/// The buffer is filled in z,y,x order (z changes slowest, x changes fastest).
/// This order matches the order used by `import_region` for symmetry.
///
/// # Returns
/// Number of bytes written to the buffer, or 0 on error.
pub fn extract_region(field: &VoxelField, out_buf: &mut [u8], min: [i16; 3], max: [i16; 3]) -> u64 {
    let Some((min, max)) = clamp_region(field, min, max) else {
        return 0;
    };

    let total_size = (0..3)
        .map(|axis| (max[axis] - min[axis]) as usize)
        .product::<usize>();
    if out_buf.len() < total_size {
        return 0;
    }

    let mut offset = 0;
    for z in min[2]..max[2] {
        for y in min[1]..max[1] {
            for x in min[0]..max[0] {
                out_buf[offset] = field.get(x, y, z);
                offset += 1;
            }
        }
    }

    offset as u64
}

/// Import a rectangular region from a flat buffer into the field.
///
/// # Layout
/// The buffer is expected to be in z,y,x order (matching `extract_region`).
/// Input values are normalized: 0 = inactive, any non-zero = active.
///
/// # Returns
/// Number of bytes read from the buffer, or 0 on error.
pub fn import_region(field: &mut VoxelField, in_buf: &[u8], min: [i16; 3], max: [i16; 3]) -> u64 {
    let Some((min, max)) = clamp_region(field, min, max) else {
        return 0;
    };

    let total_size = (0..3)
        .map(|axis| (max[axis] - min[axis]) as usize)
        .product::<usize>();
    if in_buf.len() < total_size {
        return 0;
    }

    let mut offset = 0;
    for z in min[2]..max[2] {
        for y in min[1]..max[1] {
            for x in min[0]..max[0] {
                field.set(x, y, z, u8::from(in_buf[offset] != 0));
                offset += 1;
            }
        }
    }

    offset as u64
}

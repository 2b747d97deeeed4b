//! Lane queries over the engine's current field.

use crate::automaton::CaEngine;
use crate::lanes::LaneDetector;

/// Counts lanes in the current field using the default lane configuration.
///
/// # Safety
/// - `ptr` must be a valid pointer to an engine, or null
///
/// # Returns
/// Number of lanes found, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn va_engine_lane_count(ptr: *const CaEngine) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    LaneDetector::default().detect_lanes((*ptr).field()).len() as u64
}

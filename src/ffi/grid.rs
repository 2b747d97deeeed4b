//! Cell access, seeding and stepping.

use crate::automaton::{CaEngine, RuleKind};

/// Sets a cell value.
///
/// # Safety
/// - `ptr` must be a valid pointer to an engine, or null
///
/// Out-of-bounds coordinates are silently ignored.
#[no_mangle]
pub unsafe extern "C" fn va_engine_set_cell(ptr: *mut CaEngine, x: i16, y: i16, z: i16, value: u8) {
    if ptr.is_null() {
        return;
    }
    (*ptr).set_cell(x, y, z, value);
}

/// Gets a cell value.
///
/// # Safety
/// - `ptr` must be a valid pointer to an engine, or null
///
/// # Returns
/// The cell value, or 0 if out of bounds or null pointer.
#[no_mangle]
pub unsafe extern "C" fn va_engine_get_cell(ptr: *const CaEngine, x: i16, y: i16, z: i16) -> u8 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).get_cell(x, y, z)
}

/// Activates a cell and its +x, +y, +z neighbours.
///
/// # Safety
/// - `ptr` must be a valid pointer to an engine, or null
#[no_mangle]
pub unsafe extern "C" fn va_engine_add_dirac(ptr: *mut CaEngine, x: i16, y: i16, z: i16) {
    if ptr.is_null() {
        return;
    }
    (*ptr).add_dirac_event(x, y, z);
}

/// Selects the block rule by code (0 rotate, 1 bbm, 2 hpp, 3 custom).
///
/// # Safety
/// - `ptr` must be a valid pointer to an engine, or null
#[no_mangle]
pub unsafe extern "C" fn va_engine_set_rule(ptr: *mut CaEngine, rule: u8) {
    if ptr.is_null() {
        return;
    }
    (*ptr).set_rule(RuleKind::from_code(rule));
}

/// Advances the automaton by one Margolus step.
///
/// # Safety
/// - `ptr` must be a valid pointer to an engine, or null
#[no_mangle]
pub unsafe extern "C" fn va_engine_step_forward(ptr: *mut CaEngine) {
    if ptr.is_null() {
        return;
    }
    (*ptr).step_forward();
}

/// Restores the previous snapshot.
///
/// # Safety
/// - `ptr` must be a valid pointer to an engine, or null
///
/// # Returns
/// 1 if the field changed, 0 if history is exhausted or ptr is null.
#[no_mangle]
pub unsafe extern "C" fn va_engine_step_backward(ptr: *mut CaEngine) -> u8 {
    if ptr.is_null() {
        return 0;
    }
    u8::from((*ptr).step_backward())
}

/// Runs the heuristic predecessor search.
///
/// # Safety
/// - `ptr` must be a valid pointer to an engine, or null
///
/// # Returns
/// 1 if a predecessor was adopted, 0 otherwise.
#[no_mangle]
pub unsafe extern "C" fn va_engine_reverse_step(ptr: *mut CaEngine) -> u8 {
    if ptr.is_null() {
        return 0;
    }
    u8::from((*ptr).reverse_step())
}

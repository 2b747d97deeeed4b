//! Engine creation, destruction, reset and counters.

use crate::automaton::{CaEngine, EngineConfig, RuleKind};

/// Creates a seeded engine and returns an opaque pointer.
///
/// `rule` is a rule code (0 rotate, 1 bbm, 2 hpp, 3 custom; anything else rotate).
///
/// # Returns
/// A pointer to a new engine, or null if `resolution` is not a positive even number.
///
/// # Safety
/// The returned pointer must eventually be freed with `va_engine_destroy()`.
#[no_mangle]
pub extern "C" fn va_engine_create(resolution: i16, rule: u8) -> *mut CaEngine {
    let config = EngineConfig::default()
        .with_resolution(resolution)
        .with_rule(RuleKind::from_code(rule));

    match CaEngine::new(config) {
        Ok(engine) => Box::into_raw(Box::new(engine)),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Destroys an engine and frees its memory.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `va_engine_create()`, or null
/// - `ptr` must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn va_engine_destroy(ptr: *mut CaEngine) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

/// Clears the engine back to its four seed impulses and a single snapshot.
///
/// # Safety
/// - `ptr` must be a valid pointer to an engine, or null
#[no_mangle]
pub unsafe extern "C" fn va_engine_reset(ptr: *mut CaEngine) {
    if ptr.is_null() {
        return;
    }
    (*ptr).reset();
}

/// Gets the generation counter.
///
/// # Safety
/// - `ptr` must be a valid pointer to an engine, or null
///
/// # Returns
/// The generation counter, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn va_engine_generation(ptr: *const CaEngine) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).generation()
}

/// Number of snapshots available for backward stepping.
///
/// # Safety
/// - `ptr` must be a valid pointer to an engine, or null
#[no_mangle]
pub unsafe extern "C" fn va_engine_history_len(ptr: *const CaEngine) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).history().len() as u64
}

/// Number of active cells.
///
/// # Safety
/// - `ptr` must be a valid pointer to an engine, or null
#[no_mangle]
pub unsafe extern "C" fn va_engine_active_count(ptr: *const CaEngine) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).active_count() as u64
}

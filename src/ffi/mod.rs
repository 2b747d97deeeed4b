//! C FFI layer.
//!
//! Exports C ABI functions operating on an opaque [`CaEngine`](crate::automaton::CaEngine)
//! handle. All functions are marked with `#[no_mangle]` and use `extern "C"`.
//!
//! The actual logic is in the `automaton` and `lanes` modules. These functions are
//! thin wrappers that handle null checks, pointer safety, and C-to-Rust conversions.

pub mod grid;
pub mod lanes;
pub mod lifecycle;
pub mod region;

pub use grid::{
    va_engine_add_dirac, va_engine_get_cell, va_engine_reverse_step, va_engine_set_cell,
    va_engine_set_rule, va_engine_step_backward, va_engine_step_forward,
};
pub use lanes::va_engine_lane_count;
pub use lifecycle::{
    va_engine_active_count, va_engine_create, va_engine_destroy, va_engine_generation,
    va_engine_history_len, va_engine_reset,
};
pub use region::{va_engine_extract_region, va_engine_import_region};

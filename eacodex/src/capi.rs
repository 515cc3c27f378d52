//! C-ABI shims for legacy `ea_compression` callers.
//!
//! Enabled with:
//!   cargo build --release --features capi
//!
//! The produced cdylib/staticlib keeps the classic symbol names and return
//! codes, so existing FFI bindings link against it unchanged.

use std::os::raw::{c_char, c_int};
use std::slice;

use eacodex_core::error::CodexError;

use crate::engine;

const EA_ERROR_UNSUPPORTED_FORMAT: c_int = -1;
const EA_ERROR_DECODE_FAILED: c_int = -2;
// -3 is reserved for compression failures in the legacy numbering.
const EA_ERROR_NULL_ARGUMENT: c_int = -4;
const EA_ERROR_BUFFER_TOO_SMALL: c_int = -5;

const VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"), "\0");

fn map_error(err: &CodexError) -> c_int {
    match err {
        CodexError::UnsupportedFormat => EA_ERROR_UNSUPPORTED_FORMAT,
        CodexError::BufferTooSmall { .. } => EA_ERROR_BUFFER_TOO_SMALL,
        _ => EA_ERROR_DECODE_FAILED,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ea_format_t ea_detect_format(const unsigned char *data, int size);
//
// Returns the wire code of the detected format (0..4), or -1 for unknown
// input. Never reports any other error; bad arguments read as unknown.
// ─────────────────────────────────────────────────────────────────────────────

/// Detect the container format of `data`.
///
/// # Safety
///
/// `data` must be null or point to at least `size` readable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ea_detect_format(data: *const u8, size: c_int) -> c_int {
    if data.is_null() || size < 0 {
        return EA_ERROR_UNSUPPORTED_FORMAT;
    }
    let blob = unsafe { slice::from_raw_parts(data, size as usize) };
    engine::detect(blob).code()
}

// ─────────────────────────────────────────────────────────────────────────────
// int ea_get_decompressed_size(const unsigned char *data, int size);
//
// Returns the declared decompressed length, or -1 on any failure.
// ─────────────────────────────────────────────────────────────────────────────

/// Read the declared decompressed length from a blob's header.
///
/// # Safety
///
/// `data` must be null or point to at least `size` readable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ea_get_decompressed_size(data: *const u8, size: c_int) -> c_int {
    if data.is_null() || size < 0 {
        return EA_ERROR_UNSUPPORTED_FORMAT;
    }
    let blob = unsafe { slice::from_raw_parts(data, size as usize) };
    match engine::query_size(blob) {
        // Bounded to i32 during header validation, so the cast is exact.
        Ok(n) => n as c_int,
        Err(_) => EA_ERROR_UNSUPPORTED_FORMAT,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// int ea_decompress(const unsigned char *in, int in_size,
//                   unsigned char *out, int out_capacity);
//
// Returns the number of bytes written to out, or a negative error code.
// ─────────────────────────────────────────────────────────────────────────────

/// Decompress a blob into a caller-provided buffer.
///
/// # Safety
///
/// `input` must be null or point to at least `in_size` readable bytes, and
/// `output` must be null or point to at least `out_capacity` writable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ea_decompress(
    input: *const u8,
    in_size: c_int,
    output: *mut u8,
    out_capacity: c_int,
) -> c_int {
    if input.is_null() || output.is_null() || in_size < 0 || out_capacity < 0 {
        return EA_ERROR_NULL_ARGUMENT;
    }
    let blob = unsafe { slice::from_raw_parts(input, in_size as usize) };
    let out = unsafe { slice::from_raw_parts_mut(output, out_capacity as usize) };
    match engine::decompress(blob, out) {
        Ok(n) => n as c_int,
        Err(err) => map_error(&err),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// const char *ea_version(void);
// ─────────────────────────────────────────────────────────────────────────────

/// Version string of the library, as a static NUL-terminated C string.
#[unsafe(no_mangle)]
pub extern "C" fn ea_version() -> *const c_char {
    VERSION.as_ptr() as *const c_char
}

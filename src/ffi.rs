//! FFI bindings for Stress Flux
//!
//! This module provides C-compatible functions for calling Stress Flux from other
//! languages. All functions use C strings (null-terminated) and return allocated
//! memory that must be freed by the caller using `stress_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::aggregator::{logs_to_dashboard_json, Aggregator};
use crate::config::AggregatorConfig;
use crate::error::ComputeError;
use crate::schema::LogAdapter;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Read an optional config pointer; NULL means the default configuration
unsafe fn config_from_ptr(config_json: *const c_char) -> Result<AggregatorConfig, ComputeError> {
    if config_json.is_null() {
        return Ok(AggregatorConfig::default());
    }
    let json = cstr_to_string(config_json)
        .ok_or_else(|| ComputeError::InvalidConfig("config is not valid UTF-8".to_string()))?;
    AggregatorConfig::from_json(&json)
}

fn aggregate_to_json(logs_json: &str, config: AggregatorConfig) -> Result<String, ComputeError> {
    let logs = LogAdapter::parse_array(logs_json)?;
    let snapshot = Aggregator::new(config)?.aggregate_logs(&logs).snapshot;
    Ok(serde_json::to_string(&snapshot)?)
}

// ============================================================================
// Aggregation API
// ============================================================================

/// Aggregate a JSON array of logs and return the snapshot JSON.
///
/// # Safety
/// - `logs_json` must be a valid null-terminated C string.
/// - `config_json` must be a valid null-terminated C string or NULL for defaults.
/// - Returns a newly allocated string that must be freed with `stress_free_string`.
/// - Returns NULL on error; call `stress_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn stress_aggregate_json(
    logs_json: *const c_char,
    config_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let logs_str = match cstr_to_string(logs_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid logs string pointer");
            return ptr::null_mut();
        }
    };

    let config = match config_from_ptr(config_json) {
        Ok(config) => config,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    match aggregate_to_json(&logs_str, config) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Aggregate a JSON array of logs and return the dashboard payload JSON.
///
/// # Safety
/// - `logs_json` must be a valid null-terminated C string.
/// - `config_json` must be a valid null-terminated C string or NULL for defaults.
/// - Returns a newly allocated string that must be freed with `stress_free_string`.
/// - Returns NULL on error; call `stress_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn stress_dashboard_json(
    logs_json: *const c_char,
    config_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let logs_str = match cstr_to_string(logs_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid logs string pointer");
            return ptr::null_mut();
        }
    };

    let config = match config_from_ptr(config_json) {
        Ok(config) => config,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    match logs_to_dashboard_json(&logs_str, config) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Stress Flux functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Stress Flux function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn stress_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Stress Flux call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn stress_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Stress Flux library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn stress_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

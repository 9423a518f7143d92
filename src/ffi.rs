//! FFI bindings for the EmoS engine
//!
//! This module provides C-compatible functions for calling the engine from other
//! languages. All functions use C strings (null-terminated) and return allocated
//! memory that must be freed by the caller using `emos_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::fmt::Display;
use std::os::raw::c_char;
use std::ptr;

use crate::error::AssessmentError;
use crate::pipeline::{phq9_to_json, AssessmentEngine};

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Replace the calling thread's error slot
fn record_error(error: Option<&dyn Display>) {
    LAST_ERROR.with(|slot| {
        *slot.borrow_mut() = error.and_then(|e| CString::new(e.to_string()).ok());
    });
}

/// Borrow a C string argument as UTF-8, naming the argument on failure
unsafe fn read_arg<'a>(arg: *const c_char, name: &str) -> Result<&'a str, String> {
    if arg.is_null() {
        return Err(format!("{name} is NULL"));
    }
    CStr::from_ptr(arg)
        .to_str()
        .map_err(|_| format!("{name} is not valid UTF-8"))
}

/// Hand an engine result to C: an owned string, or NULL with the error recorded
fn into_c_string(result: Result<String, AssessmentError>) -> *mut c_char {
    match result.map(CString::new) {
        Ok(Ok(text)) => text.into_raw(),
        Ok(Err(nul)) => {
            record_error(Some(&nul));
            ptr::null_mut()
        }
        Err(e) => {
            record_error(Some(&e));
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Score PHQ-9 responses and return the encoded result JSON.
///
/// # Safety
/// - `responses_json` must be a valid null-terminated C string holding either a
///   JSON array of nine integers or `{"responses": [...]}`.
/// - Returns a newly allocated string that must be freed with `emos_free_string`.
/// - Returns NULL on error; call `emos_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn emos_phq9_score(responses_json: *const c_char) -> *mut c_char {
    record_error(None);

    match read_arg(responses_json, "responses_json") {
        Ok(json) => into_c_string(phq9_to_json(json)),
        Err(msg) => {
            record_error(Some(&msg));
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Engine API
// ============================================================================

/// Opaque handle to an AssessmentEngine
pub struct EngineHandle {
    engine: AssessmentEngine,
}

/// Load a model artifact and create an engine.
///
/// # Safety
/// - `model_path` must be a valid null-terminated C string.
/// - Returns a pointer to a newly allocated engine; free it with `emos_engine_free`.
/// - Returns NULL on error; call `emos_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn emos_engine_new(model_path: *const c_char) -> *mut EngineHandle {
    record_error(None);

    let loaded = read_arg(model_path, "model_path")
        .and_then(|path| AssessmentEngine::load(path).map_err(|e| e.to_string()));

    match loaded {
        Ok(engine) => Box::into_raw(Box::new(EngineHandle { engine })),
        Err(msg) => {
            record_error(Some(&msg));
            ptr::null_mut()
        }
    }
}

/// Free an engine.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `emos_engine_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn emos_engine_free(engine: *mut EngineHandle) {
    if !engine.is_null() {
        drop(Box::from_raw(engine));
    }
}

/// Assess a lifestyle profile and return the encoded report JSON.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `emos_engine_new`.
/// - `profile_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `emos_free_string`.
/// - Returns NULL on error; call `emos_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn emos_engine_assess(
    engine: *const EngineHandle,
    profile_json: *const c_char,
) -> *mut c_char {
    record_error(None);

    let Some(handle) = engine.as_ref() else {
        record_error(Some(&"engine is NULL"));
        return ptr::null_mut();
    };

    match read_arg(profile_json, "profile_json") {
        Ok(json) => into_c_string(handle.engine.assess_json(json)),
        Err(msg) => {
            record_error(Some(&msg));
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by engine functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by an engine function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn emos_free_string(ptr: *mut c_char) {
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
/// - The returned pointer is valid until the next engine call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn emos_last_error() -> *const c_char {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(ptr::null(), |message| message.as_ptr())
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the engine library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn emos_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

//! # FFI Types
//!
//! String conversion at the C boundary and the single place where a
//! structured [`Error`] is flattened to the empty string.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::error::{Error, Result};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Convert a C string to a Rust String
///
/// Returns `None` for a null pointer or bytes that are not UTF-8.
///
/// # Safety
/// The caller must ensure the pointer is valid and null-terminated.
pub unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(String::from)
}

/// Read a C string argument, naming it in the error
///
/// # Safety
/// Same as [`cstr_to_string`].
pub(crate) unsafe fn required_arg(ptr: *const c_char, name: &'static str) -> Result<String> {
    cstr_to_string(ptr).ok_or(Error::InvalidEncoding(name))
}

/// Read a C string argument as raw bytes
///
/// For payloads (messages, plaintexts, derivation factors), which need not
/// be UTF-8. Only null is rejected.
///
/// # Safety
/// Same as [`cstr_to_string`].
pub(crate) unsafe fn required_bytes(ptr: *const c_char, name: &'static str) -> Result<Vec<u8>> {
    if ptr.is_null() {
        return Err(Error::InvalidEncoding(name));
    }
    Ok(CStr::from_ptr(ptr).to_bytes().to_vec())
}

/// Hand a string to the caller as a heap-allocated C string
///
/// Bytes containing an interior NUL cannot be represented and become the
/// empty string.
pub(crate) fn into_c_string(bytes: impl Into<Vec<u8>>) -> *mut c_char {
    match CString::new(bytes) {
        Ok(s) => s.into_raw(),
        Err(_) => {
            tracing::warn!("result contains an interior NUL, returning empty string");
            empty_c_string()
        }
    }
}

/// An owned empty C string
pub(crate) fn empty_c_string() -> *mut c_char {
    CString::default().into_raw()
}

/// Flatten an operation result for the C boundary
///
/// `Ok` becomes the value; any `Err` is logged with its kind and code, then
/// becomes the empty string. Failures of `aes_decrypt` on the ciphertext
/// are logged as one class without their kind.
pub(crate) fn flatten<T: Into<Vec<u8>>>(operation: &'static str, result: Result<T>) -> *mut c_char {
    match result {
        Ok(value) => into_c_string(value),
        Err(e) => {
            log_failure(operation, &e);
            empty_c_string()
        }
    }
}

/// Log a failure that is about to be flattened
pub(crate) fn log_failure(operation: &'static str, error: &Error) {
    if operation == "aes_decrypt" && error.is_decryption_failure() {
        tracing::warn!(operation, code = error.code(), "decryption failed");
    } else {
        tracing::warn!(operation, kind = error.kind(), code = error.code(), error = %error, "operation failed");
    }
}

/// Free a C string allocated by Rust
///
/// Null is accepted and ignored.
///
/// # Safety
/// The pointer must have been returned by a `conncrypt_*` function and not
/// freed before.
#[no_mangle]
pub unsafe extern "C" fn conncrypt_string_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

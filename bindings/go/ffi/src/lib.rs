//! C-FFI layer for semdoc, used by Go (cgo) and other FFI consumers.
//!
//! All calls delegate to `semdoc-core`.
//!
//! # Memory Contract
//!
//! Every string in a returned `SemdocResult` is allocated via `CString`.
//! The caller MUST free it by calling `semdoc_free_string()`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Result from a semdoc FFI call.
/// If `error` is null, the call succeeded and `result` contains the output.
/// If `error` is non-null, `error` contains the message and `result` is null.
/// Boolean answers are returned as the strings `"true"` and `"false"`.
#[repr(C)]
pub struct SemdocResult {
    pub result: *mut c_char,
    pub error: *mut c_char,
}

impl SemdocResult {
    fn ok(value: String) -> Self {
        SemdocResult {
            result: into_c_string(value),
            error: std::ptr::null_mut(),
        }
    }

    fn err(msg: String) -> Self {
        SemdocResult {
            result: std::ptr::null_mut(),
            error: into_c_string(msg),
        }
    }

    fn from_result(result: semdoc_core::Result<String>) -> Self {
        match result {
            Ok(value) => SemdocResult::ok(value),
            Err(e) => SemdocResult::err(e.to_string()),
        }
    }
}

/// Interior NULs cannot cross the C boundary; they are dropped.
fn into_c_string(value: String) -> *mut c_char {
    let bytes: Vec<u8> = value.into_bytes().into_iter().filter(|b| *b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}

/// Returns None if the pointer is null or not valid UTF-8.
unsafe fn cstr_to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

macro_rules! c_arg {
    ($ptr:expr, $name:literal) => {
        match cstr_to_str($ptr) {
            Some(s) => s,
            None => {
                return SemdocResult::err(concat!("null or invalid UTF-8 ", $name).into())
            }
        }
    };
}

/// Rewrite a document to canonical YAML.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `semdoc_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn semdoc_canonicalize(text: *const c_char) -> SemdocResult {
    let text = c_arg!(text, "input");
    SemdocResult::from_result(semdoc_core::canonicalize(text))
}

/// Rewrite duration literals in arbitrary text.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `semdoc_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn semdoc_normalize_durations(text: *const c_char) -> SemdocResult {
    let text = c_arg!(text, "input");
    SemdocResult::ok(semdoc_core::normalize_durations(text))
}

/// Keep only the fields of `source` present in `template`.
///
/// # Safety
/// `source` and `template` must be valid null-terminated UTF-8 C strings.
/// The caller must free the returned strings with `semdoc_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn semdoc_project_by_template(
    source: *const c_char,
    template: *const c_char,
) -> SemdocResult {
    let source = c_arg!(source, "source");
    let template = c_arg!(template, "template");
    SemdocResult::from_result(semdoc_core::project_by_template(source, template))
}

/// Semantic equality; `result` is `"true"` or `"false"`.
///
/// # Safety
/// `first` and `second` must be valid null-terminated UTF-8 C strings.
/// The caller must free the returned strings with `semdoc_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn semdoc_are_semantically_equal(
    first: *const c_char,
    second: *const c_char,
) -> SemdocResult {
    let first = c_arg!(first, "first document");
    let second = c_arg!(second, "second document");
    SemdocResult::from_result(
        semdoc_core::are_semantically_equal(first, second).map(|equal| equal.to_string()),
    )
}

/// Differences as a JSON array of `{path, kind, first, second}`.
///
/// # Safety
/// `first` and `second` must be valid null-terminated UTF-8 C strings.
/// The caller must free the returned strings with `semdoc_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn semdoc_differences(
    first: *const c_char,
    second: *const c_char,
) -> SemdocResult {
    let first = c_arg!(first, "first document");
    let second = c_arg!(second, "second document");

    match semdoc_core::Comparator::default().differences(first, second) {
        Ok(diffs) => match serde_json::to_string_pretty(&diffs) {
            Ok(json) => SemdocResult::ok(json),
            Err(e) => SemdocResult::err(format!("Serialization error: {}", e)),
        },
        Err(e) => SemdocResult::err(e.to_string()),
    }
}

/// SHA-256 hex digest of the canonical form.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `semdoc_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn semdoc_semantic_hash(text: *const c_char) -> SemdocResult {
    let text = c_arg!(text, "input");
    SemdocResult::from_result(semdoc_core::semantic_hash(text))
}

/// Free a string previously returned by a semdoc FFI function.
///
/// # Safety
/// `ptr` must be a pointer previously returned by a semdoc FFI function,
/// or null (in which case this is a no-op).
#[no_mangle]
pub unsafe extern "C" fn semdoc_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn take(ptr: *mut c_char) -> Option<String> {
        if ptr.is_null() {
            return None;
        }
        let s = CStr::from_ptr(ptr).to_str().unwrap().to_string();
        semdoc_free_string(ptr);
        Some(s)
    }

    #[test]
    fn test_equal_returns_bool_string() {
        let a = CString::new("{\"a\": 1, \"b\": \"5m0s\"}").unwrap();
        let b = CString::new("b: 5m\na: 1\n").unwrap();
        unsafe {
            let r = semdoc_are_semantically_equal(a.as_ptr(), b.as_ptr());
            assert!(r.error.is_null());
            assert_eq!(take(r.result).as_deref(), Some("true"));
        }
    }

    #[test]
    fn test_parse_error_sets_error() {
        let bad = CString::new("{\"a\": [").unwrap();
        unsafe {
            let r = semdoc_canonicalize(bad.as_ptr());
            assert!(r.result.is_null());
            let msg = take(r.error).unwrap();
            assert!(msg.contains("Parse error"), "msg: {}", msg);
        }
    }

    #[test]
    fn test_null_input_is_rejected() {
        unsafe {
            let r = semdoc_semantic_hash(std::ptr::null());
            assert!(r.result.is_null());
            assert_eq!(take(r.error).as_deref(), Some("null or invalid UTF-8 input"));
        }
    }

    #[test]
    fn test_free_null_is_noop() {
        unsafe { semdoc_free_string(std::ptr::null_mut()) };
    }
}

use crate::error::{with_last_error_mut, DefaultThermoError, ThermoError, ThermoErrorCode};
use std::ffi::{c_char, CStr, CString};

/// Set the thread-local error message and code.
pub(crate) fn set_last_error(error: &impl ThermoError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Record `error` in thread-local storage and return its code.
#[inline]
pub(crate) fn track_error(error: &impl ThermoError) -> ThermoErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = ThermoErrorCode::Ok;
    });
}

/// Borrow a C string as `&str`; `Ok(None)` for a null pointer.
///
/// # Safety
/// `ptr` must be null or point to a valid null-terminated string that
/// outlives the returned reference.
pub(crate) unsafe fn optional_str<'a>(
    ptr: *const c_char,
    param_name: &str,
) -> Result<Option<&'a str>, DefaultThermoError> {
    if ptr.is_null() {
        return Ok(None);
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(Some)
        .map_err(|_| DefaultThermoError::invalid_string(param_name))
}

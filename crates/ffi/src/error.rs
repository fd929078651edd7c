use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use thermothin_core::SimulationError;

/// Common interface for errors crossing the FFI boundary.
///
/// - `code()` - the error code returned to the caller
/// - `msg()` - the diagnostic message stored for `thermothin_last_error`
pub(crate) trait ThermoError {
    fn code(&self) -> ThermoErrorCode;

    fn msg(&self) -> &str;
}

/// Error raised by the FFI layer itself or converted from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultThermoError {
    code: ThermoErrorCode,
    msg: String,
}

impl DefaultThermoError {
    /// Null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"spec"`, `"out_len"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: ThermoErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// C string parameter that is not valid UTF-8.
    pub fn invalid_string(param_name: &str) -> Self {
        Self {
            code: ThermoErrorCode::InvalidString,
            msg: format!("Parameter '{param_name}' is not a valid UTF-8 string"),
        }
    }

    /// Output buffer cannot hold every sample.
    pub fn buffer_too_small(required: usize, capacity: usize) -> Self {
        Self {
            code: ThermoErrorCode::BufferTooSmall,
            msg: format!("Sample buffer holds {capacity} samples, {required} required"),
        }
    }
}

impl From<&SimulationError> for DefaultThermoError {
    fn from(error: &SimulationError) -> Self {
        let code = match error {
            SimulationError::InvalidInput { .. } => ThermoErrorCode::InvalidInput,
            SimulationError::UnknownMaterial(_) => ThermoErrorCode::UnknownMaterial,
            SimulationError::InvalidGeometry(_) => ThermoErrorCode::InvalidGeometry,
            SimulationError::NotThermallyThin { .. } => ThermoErrorCode::NotThermallyThin,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl ThermoError for DefaultThermoError {
    fn code(&self) -> ThermoErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by the cooling functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermoErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Null pointer passed where non-null required.
    NullPointer = 1,

    /// A value violates a physical or structural precondition.
    InvalidInput = 2,

    /// Material key is not in the built-in catalog.
    UnknownMaterial = 3,

    /// Shape/orientation code not recognised or combination unsupported.
    InvalidGeometry = 4,

    /// Biot number at the initial state is at least 0.1.
    NotThermallyThin = 5,

    /// Output buffer is shorter than the number of samples.
    /// `out_len` receives the required length.
    BufferTooSmall = 6,

    /// A string parameter is not valid UTF-8.
    InvalidString = 7,
}

impl From<DefaultThermoError> for ThermoErrorCode {
    fn from(error: DefaultThermoError) -> Self {
        error.code
    }
}

thread_local! {
    /// Most recent FFI error on this thread (C string, error code).
    /// The CString is owned here so the pointer handed out stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, ThermoErrorCode)> =
        const { RefCell::new((None, ThermoErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, ThermoErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, ThermoErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// size_t len = 0;
/// ThermoErrorCode err = thermothin_simulate(&spec, 10, samples, 11, &len);
/// if (err != Ok) {
///     const char* msg = thermothin_last_error();
///     if (msg) {
///         fprintf(stderr, "cooling run failed: %s\n", msg);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn thermothin_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` if the last call succeeded).
///
/// Error state is per thread.
#[no_mangle]
pub extern "C" fn thermothin_last_error_code() -> ThermoErrorCode {
    with_last_error(|(_cstring, code)| *code)
}

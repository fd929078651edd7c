//! C ABI for the thermally-thin cooling engine
//!
//! One call runs a body and fills a caller-owned sample buffer:
//!
//! ```c
//! ThermoBodySpec spec = {0};
//! spec.shape = THERMO_SHAPE_SPHERE;
//! spec.radius = 0.01;
//! spec.initial_temperature = 100.0;
//! spec.ambient_temperature = 20.0;
//! spec.emissivity = 0.8;
//! spec.cooling_time = 60.0;
//! spec.material = "aluminium";
//!
//! ThermoSample samples[11];
//! size_t len = 0;
//! if (thermothin_simulate(&spec, 10, samples, 11, &len) != Ok) {
//!     fprintf(stderr, "%s\n", thermothin_last_error());
//! }
//! ```
//!
//! Materials are looked up in the built-in catalog. A null `material`, or
//! the key `"custom"`, selects the `custom_*` constants instead.

mod error;
mod helpers;

pub use error::{thermothin_last_error, thermothin_last_error_code, ThermoErrorCode};

use std::os::raw::c_char;
use std::sync::LazyLock;
use thermothin_core::{
    simulate, BodySpec, MaterialCatalog, MaterialSelector, Orientation, Shape, SimulationConfig,
    SimulationError, SimulationSample,
};

use crate::error::DefaultThermoError;
use crate::helpers::{clear_last_error, optional_str, track_error};

static CATALOG: LazyLock<MaterialCatalog> = LazyLock::new(MaterialCatalog::builtin);

/// `ThermoBodySpec::shape` value for a sphere
pub const THERMO_SHAPE_SPHERE: u8 = 0;
/// `ThermoBodySpec::shape` value for a cylinder
pub const THERMO_SHAPE_CYLINDER: u8 = 1;
/// `ThermoBodySpec::shape` value for a rectangular plate
pub const THERMO_SHAPE_PLATE: u8 = 2;

/// `ThermoBodySpec::orientation` value when none is given (spheres)
pub const THERMO_ORIENTATION_NONE: u8 = 0;
/// `ThermoBodySpec::orientation` value for a vertical body
pub const THERMO_ORIENTATION_VERTICAL: u8 = 1;
/// `ThermoBodySpec::orientation` value for a horizontal body
pub const THERMO_ORIENTATION_HORIZONTAL: u8 = 2;

/// C mirror of the body specification
///
/// Dimensions in metres, temperatures in °C, time in seconds.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ThermoBodySpec {
    /// One of the `THERMO_SHAPE_*` constants
    pub shape: u8,
    /// One of the `THERMO_ORIENTATION_*` constants
    pub orientation: u8,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub initial_temperature: f64,
    pub ambient_temperature: f64,
    pub emissivity: f64,
    pub cooling_time: f64,
    /// Catalog key, or null / `"custom"` for the constants below
    pub material: *const c_char,
    /// kg/m³, used only for custom materials
    pub custom_density: f64,
    /// J/(kg·K), used only for custom materials
    pub custom_heat_capacity: f64,
    /// W/(m·K), used only for custom materials
    pub custom_conductivity: f64,
}

/// C mirror of one cooling curve sample
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThermoSample {
    pub time: f64,
    pub temperature: f64,
    pub biot_number: f64,
    pub kinematic_viscosity: f64,
    pub prandtl_number: f64,
    pub air_conductivity: f64,
    pub heat_capacity: f64,
    pub conductivity: f64,
}

impl From<&SimulationSample> for ThermoSample {
    fn from(sample: &SimulationSample) -> Self {
        Self {
            time: sample.time,
            temperature: *sample.temperature,
            biot_number: sample.biot_number,
            kinematic_viscosity: sample.kinematic_viscosity,
            prandtl_number: sample.prandtl_number,
            air_conductivity: sample.air_conductivity,
            heat_capacity: sample.heat_capacity,
            conductivity: sample.conductivity,
        }
    }
}

fn shape_from_code(code: u8) -> Result<Shape, SimulationError> {
    match code {
        THERMO_SHAPE_SPHERE => Ok(Shape::Sphere),
        THERMO_SHAPE_CYLINDER => Ok(Shape::Cylinder),
        THERMO_SHAPE_PLATE => Ok(Shape::Plate),
        other => Err(SimulationError::InvalidGeometry(format!(
            "unknown shape code {other}"
        ))),
    }
}

fn orientation_from_code(code: u8) -> Result<Option<Orientation>, SimulationError> {
    match code {
        THERMO_ORIENTATION_NONE => Ok(None),
        THERMO_ORIENTATION_VERTICAL => Ok(Some(Orientation::Vertical)),
        THERMO_ORIENTATION_HORIZONTAL => Ok(Some(Orientation::Horizontal)),
        other => Err(SimulationError::InvalidGeometry(format!(
            "unknown orientation code {other}"
        ))),
    }
}

/// Convert the C record into a core `BodySpec`
///
/// # Safety
/// `spec.material` must be null or a valid null-terminated string.
unsafe fn body_spec_from_c(spec: &ThermoBodySpec) -> Result<BodySpec, DefaultThermoError> {
    let shape = shape_from_code(spec.shape).map_err(|e| DefaultThermoError::from(&e))?;
    let orientation =
        orientation_from_code(spec.orientation).map_err(|e| DefaultThermoError::from(&e))?;

    let material = match optional_str(spec.material, "material")? {
        Some(key) if !key.trim().eq_ignore_ascii_case("custom") => {
            MaterialSelector::Named(key.to_string())
        }
        _ => MaterialSelector::Custom {
            density: spec.custom_density,
            heat_capacity: spec.custom_heat_capacity,
            conductivity: spec.custom_conductivity,
        },
    };

    Ok(BodySpec {
        shape,
        orientation,
        length: spec.length,
        width: spec.width,
        height: spec.height,
        radius: spec.radius,
        initial_temperature: spec.initial_temperature,
        ambient_temperature: spec.ambient_temperature,
        emissivity: spec.emissivity,
        cooling_time: spec.cooling_time,
        material,
    })
}

/// Number of samples a run with `steps` steps produces (`steps + 1`).
///
/// Returns 0 when `steps` is zero or above the supported maximum, since such
/// a run is rejected.
#[no_mangle]
pub extern "C" fn thermothin_max_samples(steps: usize) -> usize {
    if steps == 0 || steps > SimulationConfig::MAX_STEPS {
        0
    } else {
        steps + 1
    }
}

/// Run one cooling simulation with temperature-dependent property refresh.
///
/// # Parameters
/// - `spec`: body to cool
/// - `steps`: number of time steps; `steps + 1` samples are produced
/// - `out_samples`: caller-owned buffer of at least `capacity` samples
/// - `capacity`: length of `out_samples`
/// - `out_len`: receives the number of samples written, or the required
///   length when the result is `BufferTooSmall`
///
/// # Returns
/// - `Ok` on success
/// - `NullPointer` if `spec`, `out_samples` or `out_len` is null
/// - `InvalidString` if `spec.material` is not UTF-8
/// - `InvalidInput`, `UnknownMaterial`, `InvalidGeometry`,
///   `NotThermallyThin` for rejected bodies
/// - `BufferTooSmall` if `capacity < steps + 1`
///
/// Nothing is written to `out_samples` unless the call succeeds.
///
/// # Safety
/// - `spec` must point to a valid `ThermoBodySpec`, and its `material`
///   must be null or a valid null-terminated string
/// - `out_samples` must be valid for writes of `capacity` samples
/// - `out_len` must be valid for a write
#[no_mangle]
pub unsafe extern "C" fn thermothin_simulate(
    spec: *const ThermoBodySpec,
    steps: usize,
    out_samples: *mut ThermoSample,
    capacity: usize,
    out_len: *mut usize,
) -> ThermoErrorCode {
    if spec.is_null() {
        return track_error(&DefaultThermoError::null_pointer("spec"));
    }
    if out_samples.is_null() {
        return track_error(&DefaultThermoError::null_pointer("out_samples"));
    }
    if out_len.is_null() {
        return track_error(&DefaultThermoError::null_pointer("out_len"));
    }
    *out_len = 0;

    let body = match body_spec_from_c(&*spec) {
        Ok(body) => body,
        Err(e) => return track_error(&e),
    };

    let config = SimulationConfig {
        steps,
        refresh_material_properties: true,
    };
    let curve = match simulate(&body, &CATALOG, &config) {
        Ok(curve) => curve,
        Err(e) => return track_error(&DefaultThermoError::from(&e)),
    };

    if curve.len() > capacity {
        *out_len = curve.len();
        return track_error(&DefaultThermoError::buffer_too_small(curve.len(), capacity));
    }

    let out = std::slice::from_raw_parts_mut(out_samples, capacity);
    for (slot, sample) in out.iter_mut().zip(&curve.samples) {
        *slot = ThermoSample::from(sample);
    }
    *out_len = curve.len();

    clear_last_error();
    ThermoErrorCode::Ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{CStr, CString};
    use std::ptr;

    fn sphere_spec(material: &CString) -> ThermoBodySpec {
        ThermoBodySpec {
            shape: THERMO_SHAPE_SPHERE,
            orientation: THERMO_ORIENTATION_NONE,
            length: 0.0,
            width: 0.0,
            height: 0.0,
            radius: 0.01,
            initial_temperature: 100.0,
            ambient_temperature: 20.0,
            emissivity: 0.8,
            cooling_time: 60.0,
            material: material.as_ptr(),
            custom_density: 0.0,
            custom_heat_capacity: 0.0,
            custom_conductivity: 0.0,
        }
    }

    fn last_error_message() -> String {
        let ptr = thermothin_last_error();
        assert!(!ptr.is_null());
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }

    #[test]
    fn test_simulate_fills_buffer() {
        let key = CString::new("aluminium").unwrap();
        let spec = sphere_spec(&key);
        let mut samples = [ThermoSample::default(); 11];
        let mut len: usize = 0;

        let code = unsafe {
            thermothin_simulate(&spec, 10, samples.as_mut_ptr(), samples.len(), &mut len)
        };

        assert_eq!(code, ThermoErrorCode::Ok);
        assert_eq!(len, 11);
        assert_eq!(samples[0].temperature, 100.0);
        assert_eq!(samples[10].time, 60.0);
        assert!(samples[10].temperature > 20.0 && samples[10].temperature < 100.0);
        assert!(thermothin_last_error().is_null());
        assert_eq!(thermothin_last_error_code(), ThermoErrorCode::Ok);
    }

    #[test]
    fn test_buffer_too_small_reports_required_length() {
        let key = CString::new("aluminium").unwrap();
        let spec = sphere_spec(&key);
        let mut samples = [ThermoSample::default(); 4];
        let mut len: usize = 0;

        let code = unsafe {
            thermothin_simulate(&spec, 10, samples.as_mut_ptr(), samples.len(), &mut len)
        };

        assert_eq!(code, ThermoErrorCode::BufferTooSmall);
        assert_eq!(len, thermothin_max_samples(10));
        assert_eq!(samples[0], ThermoSample::default());
    }

    #[test]
    fn test_null_spec() {
        let mut samples = [ThermoSample::default(); 1];
        let mut len: usize = 0;
        let code =
            unsafe { thermothin_simulate(ptr::null(), 10, samples.as_mut_ptr(), 1, &mut len) };
        assert_eq!(code, ThermoErrorCode::NullPointer);
        assert_eq!(last_error_message(), "Parameter 'spec' cannot be null");
    }

    #[test]
    fn test_engine_errors_map_to_codes() {
        let mut samples = [ThermoSample::default(); 11];
        let mut len: usize = 0;

        let unknown = CString::new("unobtainium").unwrap();
        let spec = sphere_spec(&unknown);
        let code = unsafe { thermothin_simulate(&spec, 10, samples.as_mut_ptr(), 11, &mut len) };
        assert_eq!(code, ThermoErrorCode::UnknownMaterial);
        assert_eq!(thermothin_last_error_code(), ThermoErrorCode::UnknownMaterial);
        assert_eq!(last_error_message(), "Unknown material: unobtainium");

        let glass = CString::new("glass").unwrap();
        let mut spec = sphere_spec(&glass);
        spec.radius = 0.05;
        let code = unsafe { thermothin_simulate(&spec, 10, samples.as_mut_ptr(), 11, &mut len) };
        assert_eq!(code, ThermoErrorCode::NotThermallyThin);
        assert_eq!(len, 0);

        let mut spec = sphere_spec(&glass);
        spec.shape = 9;
        let code = unsafe { thermothin_simulate(&spec, 10, samples.as_mut_ptr(), 11, &mut len) };
        assert_eq!(code, ThermoErrorCode::InvalidGeometry);
    }

    #[test]
    fn test_null_material_uses_custom_constants() {
        let key = CString::new("unused").unwrap();
        let mut spec = sphere_spec(&key);
        spec.material = ptr::null();
        spec.custom_density = 2700.0;
        spec.custom_heat_capacity = 900.0;
        spec.custom_conductivity = 237.0;

        let mut samples = [ThermoSample::default(); 3];
        let mut len: usize = 0;
        let code = unsafe { thermothin_simulate(&spec, 2, samples.as_mut_ptr(), 3, &mut len) };
        assert_eq!(code, ThermoErrorCode::Ok);
        assert!(samples.iter().all(|s| s.heat_capacity == 900.0));
    }

    #[test]
    fn test_max_samples() {
        assert_eq!(thermothin_max_samples(10), 11);
        assert_eq!(thermothin_max_samples(0), 0);
        assert_eq!(thermothin_max_samples(SimulationConfig::MAX_STEPS + 1), 0);
    }
}

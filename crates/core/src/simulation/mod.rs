//! Lumped-capacitance cooling integrator
//!
//! A run moves through four phases:
//!
//! ```text
//! Validating ─► Initializing ─► Stepping ─► Done
//!     │              │
//!     ▼              ▼
//! RejectedInput  NotThermallyThin
//! ```
//!
//! Both failure exits happen inside [`CoolingSimulation::new`], so once a
//! simulation exists its step sequence always completes. The temperature at
//! each step is the closed-form solution
//!
//! ```text
//! T(t) = T∞ + (T₀ − T∞)·exp(−A·α_sum·t/(m·c))
//! ```
//!
//! With temperature-dependent materials, conductivity and heat capacity are
//! refreshed from the temperature just computed before the next step. This
//! is an explicit update: the exponential is always taken from t = 0 with
//! the latest heat capacity, not integrated piecewise.

mod curve;
pub mod variant;

pub use curve::{CoolingCurve, InitialState, SimulationSample};
pub use variant::{process_request, Action, RequestError, Variant, VariantStore};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;
use tracing::{debug, info, warn};

use crate::core_types::material::{Material, MaterialCatalog, MaterialProperties};
use crate::core_types::units::Celsius;
use crate::core_types::BodySpec;
use crate::error::SimulationError;
use crate::physics::{
    biot_number, check_thermally_thin, AirProperties, Geometry, HeatTransferCoefficients,
    BIOT_LIMIT,
};

/// Biot numbers above this fraction of the limit are logged as marginal
const MARGINAL_BIOT_FRACTION: f64 = 0.8;

/// Integrator settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of equal time steps; the curve has `steps + 1` samples.
    pub steps: usize,

    /// Re-evaluate temperature-dependent material properties after each
    /// step. Has no effect on constant (custom) materials.
    pub refresh_material_properties: bool,
}

impl SimulationConfig {
    /// Default step count (11 samples)
    pub const DEFAULT_STEPS: usize = 10;

    /// Largest accepted step count
    pub const MAX_STEPS: usize = 1_000_000;

    /// Create a configuration with `steps` clamped to `1..=MAX_STEPS`
    #[must_use]
    pub fn new(steps: usize, refresh_material_properties: bool) -> Self {
        Self {
            steps: steps.clamp(1, Self::MAX_STEPS),
            refresh_material_properties,
        }
    }

    /// Same step count, properties frozen at T₀
    #[must_use]
    pub fn frozen(mut self) -> Self {
        self.refresh_material_properties = false;
        self
    }
}

impl Default for SimulationConfig {
    /// Ten steps with property refresh, matching the reference curves
    fn default() -> Self {
        Self {
            steps: Self::DEFAULT_STEPS,
            refresh_material_properties: true,
        }
    }
}

/// Phase of a cooling run, used in log events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Validating,
    Initializing,
    Stepping,
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunPhase::Validating => "validating",
            RunPhase::Initializing => "initializing",
            RunPhase::Stepping => "stepping",
            RunPhase::Done => "done",
        })
    }
}

/// Validated run inputs
#[derive(Debug, Clone)]
struct ValidatedBody {
    geometry: Geometry,
    material: Material,
    emissivity: f64,
    initial_temperature: Celsius,
    ambient_temperature: Celsius,
    cooling_time: f64,
}

impl ValidatedBody {
    fn from_spec(
        spec: &BodySpec,
        catalog: &MaterialCatalog,
        config: &SimulationConfig,
    ) -> Result<Self, SimulationError> {
        if config.steps == 0 || config.steps > SimulationConfig::MAX_STEPS {
            return Err(SimulationError::invalid(
                "steps",
                format!("must be within 1..={}, got {}", SimulationConfig::MAX_STEPS, config.steps),
            ));
        }
        if !(spec.cooling_time.is_finite() && spec.cooling_time > 0.0) {
            return Err(SimulationError::invalid(
                "cooling_time",
                format!("must be finite and positive, got {}", spec.cooling_time),
            ));
        }
        if !(0.0..=1.0).contains(&spec.emissivity) {
            return Err(SimulationError::invalid(
                "emissivity",
                format!("must be within [0, 1], got {}", spec.emissivity),
            ));
        }

        let initial_temperature = temperature("initial_temperature", spec.initial_temperature)?;
        let ambient_temperature = temperature("ambient_temperature", spec.ambient_temperature)?;
        if initial_temperature == ambient_temperature {
            return Err(SimulationError::invalid(
                "initial_temperature",
                "equals the ambient temperature; there is nothing to cool",
            ));
        }

        let geometry = Geometry::from_spec(spec)?;
        let material = catalog.resolve(&spec.material)?;

        Ok(Self {
            geometry,
            material,
            emissivity: spec.emissivity,
            initial_temperature,
            ambient_temperature,
            cooling_time: spec.cooling_time,
        })
    }
}

fn temperature(field: &'static str, value: f64) -> Result<Celsius, SimulationError> {
    Celsius::try_new(value).ok_or_else(|| {
        SimulationError::invalid(
            field,
            format!("must be finite and above absolute zero, got {value}"),
        )
    })
}

/// Quantities computed from valid inputs can still overflow or underflow
fn derived(field: &'static str, value: f64) -> Result<f64, SimulationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimulationError::invalid(
            field,
            format!("derived value must be finite and positive, got {value}"),
        ))
    }
}

/// A validated, admissible cooling run ready to step
///
/// Construction performs validation and the Biot gate; the value holds no
/// mutable state, so [`run`](Self::run) can be called any number of times
/// and always yields the same curve.
#[derive(Debug, Clone)]
pub struct CoolingSimulation {
    body: ValidatedBody,
    config: SimulationConfig,
    initial: InitialState,
}

impl CoolingSimulation {
    /// Validate `spec`, resolve its material and check the lumped-model
    /// admissibility at the initial state.
    ///
    /// # Errors
    /// - `InvalidInput` for out-of-range or missing values
    /// - `InvalidGeometry` for a cylinder or plate without orientation
    /// - `UnknownMaterial` if the material key is not in `catalog`
    /// - `NotThermallyThin` if the initial Biot number is at least 0.1
    pub fn new(
        spec: &BodySpec,
        catalog: &MaterialCatalog,
        config: &SimulationConfig,
    ) -> Result<Self, SimulationError> {
        debug!(phase = %RunPhase::Validating, shape = %spec.shape, material = spec.material.key());
        let body = ValidatedBody::from_spec(spec, catalog, config).inspect_err(|e| {
            debug!(phase = %RunPhase::Validating, error = %e, "Rejected input");
        })?;

        debug!(phase = %RunPhase::Initializing);
        let initial = Self::initialize(&body)?;

        Ok(Self {
            body,
            config: config.clone(),
            initial,
        })
    }

    fn initialize(body: &ValidatedBody) -> Result<InitialState, SimulationError> {
        let properties = body.material.properties_at(body.initial_temperature);
        let surface_area = derived("surface_area", body.geometry.surface_area())?;
        let volume = derived("volume", body.geometry.volume())?;
        let mass = derived("mass", volume * properties.density)?;
        let characteristic_length = body.geometry.characteristic_length();

        let air = AirProperties::at(body.ambient_temperature);
        let coefficients = HeatTransferCoefficients::evaluate(
            &body.geometry,
            body.emissivity,
            body.initial_temperature,
            &air,
        );
        derived("total_coefficient", coefficients.total)?;
        let biot = biot_number(coefficients.total, characteristic_length, properties.conductivity);

        check_thermally_thin(biot).inspect_err(|_| {
            info!(biot, material = %body.material.name, "Body is not thermally thin, refusing run");
        })?;
        if biot > BIOT_LIMIT * MARGINAL_BIOT_FRACTION {
            warn!(biot, "Biot number is close to the lumped-capacitance limit");
        }

        let time_constant = derived(
            "time_constant",
            mass * properties.heat_capacity / (surface_area * coefficients.total),
        )?;

        Ok(InitialState {
            geometry: body.geometry,
            material_name: body.material.name.clone(),
            surface_area,
            volume,
            mass,
            characteristic_length,
            properties,
            air,
            coefficients,
            biot_number: biot,
            time_constant,
        })
    }

    /// Summary of the initial state that passed the gate
    pub fn initial_state(&self) -> &InitialState {
        &self.initial
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Whether properties are refreshed between steps in this run
    pub fn refreshes_properties(&self) -> bool {
        self.config.refresh_material_properties && self.body.material.is_temperature_dependent()
    }

    /// Lazily produce the `steps + 1` samples
    pub fn steps(&self) -> CoolingSteps<'_> {
        CoolingSteps {
            simulation: self,
            index: 0,
            properties: self.initial.properties,
        }
    }

    /// Produce the full cooling curve
    pub fn run(&self) -> CoolingCurve {
        debug!(phase = %RunPhase::Stepping, steps = self.config.steps);
        let samples: Vec<SimulationSample> = self.steps().collect();

        if let Some(last) = samples.last() {
            info!(
                phase = %RunPhase::Done,
                material = %self.initial.material_name,
                samples = samples.len(),
                final_temperature = *last.temperature,
                "Cooling curve complete"
            );
        }

        CoolingCurve {
            initial: self.initial.clone(),
            samples,
        }
    }
}

/// Iterator over the samples of one run
///
/// Carries the material properties forward from step to step; everything
/// else is read from the owning simulation.
#[derive(Debug, Clone)]
pub struct CoolingSteps<'a> {
    simulation: &'a CoolingSimulation,
    index: usize,
    properties: MaterialProperties,
}

impl CoolingSteps<'_> {
    fn time_at(&self, index: usize) -> f64 {
        let steps = self.simulation.config.steps;
        let tau = self.simulation.body.cooling_time;
        if index == steps {
            tau
        } else {
            index as f64 * (tau / steps as f64)
        }
    }
}

impl Iterator for CoolingSteps<'_> {
    type Item = SimulationSample;

    fn next(&mut self) -> Option<SimulationSample> {
        let sim = self.simulation;
        if self.index > sim.config.steps {
            return None;
        }

        let body = &sim.body;
        let initial = &sim.initial;
        let time = self.time_at(self.index);

        let temperature = if self.index == 0 {
            body.initial_temperature
        } else {
            let exponent = -initial.surface_area * initial.coefficients.total * time
                / (initial.mass * self.properties.heat_capacity);
            body.ambient_temperature
                + (body.initial_temperature - body.ambient_temperature).scale(exponent.exp())
        };

        let sample = SimulationSample {
            time,
            temperature,
            biot_number: biot_number(
                initial.coefficients.total,
                initial.characteristic_length,
                self.properties.conductivity,
            ),
            kinematic_viscosity: initial.air.kinematic_viscosity,
            prandtl_number: initial.air.prandtl_number,
            air_conductivity: initial.air.thermal_conductivity,
            heat_capacity: self.properties.heat_capacity,
            conductivity: self.properties.conductivity,
        };

        if sim.refreshes_properties() {
            self.properties = body.material.properties_at(temperature);
        }
        self.index += 1;

        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.simulation.config.steps + 1).saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CoolingSteps<'_> {}

impl FusedIterator for CoolingSteps<'_> {}

/// Validate, gate and integrate one body
///
/// # Errors
/// See [`CoolingSimulation::new`]; no partial curve is ever returned.
pub fn simulate(
    spec: &BodySpec,
    catalog: &MaterialCatalog,
    config: &SimulationConfig,
) -> Result<CoolingCurve, SimulationError> {
    CoolingSimulation::new(spec, catalog, config).map(|sim| sim.run())
}

/// Run independent bodies in parallel
///
/// Results come back in input order, one per spec.
pub fn simulate_batch(
    specs: &[BodySpec],
    catalog: &MaterialCatalog,
    config: &SimulationConfig,
) -> Vec<Result<CoolingCurve, SimulationError>> {
    info!(count = specs.len(), "Running cooling batch");
    specs
        .par_iter()
        .map(|spec| simulate(spec, catalog, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Orientation;
    use approx::assert_relative_eq;

    fn aluminium_sphere() -> BodySpec {
        BodySpec::sphere(0.01)
            .with_temperatures(100.0, 20.0)
            .with_emissivity(0.8)
            .with_cooling_time(60.0)
            .with_material("aluminium")
    }

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.steps, 10);
        assert!(config.refresh_material_properties);
        assert_eq!(SimulationConfig::new(0, true).steps, 1);
    }

    #[test]
    fn test_sample_count_and_time_grid() {
        let curve = simulate(
            &aluminium_sphere(),
            &MaterialCatalog::builtin(),
            &SimulationConfig::default(),
        )
        .unwrap();
        assert_eq!(curve.len(), 11);
        let times: Vec<f64> = curve.times().collect();
        assert_eq!(times[0], 0.0);
        assert_eq!(times[10], 60.0);
        for (i, t) in times.iter().enumerate() {
            assert_relative_eq!(*t, i as f64 * 6.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_steps_iterator_is_exact_size() {
        let catalog = MaterialCatalog::builtin();
        let config = SimulationConfig::new(4, true);
        let sim = CoolingSimulation::new(&aluminium_sphere(), &catalog, &config).unwrap();
        let mut steps = sim.steps();
        assert_eq!(steps.len(), 5);
        steps.next();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps.by_ref().count(), 4);
        assert!(steps.next().is_none());
    }

    #[test]
    fn test_constant_material_matches_closed_form() {
        let spec = BodySpec::plate(0.5, 0.3, 0.002, Orientation::Vertical)
            .with_temperatures(80.0, 25.0)
            .with_emissivity(0.9)
            .with_cooling_time(120.0)
            .with_custom_material(2700.0, 900.0, 237.0);
        let curve =
            simulate(&spec, &MaterialCatalog::empty(), &SimulationConfig::default()).unwrap();

        let init = &curve.initial;
        for sample in &curve.samples {
            let exponent = -init.surface_area * init.coefficients.total * sample.time
                / (init.mass * 900.0);
            let expected = 25.0 + 55.0 * exponent.exp();
            assert_relative_eq!(*sample.temperature, expected, max_relative = 1e-12);
            assert_eq!(sample.heat_capacity, 900.0);
        }
    }

    #[test]
    fn test_explicit_property_refresh_sequencing() {
        let catalog = MaterialCatalog::builtin();
        let config = SimulationConfig::default();
        let sim = CoolingSimulation::new(&aluminium_sphere(), &catalog, &config).unwrap();
        assert!(sim.refreshes_properties());
        let samples: Vec<SimulationSample> = sim.steps().collect();
        let aluminium = catalog.get("aluminium").unwrap();

        // Sample i uses properties evaluated at the temperature of sample i-1
        for pair in samples.windows(2) {
            let expected = aluminium.properties_at(pair[0].temperature);
            assert_eq!(pair[1].heat_capacity, expected.heat_capacity);
            assert_eq!(pair[1].conductivity, expected.conductivity);
        }
        assert_eq!(samples[0].heat_capacity, sim.initial_state().properties.heat_capacity);
    }

    #[test]
    fn test_frozen_properties_do_not_change() {
        let catalog = MaterialCatalog::builtin();
        let sim = CoolingSimulation::new(
            &aluminium_sphere(),
            &catalog,
            &SimulationConfig::default().frozen(),
        )
        .unwrap();
        assert!(!sim.refreshes_properties());
        let first = sim.steps().next().unwrap();
        assert!(sim.steps().all(|s| s.heat_capacity == first.heat_capacity));
    }

    #[test]
    fn test_equal_temperatures_rejected() {
        let spec = aluminium_sphere().with_temperatures(20.0, 20.0);
        match simulate(&spec, &MaterialCatalog::builtin(), &SimulationConfig::default()) {
            Err(SimulationError::InvalidInput { field, .. }) => {
                assert_eq!(field, "initial_temperature");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_steps_rejected() {
        let config = SimulationConfig {
            steps: 0,
            refresh_material_properties: true,
        };
        match simulate(&aluminium_sphere(), &MaterialCatalog::builtin(), &config) {
            Err(SimulationError::InvalidInput { field, .. }) => assert_eq!(field, "steps"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_overflowing_geometry_rejected() {
        let catalog = MaterialCatalog::builtin();
        let config = SimulationConfig::default();
        let huge = BodySpec::sphere(1e200).with_emissivity(0.0).with_material("copper");
        let tiny = BodySpec::sphere(1e-200).with_material("copper");

        for spec in [huge, tiny] {
            match CoolingSimulation::new(&spec, &catalog, &config) {
                Err(SimulationError::InvalidInput { field, .. }) => {
                    assert_eq!(field, "surface_area");
                }
                other => panic!("expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_engine_types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CoolingSimulation>();
        assert_send_sync::<CoolingCurve>();
        assert_send_sync::<MaterialCatalog>();
        assert_send_sync::<SimulationError>();
    }

    #[test]
    fn test_time_constant() {
        let sim = CoolingSimulation::new(
            &aluminium_sphere(),
            &MaterialCatalog::builtin(),
            &SimulationConfig::default(),
        )
        .unwrap();
        let init = sim.initial_state();
        assert_relative_eq!(
            init.time_constant,
            init.mass * init.properties.heat_capacity
                / (init.surface_area * init.coefficients.total),
            max_relative = 1e-12
        );
        // ρcV/(hA) = 2700·916·(r/3)/18 ≈ 460 s for a 1 cm sphere
        assert!(init.time_constant > 200.0 && init.time_constant < 1000.0);
    }
}

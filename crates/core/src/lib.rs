//! Thermally-thin body cooling engine
//!
//! Computes the temperature history of a small solid body (sphere, cylinder
//! or plate) cooling in still air by combined natural convection and
//! radiation, using the lumped-capacitance model. Each run is gated on the
//! Biot number so the model is only applied where it holds.
//!
//! ```text
//! BodySpec ──► CoolingSimulation::new ──► run() ──► CoolingCurve
//!                 │  validate             │
//!                 │  resolve material     └─ SimulationSample × (steps + 1)
//!                 └─ Biot gate
//! ```
//!
//! ## Modules
//!
//! - [`core_types`]: units, body specification, materials and the catalog
//! - [`physics`]: geometry, air properties, heat transfer coefficients
//! - [`simulation`]: the integrator, batch runner and request boundary
//! - [`error`]: [`SimulationError`]

pub mod core_types;
pub mod error;
pub mod physics;
pub mod simulation;

pub use core_types::{
    BodySpec, Celsius, CelsiusDelta, Kelvin, Material, MaterialCatalog, MaterialProperties,
    MaterialSelector, Orientation, Shape, ThermalModel,
};
pub use error::SimulationError;
pub use physics::{AirProperties, Correlation, Geometry, HeatTransferCoefficients};
pub use simulation::{
    process_request, simulate, simulate_batch, Action, CoolingCurve, CoolingSimulation,
    CoolingSteps, InitialState, RequestError, SimulationConfig, SimulationSample, Variant,
    VariantStore,
};

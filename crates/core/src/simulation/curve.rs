//! Output records of a cooling run

use serde::{Deserialize, Serialize};

use crate::core_types::material::MaterialProperties;
use crate::core_types::units::Celsius;
use crate::physics::{AirProperties, Geometry, HeatTransferCoefficients};

/// One point of the cooling curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSample {
    /// Elapsed time (s)
    pub time: f64,
    /// Body temperature T(t)
    pub temperature: Celsius,
    /// Biot number with the conductivity in effect at this sample
    pub biot_number: f64,
    /// Ambient air kinematic viscosity (m²/s)
    pub kinematic_viscosity: f64,
    /// Ambient air Prandtl number
    pub prandtl_number: f64,
    /// Ambient air thermal conductivity (W/(m·K))
    pub air_conductivity: f64,
    /// Material heat capacity used for this sample (J/(kg·K))
    pub heat_capacity: f64,
    /// Material conductivity used for this sample (W/(m·K))
    pub conductivity: f64,
}

/// Everything computed once, before stepping starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    pub geometry: Geometry,
    pub material_name: String,
    /// m²
    pub surface_area: f64,
    /// m³
    pub volume: f64,
    /// kg
    pub mass: f64,
    /// m
    pub characteristic_length: f64,
    /// Material properties at T₀
    pub properties: MaterialProperties,
    /// Ambient air at T∞
    pub air: AirProperties,
    /// Surface coefficients at the initial state
    pub coefficients: HeatTransferCoefficients,
    /// Biot number that passed the admissibility gate
    pub biot_number: f64,
    /// Lumped time constant `m·c/(A·α_sum)` at T₀ (s)
    pub time_constant: f64,
}

/// Complete result of a run: the initial-state summary and every sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoolingCurve {
    pub initial: InitialState,
    pub samples: Vec<SimulationSample>,
}

impl CoolingCurve {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&SimulationSample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&SimulationSample> {
        self.samples.last()
    }

    /// Body temperature at the end of the cooling time
    pub fn final_temperature(&self) -> Option<Celsius> {
        self.last().map(|s| s.temperature)
    }

    /// Sample times in order
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.time)
    }

    /// Sample temperatures in order
    pub fn temperatures(&self) -> impl Iterator<Item = Celsius> + '_ {
        self.samples.iter().map(|s| s.temperature)
    }
}

//! Temperature-dependent properties of ambient air
//!
//! Closed-form fits valid for dry air near atmospheric pressure. Inputs are
//! in °C and converted to Kelvin internally.
//!
//! # Scientific References
//! - Sutherland, W. (1893). "The viscosity of gases and molecular force."
//!   Phil. Mag. 36:507-531 (viscosity law, C = 110.4 K)
//! - ICAO Standard Atmosphere (1993) (ρ₀ = 1.293 kg/m³ at 0°C)

use serde::{Deserialize, Serialize};

use crate::core_types::units::{Celsius, CELSIUS_KELVIN_OFFSET};

/// Sutherland reference coefficient for air, kg/(m·s·K^0.5)
const SUTHERLAND_C1: f64 = 1.458e-6;

/// Sutherland temperature for air (K)
const SUTHERLAND_S: f64 = 110.4;

/// Air density at 0°C and 1 atm (kg/m³)
const AIR_DENSITY_0C: f64 = 1.293;

/// Air thermal conductivity at 0°C (W/(m·K))
const AIR_CONDUCTIVITY_0C: f64 = 0.0241;

/// Exponent of the conductivity power law
const AIR_CONDUCTIVITY_EXPONENT: f64 = 0.9;

/// Specific heat of air at 0°C (J/(kg·K))
const AIR_CP_0C: f64 = 1005.0;

/// Dynamic viscosity μ (Pa·s), Sutherland's law
#[inline]
pub fn dynamic_viscosity(temperature: Celsius) -> f64 {
    let t_k = *temperature.to_kelvin();
    SUTHERLAND_C1 * t_k.powf(1.5) / (t_k + SUTHERLAND_S)
}

/// Density ρ (kg/m³), ideal gas at constant pressure
#[inline]
pub fn density(temperature: Celsius) -> f64 {
    AIR_DENSITY_0C * (CELSIUS_KELVIN_OFFSET / *temperature.to_kelvin())
}

/// Kinematic viscosity ν = μ/ρ (m²/s)
#[inline]
pub fn kinematic_viscosity(temperature: Celsius) -> f64 {
    dynamic_viscosity(temperature) / density(temperature)
}

/// Thermal conductivity k (W/(m·K))
#[inline]
pub fn thermal_conductivity(temperature: Celsius) -> f64 {
    AIR_CONDUCTIVITY_0C
        * (*temperature.to_kelvin() / CELSIUS_KELVIN_OFFSET).powf(AIR_CONDUCTIVITY_EXPONENT)
}

/// Specific heat at constant pressure `c_p` (J/(kg·K))
#[inline]
pub fn specific_heat(temperature: Celsius) -> f64 {
    AIR_CP_0C + (*temperature.to_kelvin() - CELSIUS_KELVIN_OFFSET) / 10.0
}

/// Prandtl number `Pr = μ·c_p/k` (dimensionless)
#[inline]
pub fn prandtl_number(temperature: Celsius) -> f64 {
    dynamic_viscosity(temperature) * specific_heat(temperature) / thermal_conductivity(temperature)
}

/// All air properties at one temperature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirProperties {
    pub temperature: Celsius,
    /// Pa·s
    pub dynamic_viscosity: f64,
    /// m²/s
    pub kinematic_viscosity: f64,
    /// kg/m³
    pub density: f64,
    /// W/(m·K)
    pub thermal_conductivity: f64,
    /// J/(kg·K)
    pub specific_heat: f64,
    pub prandtl_number: f64,
}

impl AirProperties {
    /// Evaluate every property at `temperature`
    pub fn at(temperature: Celsius) -> Self {
        Self {
            temperature,
            dynamic_viscosity: dynamic_viscosity(temperature),
            kinematic_viscosity: kinematic_viscosity(temperature),
            density: density(temperature),
            thermal_conductivity: thermal_conductivity(temperature),
            specific_heat: specific_heat(temperature),
            prandtl_number: prandtl_number(temperature),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_values_at_0c() {
        let t = Celsius::new(0.0);
        assert_relative_eq!(density(t), 1.293, max_relative = 1e-12);
        assert_relative_eq!(thermal_conductivity(t), 0.0241, max_relative = 1e-12);
        assert_relative_eq!(specific_heat(t), 1005.0, max_relative = 1e-12);
        // Handbook: 1.716e-5 Pa·s
        assert_relative_eq!(dynamic_viscosity(t), 1.716e-5, max_relative = 0.01);
    }

    #[test]
    fn test_room_temperature_against_handbook() {
        // Incropera Table A.4 at 300 K: ν = 15.89e-6, k = 0.0263, Pr = 0.707
        let air = AirProperties::at(Celsius::new(26.85));
        assert_relative_eq!(air.kinematic_viscosity, 15.89e-6, max_relative = 0.03);
        assert_relative_eq!(air.thermal_conductivity, 0.0263, max_relative = 0.03);
        assert_relative_eq!(air.prandtl_number, 0.707, max_relative = 0.03);
    }

    #[test]
    fn test_properties_rise_with_temperature() {
        let cold = AirProperties::at(Celsius::new(0.0));
        let hot = AirProperties::at(Celsius::new(200.0));
        assert!(hot.dynamic_viscosity > cold.dynamic_viscosity);
        assert!(hot.kinematic_viscosity > cold.kinematic_viscosity);
        assert!(hot.thermal_conductivity > cold.thermal_conductivity);
        assert!(hot.density < cold.density);
    }

    #[test]
    fn test_snapshot_matches_free_functions() {
        let t = Celsius::new(42.0);
        let air = AirProperties::at(t);
        assert_eq!(air.prandtl_number, prandtl_number(t));
        assert_eq!(air.kinematic_viscosity, kinematic_viscosity(t));
    }
}

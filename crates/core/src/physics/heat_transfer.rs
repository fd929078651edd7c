//! Surface heat-transfer coefficients and the Biot admissibility gate
//!
//! Combines linearized Stefan-Boltzmann radiation with natural-convection
//! correlations into one total coefficient `α_sum` (W/(m²·K)), then checks
//! that the body is thermally thin enough for the lumped model.
//!
//! # Scientific References
//! - Stefan-Boltzmann Law: Stefan (1879), Boltzmann (1884)
//! - Churchill & Chu (1975), McAdams (1954): natural convection correlations
//! - Incropera & DeWitt, "Fundamentals of Heat and Mass Transfer", §5.2
//!   (lumped capacitance, Bi < 0.1)
#![expect(
    clippy::doc_markdown,
    reason = "McAdams is a scientific author name, not a code identifier"
)]

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::air_properties::AirProperties;
use super::geometry::Geometry;
use crate::core_types::units::{Celsius, CelsiusDelta};
use crate::core_types::Orientation;
use crate::error::SimulationError;

/// Stefan-Boltzmann constant (W/(m²·K⁴)), CODATA 2018
pub const STEFAN_BOLTZMANN: f64 = 5.670374419e-8;

/// Gravitational acceleration (m/s²)
pub const GRAVITY: f64 = 9.81;

/// Volumetric expansion coefficient of air, ideal gas at 0°C (1/K)
pub const AIR_EXPANSION_COEFFICIENT: f64 = 1.0 / 273.0;

/// Biot numbers at or above this reject the lumped-capacitance model
pub const BIOT_LIMIT: f64 = 0.1;

/// Radiative heat-transfer coefficient (W/(m²·K))
///
/// Secant linearization of the T⁴ law between body and surroundings:
///
/// ```text
/// α_rad = ε·σ·(T₀⁴ − T∞⁴)/(T₀ − T∞) = ε·σ·(T₀² + T∞²)(T₀ + T∞)
/// ```
///
/// The factored form is used, so `T₀ = T∞` yields the tangent limit `4εσT³`
/// instead of 0/0.
pub fn radiative_coefficient(emissivity: f64, body: Celsius, ambient: Celsius) -> f64 {
    let t0 = *body.to_kelvin();
    let tn = *ambient.to_kelvin();
    emissivity * STEFAN_BOLTZMANN * (t0 * t0 + tn * tn) * (t0 + tn)
}

/// Grashof number `Gr = g·β·|ΔT|·L³/ν²`
///
/// The magnitude of ΔT is used so a body warming up in hot air still gets a
/// buoyancy-driven correlation.
pub fn grashof_number(
    characteristic_length: f64,
    kinematic_viscosity: f64,
    delta: CelsiusDelta,
) -> f64 {
    GRAVITY * AIR_EXPANSION_COEFFICIENT * *delta.abs() * characteristic_length.powi(3)
        / (kinematic_viscosity * kinematic_viscosity)
}

/// Surface family selecting the natural-convection correlation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvectionSurface {
    /// Sphere or horizontal cylinder
    Curved,
    /// Horizontal plate
    HorizontalPlate,
    /// Vertical plate
    Vertical,
    /// Vertical cylinder, no tabulated correlation
    Uncorrelated,
}

impl ConvectionSurface {
    pub fn of(geometry: &Geometry) -> Self {
        match *geometry {
            Geometry::Sphere { .. }
            | Geometry::Cylinder {
                orientation: Orientation::Horizontal,
                ..
            } => ConvectionSurface::Curved,
            Geometry::Plate {
                orientation: Orientation::Horizontal,
                ..
            } => ConvectionSurface::HorizontalPlate,
            Geometry::Plate {
                orientation: Orientation::Vertical,
                ..
            } => ConvectionSurface::Vertical,
            Geometry::Cylinder {
                orientation: Orientation::Vertical,
                ..
            } => ConvectionSurface::Uncorrelated,
        }
    }
}

/// Natural-convection correlation `Nu = C·Ra^n`, or the degenerate fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correlation {
    /// Sphere/horizontal cylinder, 1e3 ≤ Ra < 1e9
    CurvedLaminar,
    /// Sphere/horizontal cylinder, 1e9 ≤ Ra < 1e12
    CurvedTurbulent,
    /// Horizontal plate, 2e4 ≤ Ra < 8e6
    HorizontalPlateLaminar,
    /// Horizontal plate, 8e6 ≤ Ra < 1e11
    HorizontalPlateTurbulent,
    /// Vertical surface, 1e4 ≤ Ra < 1e9
    VerticalLaminar,
    /// Vertical surface, Ra ≥ 1e9
    VerticalTurbulent,
    /// Outside every tabulated range, Nu = 1
    Fallback,
}

impl Correlation {
    /// Pick the correlation for a surface at a Rayleigh number.
    ///
    /// Ranges are half-open `[low, high)` so adjacent rows meet without a gap.
    pub fn select(surface: ConvectionSurface, rayleigh: f64) -> Self {
        match surface {
            ConvectionSurface::Curved => {
                if (1e3..1e9).contains(&rayleigh) {
                    Correlation::CurvedLaminar
                } else if (1e9..1e12).contains(&rayleigh) {
                    Correlation::CurvedTurbulent
                } else {
                    Correlation::Fallback
                }
            }
            ConvectionSurface::HorizontalPlate => {
                if (2e4..8e6).contains(&rayleigh) {
                    Correlation::HorizontalPlateLaminar
                } else if (8e6..1e11).contains(&rayleigh) {
                    Correlation::HorizontalPlateTurbulent
                } else {
                    Correlation::Fallback
                }
            }
            ConvectionSurface::Vertical => {
                if (1e4..1e9).contains(&rayleigh) {
                    Correlation::VerticalLaminar
                } else if rayleigh >= 1e9 && rayleigh.is_finite() {
                    Correlation::VerticalTurbulent
                } else {
                    Correlation::Fallback
                }
            }
            ConvectionSurface::Uncorrelated => Correlation::Fallback,
        }
    }

    /// `(C, n)` of `Nu = C·Ra^n`; `None` for the fallback
    pub fn coefficients(self) -> Option<(f64, f64)> {
        match self {
            Correlation::CurvedLaminar => Some((0.53, 0.25)),
            Correlation::CurvedTurbulent | Correlation::VerticalTurbulent => Some((0.13, 0.33)),
            Correlation::HorizontalPlateLaminar => Some((0.54, 0.25)),
            Correlation::HorizontalPlateTurbulent => Some((0.15, 0.33)),
            Correlation::VerticalLaminar => Some((0.59, 0.25)),
            Correlation::Fallback => None,
        }
    }

    /// Nusselt number at a Rayleigh number
    pub fn nusselt(self, rayleigh: f64) -> f64 {
        match self.coefficients() {
            Some((c, n)) => c * rayleigh.powf(n),
            None => 1.0,
        }
    }
}

/// Nusselt number for a surface from Grashof and Prandtl numbers
pub fn nusselt_number(surface: ConvectionSurface, grashof: f64, prandtl: f64) -> f64 {
    let rayleigh = grashof * prandtl;
    Correlation::select(surface, rayleigh).nusselt(rayleigh)
}

/// Convective coefficient `α_conv = Nu·k_air/L` (W/(m²·K))
pub fn convective_coefficient(
    nusselt: f64,
    air_conductivity: f64,
    characteristic_length: f64,
) -> f64 {
    nusselt * air_conductivity / characteristic_length
}

/// Biot number `Bi = α_sum·L/k_material`
pub fn biot_number(
    total_coefficient: f64,
    characteristic_length: f64,
    material_conductivity: f64,
) -> f64 {
    total_coefficient * characteristic_length / material_conductivity
}

/// Admissibility gate of the lumped-capacitance model
///
/// # Errors
/// `NotThermallyThin` when `biot >= 0.1` (or is NaN).
pub fn check_thermally_thin(biot: f64) -> Result<(), SimulationError> {
    if biot < BIOT_LIMIT {
        Ok(())
    } else {
        Err(SimulationError::NotThermallyThin { biot })
    }
}

/// One evaluation of every surface coefficient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatTransferCoefficients {
    /// W/(m²·K)
    pub radiative: f64,
    /// W/(m²·K)
    pub convective: f64,
    /// `radiative + convective`, W/(m²·K)
    pub total: f64,
    pub grashof: f64,
    pub rayleigh: f64,
    pub nusselt: f64,
    pub correlation: Correlation,
}

impl HeatTransferCoefficients {
    /// Evaluate radiation and natural convection for a body at
    /// `body_temperature` in air described by `air`.
    pub fn evaluate(
        geometry: &Geometry,
        emissivity: f64,
        body_temperature: Celsius,
        air: &AirProperties,
    ) -> Self {
        let length = geometry.characteristic_length();
        let radiative = radiative_coefficient(emissivity, body_temperature, air.temperature);

        let grashof = grashof_number(
            length,
            air.kinematic_viscosity,
            body_temperature - air.temperature,
        );
        let rayleigh = grashof * air.prandtl_number;
        let correlation = Correlation::select(ConvectionSurface::of(geometry), rayleigh);
        if correlation == Correlation::Fallback {
            debug!(rayleigh, "Rayleigh number outside correlation ranges, using Nu = 1");
        }
        let nusselt = correlation.nusselt(rayleigh);
        let convective = convective_coefficient(nusselt, air.thermal_conductivity, length);

        Self {
            radiative,
            convective,
            total: radiative + convective,
            grashof,
            rayleigh,
            nusselt,
            correlation,
        }
    }
}

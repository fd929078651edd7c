//! Solid material descriptors and the injected material catalog
//!
//! Built-in metals and glass carry affine temperature models fitted to
//! handbook data between room temperature and roughly 600°C:
//!
//! ```text
//! k(T) = k₀ · (1 − α · (T − 20))
//! c(T) = c₀ + β · T
//! ```
//!
//! with T in °C, clamped to [-273, 3000] before evaluation. Density is held
//! constant. Custom materials and registry entries without a temperature fit
//! use [`ThermalModel::Constant`].
//!
//! # References
//! - Incropera & DeWitt, "Fundamentals of Heat and Mass Transfer", Table A.1
//! - EN 1993-1-2 (carbon steel conductivity and specific heat at temperature)

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::body::MaterialSelector;
use super::units::Celsius;
use crate::error::SimulationError;

/// Lower clamp for property evaluation (°C)
pub const MIN_PROPERTY_TEMPERATURE: f64 = -273.0;

/// Upper clamp for property evaluation (°C)
pub const MAX_PROPERTY_TEMPERATURE: f64 = 3000.0;

/// Reference temperature of the conductivity fit (°C)
const CONDUCTIVITY_REFERENCE_TEMP: f64 = 20.0;

/// Evaluated properties never fall below this fraction of the fit's
/// reference value. The affine fits are extrapolated far past their data at
/// the clamp limits.
const PROPERTY_FLOOR_FRACTION: f64 = 0.25;

/// Properties of a material evaluated at one temperature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// kg/m³
    pub density: f64,
    /// J/(kg·K)
    pub heat_capacity: f64,
    /// W/(m·K)
    pub conductivity: f64,
}

/// How heat capacity and conductivity respond to temperature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermalModel {
    /// Fixed values at every temperature
    Constant { heat_capacity: f64, conductivity: f64 },
    /// `k₀·(1 − α·(T−20))` and `c₀ + β·T`
    Linear {
        /// Conductivity at 20°C, W/(m·K)
        k0: f64,
        /// Relative conductivity slope, 1/K (negative when k rises with T)
        alpha: f64,
        /// Heat capacity intercept at 0°C, J/(kg·K)
        c0: f64,
        /// Heat capacity slope, J/(kg·K²)
        beta: f64,
    },
}

/// Named solid material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// kg/m³, temperature-independent
    pub density: f64,
    pub thermal: ThermalModel,
}

impl Material {
    /// Material with fixed properties
    pub fn constant(
        name: impl Into<String>,
        density: f64,
        heat_capacity: f64,
        conductivity: f64,
    ) -> Self {
        Self {
            name: name.into(),
            density,
            thermal: ThermalModel::Constant {
                heat_capacity,
                conductivity,
            },
        }
    }

    /// Material with an affine temperature fit
    pub fn linear(
        name: impl Into<String>,
        density: f64,
        k0: f64,
        alpha: f64,
        c0: f64,
        beta: f64,
    ) -> Self {
        Self {
            name: name.into(),
            density,
            thermal: ThermalModel::Linear { k0, alpha, c0, beta },
        }
    }

    /// Carbon steel (S235-class structural steel)
    pub fn carbon_steel() -> Self {
        Self::linear("Carbon steel", 7850.0, 54.0, 0.00064, 450.0, 0.28)
    }

    /// Austenitic stainless steel (AISI 304); conductivity rises with T
    pub fn stainless_steel() -> Self {
        Self::linear("Stainless steel AISI 304", 7900.0, 14.9, -0.0008, 477.0, 0.18)
    }

    /// Pure aluminium
    pub fn aluminium() -> Self {
        Self::linear("Aluminium", 2700.0, 237.0, 0.0001, 880.0, 0.45)
    }

    /// Pure copper
    pub fn copper() -> Self {
        Self::linear("Copper", 8960.0, 401.0, 0.00018, 383.0, 0.1)
    }

    /// Pure iron (Armco)
    pub fn iron() -> Self {
        Self::linear("Iron", 7870.0, 80.2, 0.00103, 440.0, 0.4)
    }

    /// Soda-lime glass; conductivity rises slightly with T
    pub fn glass() -> Self {
        Self::linear("Glass", 2500.0, 0.8, -0.001, 830.0, 0.5)
    }

    /// Whether heat capacity or conductivity vary with temperature
    pub fn is_temperature_dependent(&self) -> bool {
        matches!(self.thermal, ThermalModel::Linear { .. })
    }

    /// Evaluate properties at a body temperature
    pub fn properties_at(&self, temperature: Celsius) -> MaterialProperties {
        let (heat_capacity, conductivity) = match self.thermal {
            ThermalModel::Constant {
                heat_capacity,
                conductivity,
            } => (heat_capacity, conductivity),
            ThermalModel::Linear { k0, alpha, c0, beta } => {
                let t = *temperature.clamp_to(MIN_PROPERTY_TEMPERATURE, MAX_PROPERTY_TEMPERATURE);
                let k = k0 * (1.0 - alpha * (t - CONDUCTIVITY_REFERENCE_TEMP));
                let c = c0 + beta * t;
                (
                    c.max(c0 * PROPERTY_FLOOR_FRACTION),
                    k.max(k0 * PROPERTY_FLOOR_FRACTION),
                )
            }
        };

        MaterialProperties {
            density: self.density,
            heat_capacity,
            conductivity,
        }
    }

    /// Reject non-positive or non-finite reference values
    ///
    /// # Errors
    /// `InvalidInput` naming the offending property.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let (c_ref, k_ref) = match self.thermal {
            ThermalModel::Constant {
                heat_capacity,
                conductivity,
            } => (heat_capacity, conductivity),
            ThermalModel::Linear { k0, c0, .. } => (c0, k0),
        };
        require_positive("density", self.density)?;
        require_positive("heat_capacity", c_ref)?;
        require_positive("conductivity", k_ref)?;
        Ok(())
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::invalid(
            field,
            format!("must be finite and positive, got {value}"),
        ))
    }
}

/// Immutable mapping from material key to descriptor
///
/// Keys are matched case-insensitively. The catalog is built once by the
/// owner (a registry, the CLI, a test) and shared by reference; runs never
/// mutate it.
#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    materials: FxHashMap<String, Material>,
}

impl MaterialCatalog {
    /// Catalog with no entries
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog of the built-in temperature-dependent materials
    pub fn builtin() -> Self {
        Self::empty()
            .with_material("steel", Material::carbon_steel())
            .with_material("stainless_steel", Material::stainless_steel())
            .with_material("aluminium", Material::aluminium())
            .with_material("aluminum", Material::aluminium())
            .with_material("copper", Material::copper())
            .with_material("iron", Material::iron())
            .with_material("glass", Material::glass())
    }

    /// Add or replace an entry
    pub fn with_material(mut self, key: impl AsRef<str>, material: Material) -> Self {
        self.materials
            .insert(key.as_ref().trim().to_ascii_lowercase(), material);
        self
    }

    /// Look up a key
    pub fn get(&self, key: &str) -> Option<&Material> {
        self.materials.get(&key.trim().to_ascii_lowercase())
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.materials.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Turn a selector into a concrete, validated material
    ///
    /// # Errors
    /// - `UnknownMaterial` if a named key is absent
    /// - `InvalidInput` if custom (or registered) properties are not positive
    pub fn resolve(&self, selector: &MaterialSelector) -> Result<Material, SimulationError> {
        let material = match selector {
            MaterialSelector::Named(key) => self
                .get(key)
                .cloned()
                .ok_or_else(|| SimulationError::UnknownMaterial(key.clone()))?,
            MaterialSelector::Custom {
                density,
                heat_capacity,
                conductivity,
            } => Material::constant("Custom", *density, *heat_capacity, *conductivity),
        };
        material.validate()?;
        Ok(material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_builtin_catalog_contents() {
        let catalog = MaterialCatalog::builtin();
        let keys = [
            "steel",
            "stainless_steel",
            "aluminium",
            "aluminum",
            "copper",
            "iron",
            "glass",
        ];
        for key in keys {
            let material = catalog.get(key).unwrap();
            assert!(material.validate().is_ok(), "{key} should validate");
            assert!(material.is_temperature_dependent());
        }
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog.get("Copper").unwrap().name, "Copper");
    }

    #[test]
    fn test_linear_model_at_reference_temperature() {
        let al = Material::aluminium();
        let props = al.properties_at(Celsius::new(20.0));
        assert_relative_eq!(props.conductivity, 237.0, epsilon = 1e-9);
        assert_relative_eq!(props.heat_capacity, 880.0 + 0.45 * 20.0, epsilon = 1e-9);
        assert_eq!(props.density, 2700.0);
    }

    #[test]
    fn test_steel_conductivity_falls_with_temperature() {
        let steel = Material::carbon_steel();
        let cold = steel.properties_at(Celsius::new(20.0));
        let hot = steel.properties_at(Celsius::new(600.0));
        assert!(hot.conductivity < cold.conductivity);
        assert!(hot.heat_capacity > cold.heat_capacity);
    }

    #[test]
    fn test_stainless_conductivity_rises_with_temperature() {
        let ss = Material::stainless_steel();
        let cold = ss.properties_at(Celsius::new(20.0));
        let hot = ss.properties_at(Celsius::new(500.0));
        assert!(hot.conductivity > cold.conductivity);
    }

    #[test]
    fn test_extreme_temperatures_are_clamped_and_floored() {
        let steel = Material::carbon_steel();
        let at_limit = steel.properties_at(Celsius::new(3000.0));
        let beyond = steel.properties_at(Celsius::new(5000.0));
        assert_eq!(at_limit, beyond);
        assert!(beyond.conductivity > 0.0);
        assert_relative_eq!(beyond.conductivity, 54.0 * 0.25, epsilon = 1e-9);

        let frozen = steel.properties_at(Celsius::ABSOLUTE_ZERO);
        assert!(frozen.heat_capacity > 0.0);
        assert!(frozen.conductivity > 0.0);
    }

    #[test]
    fn test_custom_selector_is_constant() {
        let catalog = MaterialCatalog::empty();
        let selector = MaterialSelector::Custom {
            density: 2700.0,
            heat_capacity: 900.0,
            conductivity: 237.0,
        };
        let material = catalog.resolve(&selector).unwrap();
        assert!(!material.is_temperature_dependent());
        let a = material.properties_at(Celsius::new(20.0));
        let b = material.properties_at(Celsius::new(900.0));
        assert_eq!(a, b);
        assert_eq!(a.heat_capacity, 900.0);
    }

    #[test]
    fn test_unknown_material() {
        let catalog = MaterialCatalog::builtin();
        let err = catalog
            .resolve(&MaterialSelector::Named("unobtainium".into()))
            .unwrap_err();
        assert_eq!(err, SimulationError::UnknownMaterial("unobtainium".into()));
    }

    #[test]
    fn test_custom_non_positive_properties_rejected() {
        let catalog = MaterialCatalog::empty();
        let selector = MaterialSelector::Custom {
            density: 2700.0,
            heat_capacity: 0.0,
            conductivity: 237.0,
        };
        match catalog.resolve(&selector) {
            Err(SimulationError::InvalidInput { field, .. }) => assert_eq!(field, "heat_capacity"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_registry_entries_override_builtin() {
        let catalog = MaterialCatalog::builtin()
            .with_material("Brass", Material::constant("Brass", 8500.0, 380.0, 109.0));
        let brass = catalog.resolve(&MaterialSelector::Named("brass".into())).unwrap();
        assert_eq!(brass.density, 8500.0);
        assert!(catalog.keys().contains(&"brass"));
    }
}

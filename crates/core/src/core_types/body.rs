//! Body specification: the immutable input record of one cooling run
//!
//! A `BodySpec` is what the request layer hands to the engine. It is plain
//! data (serde-friendly, raw f64 fields) and is validated by the engine
//! rather than at construction, so that every violation surfaces as a
//! structured [`SimulationError`](crate::SimulationError).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SimulationError;

/// Body shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Cylinder,
    Sphere,
    Plate,
}

impl Shape {
    /// Tag used in requests and persisted variants
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Cylinder => "cylinder",
            Shape::Sphere => "sphere",
            Shape::Plate => "plate",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shape {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cylinder" => Ok(Shape::Cylinder),
            "sphere" => Ok(Shape::Sphere),
            "plate" => Ok(Shape::Plate),
            other => Err(SimulationError::InvalidGeometry(format!(
                "unknown shape '{other}'"
            ))),
        }
    }
}

/// Body orientation relative to gravity (cylinders and plates only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl Orientation {
    /// Tag used in requests and persisted variants
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertical" => Ok(Orientation::Vertical),
            "horizontal" => Ok(Orientation::Horizontal),
            other => Err(SimulationError::InvalidGeometry(format!(
                "unknown orientation '{other}'"
            ))),
        }
    }
}

/// Which material the body is made of
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialSelector {
    /// Look the key up in the injected material catalog
    Named(String),
    /// Caller-supplied constants, never varied with temperature
    Custom {
        /// kg/m³
        density: f64,
        /// J/(kg·K)
        heat_capacity: f64,
        /// W/(m·K)
        conductivity: f64,
    },
}

impl MaterialSelector {
    /// Selector key used by request layers ("custom" for overrides)
    pub fn key(&self) -> &str {
        match self {
            MaterialSelector::Named(key) => key,
            MaterialSelector::Custom { .. } => "custom",
        }
    }
}

/// Immutable description of one body to cool
///
/// Dimensions are in metres, temperatures in °C, the cooling time in
/// seconds. Only the dimensions required by the shape are read:
///
/// | shape | required |
/// |---|---|
/// | sphere | `radius` |
/// | cylinder | `radius`, `height` |
/// | plate | `length`, `width`, `height` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub shape: Shape,
    #[serde(default)]
    pub orientation: Option<Orientation>,
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub radius: f64,
    /// Initial body temperature T₀ (°C)
    pub initial_temperature: f64,
    /// Ambient air temperature T∞ (°C)
    pub ambient_temperature: f64,
    /// Surface emissivity (0-1)
    pub emissivity: f64,
    /// Cooling duration τ (s)
    pub cooling_time: f64,
    pub material: MaterialSelector,
}

impl BodySpec {
    fn with_shape(shape: Shape, orientation: Option<Orientation>) -> Self {
        Self {
            shape,
            orientation,
            length: 0.0,
            width: 0.0,
            height: 0.0,
            radius: 0.0,
            initial_temperature: 100.0,
            ambient_temperature: 20.0,
            emissivity: 0.8,
            cooling_time: 60.0,
            material: MaterialSelector::Named("steel".to_string()),
        }
    }

    /// Sphere of the given radius (steel, 100°C into 20°C air for 60 s)
    pub fn sphere(radius: f64) -> Self {
        Self {
            radius,
            ..Self::with_shape(Shape::Sphere, None)
        }
    }

    /// Cylinder of the given radius and height
    pub fn cylinder(radius: f64, height: f64, orientation: Orientation) -> Self {
        Self {
            radius,
            height,
            ..Self::with_shape(Shape::Cylinder, Some(orientation))
        }
    }

    /// Rectangular plate `length` × `width` × `height`
    pub fn plate(length: f64, width: f64, height: f64, orientation: Orientation) -> Self {
        Self {
            length,
            width,
            height,
            ..Self::with_shape(Shape::Plate, Some(orientation))
        }
    }

    /// Set initial and ambient temperatures (°C)
    pub fn with_temperatures(mut self, initial: f64, ambient: f64) -> Self {
        self.initial_temperature = initial;
        self.ambient_temperature = ambient;
        self
    }

    /// Set surface emissivity
    pub fn with_emissivity(mut self, emissivity: f64) -> Self {
        self.emissivity = emissivity;
        self
    }

    /// Set cooling duration (s)
    pub fn with_cooling_time(mut self, seconds: f64) -> Self {
        self.cooling_time = seconds;
        self
    }

    /// Use a catalog material
    pub fn with_material(mut self, key: impl Into<String>) -> Self {
        self.material = MaterialSelector::Named(key.into());
        self
    }

    /// Use caller-supplied constant properties
    pub fn with_custom_material(
        mut self,
        density: f64,
        heat_capacity: f64,
        conductivity: f64,
    ) -> Self {
        self.material = MaterialSelector::Custom {
            density,
            heat_capacity,
            conductivity,
        };
        self
    }
}

//! Body geometry: surface area, volume and characteristic length
//!
//! A [`Geometry`] is the validated, tagged form of the shape fields in a
//! [`BodySpec`]. Each operation is an exhaustive match, so an unsupported
//! shape cannot fall through to a zero area.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::core_types::{BodySpec, Orientation, Shape};
use crate::error::SimulationError;

/// Resolved body geometry (metres)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "shape")]
pub enum Geometry {
    Sphere {
        radius: f64,
    },
    Cylinder {
        radius: f64,
        height: f64,
        orientation: Orientation,
    },
    Plate {
        length: f64,
        width: f64,
        height: f64,
        orientation: Orientation,
    },
}

impl Geometry {
    /// Validate the dimensional fields the shape needs and build the geometry.
    ///
    /// Fields the shape does not use are ignored.
    ///
    /// # Errors
    /// - `InvalidGeometry` if a cylinder or plate has no orientation
    /// - `InvalidInput` if a required dimension is missing, non-positive or
    ///   non-finite
    pub fn from_spec(spec: &BodySpec) -> Result<Self, SimulationError> {
        let orientation = || {
            spec.orientation.ok_or_else(|| {
                SimulationError::InvalidGeometry(format!(
                    "{} requires an orientation (vertical or horizontal)",
                    spec.shape
                ))
            })
        };

        match spec.shape {
            Shape::Sphere => Ok(Geometry::Sphere {
                radius: dimension("radius", spec.radius)?,
            }),
            Shape::Cylinder => Ok(Geometry::Cylinder {
                orientation: orientation()?,
                radius: dimension("radius", spec.radius)?,
                height: dimension("height", spec.height)?,
            }),
            Shape::Plate => Ok(Geometry::Plate {
                orientation: orientation()?,
                length: dimension("length", spec.length)?,
                width: dimension("width", spec.width)?,
                height: dimension("height", spec.height)?,
            }),
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Geometry::Sphere { .. } => Shape::Sphere,
            Geometry::Cylinder { .. } => Shape::Cylinder,
            Geometry::Plate { .. } => Shape::Plate,
        }
    }

    /// Orientation, `None` for spheres
    pub fn orientation(&self) -> Option<Orientation> {
        match *self {
            Geometry::Sphere { .. } => None,
            Geometry::Cylinder { orientation, .. } | Geometry::Plate { orientation, .. } => {
                Some(orientation)
            }
        }
    }

    /// Heat-exchanging surface area (m²)
    ///
    /// - cylinder: `2πr(r + h)`
    /// - sphere: `4πr²`
    /// - vertical plate: `2(L + W)·H`
    /// - horizontal plate: `2·L·W`
    pub fn surface_area(&self) -> f64 {
        match *self {
            Geometry::Sphere { radius } => 4.0 * PI * radius * radius,
            Geometry::Cylinder { radius, height, .. } => 2.0 * PI * radius * (radius + height),
            Geometry::Plate {
                length,
                width,
                height,
                orientation,
            } => match orientation {
                Orientation::Vertical => 2.0 * (length + width) * height,
                Orientation::Horizontal => 2.0 * length * width,
            },
        }
    }

    /// Length scale of the natural-convection correlations (m)
    pub fn characteristic_length(&self) -> f64 {
        match *self {
            Geometry::Sphere { radius } => 2.0 * radius,
            Geometry::Cylinder {
                radius,
                height,
                orientation,
            } => match orientation {
                Orientation::Horizontal => 2.0 * radius,
                Orientation::Vertical => height,
            },
            Geometry::Plate {
                length,
                width,
                height,
                orientation,
            } => match orientation {
                Orientation::Vertical => height,
                Orientation::Horizontal => length.max(width),
            },
        }
    }

    /// Solid volume (m³)
    pub fn volume(&self) -> f64 {
        match *self {
            Geometry::Sphere { radius } => 4.0 / 3.0 * PI * radius.powi(3),
            Geometry::Cylinder { radius, height, .. } => PI * radius * radius * height,
            Geometry::Plate {
                length,
                width,
                height,
                ..
            } => length * width * height,
        }
    }
}

fn dimension(field: &'static str, value: f64) -> Result<f64, SimulationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimulationError::invalid(
            field,
            format!("must be finite and positive for this shape, got {value}"),
        ))
    }
}

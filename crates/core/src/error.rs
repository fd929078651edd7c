//! Failure reasons reported by the cooling engine
//!
//! Every failure is detected before the integrator emits its first sample,
//! so a caller either gets a complete curve or one of these reasons.

use serde::Serialize;
use std::fmt;

/// Why a simulation request was refused
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimulationError {
    /// Input violates a physical or structural precondition
    InvalidInput {
        /// Name of the offending field
        field: &'static str,
        /// Human-readable constraint that was violated
        reason: String,
    },
    /// Material key absent from the catalog and no custom override given
    UnknownMaterial(String),
    /// Unsupported shape/orientation combination or unrecognised tag
    InvalidGeometry(String),
    /// Biot number at the initial state is at or above the lumped limit
    NotThermallyThin {
        /// Biot number that failed the gate
        biot: f64,
    },
}

impl SimulationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimulationError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Short machine-readable kind, for presentation layers that map
    /// failures to their own messages
    pub fn kind(&self) -> &'static str {
        match self {
            SimulationError::InvalidInput { .. } => "invalid_input",
            SimulationError::UnknownMaterial(_) => "unknown_material",
            SimulationError::InvalidGeometry(_) => "invalid_geometry",
            SimulationError::NotThermallyThin { .. } => "not_thermally_thin",
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidInput { field, reason } => {
                write!(f, "Invalid input '{field}': {reason}")
            }
            SimulationError::UnknownMaterial(key) => write!(f, "Unknown material: {key}"),
            SimulationError::InvalidGeometry(msg) => write!(f, "Invalid geometry: {msg}"),
            SimulationError::NotThermallyThin { biot } => write!(
                f,
                "Body is not thermally thin (Bi = {biot:.4} >= 0.1); lumped model does not apply"
            ),
        }
    }
}

impl std::error::Error for SimulationError {}

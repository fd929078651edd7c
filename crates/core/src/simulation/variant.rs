//! Request boundary for presentation layers
//!
//! Storage of saved calculations lives outside this crate. A caller passes
//! its own [`VariantStore`] and the engine hands it a [`Variant`] only after
//! a run succeeded.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use super::{simulate, CoolingCurve, SimulationConfig};
use crate::core_types::material::MaterialCatalog;
use crate::core_types::BodySpec;
use crate::error::SimulationError;

/// A saved calculation: an optional store-assigned id plus the body fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(flatten)]
    pub body: BodySpec,
}

impl Variant {
    /// Unsaved variant for `spec`
    pub fn from_spec(spec: &BodySpec) -> Self {
        Self {
            id: None,
            body: spec.clone(),
        }
    }

    pub fn to_spec(&self) -> BodySpec {
        self.body.clone()
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

/// What the caller wants done with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    ComputeOnly,
    ComputeAndPersist,
}

impl Action {
    pub fn persists(self) -> bool {
        matches!(self, Action::ComputeAndPersist)
    }
}

/// Storage collaborator for saved variants
pub trait VariantStore {
    type Error: fmt::Display;

    /// Store `variant` and return the id it was saved under
    ///
    /// # Errors
    /// Implementation-defined storage failure.
    fn save(&mut self, variant: Variant) -> Result<u64, Self::Error>;
}

/// Why [`process_request`] failed
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// The engine refused the body; nothing was stored
    Simulation(SimulationError),
    /// The run succeeded but the store could not save it
    Store(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Simulation(e) => write!(f, "{e}"),
            RequestError::Store(msg) => write!(f, "Failed to save variant: {msg}"),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::Simulation(e) => Some(e),
            RequestError::Store(_) => None,
        }
    }
}

impl From<SimulationError> for RequestError {
    fn from(e: SimulationError) -> Self {
        RequestError::Simulation(e)
    }
}

/// Run `spec` and, on [`Action::ComputeAndPersist`], save it to `store`
///
/// Returns the curve and the saved id, if any.
///
/// # Errors
/// `RequestError::Simulation` if the engine refuses the body (the store is
/// never touched), `RequestError::Store` if saving fails after a good run.
pub fn process_request<S: VariantStore + ?Sized>(
    spec: &BodySpec,
    action: Action,
    catalog: &MaterialCatalog,
    config: &SimulationConfig,
    store: &mut S,
) -> Result<(CoolingCurve, Option<u64>), RequestError> {
    let curve = simulate(spec, catalog, config)?;

    if !action.persists() {
        debug!("Compute-only request, not saving");
        return Ok((curve, None));
    }

    let id = store
        .save(Variant::from_spec(spec))
        .map_err(|e| RequestError::Store(e.to_string()))?;
    info!(id, "Saved variant");

    Ok((curve, Some(id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Orientation;

    #[derive(Default)]
    struct MemoryStore {
        saved: Vec<Variant>,
        fail: bool,
    }

    impl VariantStore for MemoryStore {
        type Error = String;

        fn save(&mut self, variant: Variant) -> Result<u64, String> {
            if self.fail {
                return Err("disk full".to_string());
            }
            let id = self.saved.len() as u64 + 1;
            self.saved.push(variant.with_id(id));
            Ok(id)
        }
    }

    fn plate() -> BodySpec {
        BodySpec::plate(0.2, 0.1, 0.003, Orientation::Horizontal).with_material("steel")
    }

    #[test]
    fn test_compute_only_never_saves() {
        let mut store = MemoryStore::default();
        let (curve, id) = process_request(
            &plate(),
            Action::ComputeOnly,
            &MaterialCatalog::builtin(),
            &SimulationConfig::default(),
            &mut store,
        )
        .unwrap();
        assert_eq!(curve.len(), 11);
        assert_eq!(id, None);
        assert!(store.saved.is_empty());
    }

    #[test]
    fn test_persist_after_success() {
        let mut store = MemoryStore::default();
        let (_, id) = process_request(
            &plate(),
            Action::ComputeAndPersist,
            &MaterialCatalog::builtin(),
            &SimulationConfig::default(),
            &mut store,
        )
        .unwrap();
        assert_eq!(id, Some(1));
        assert_eq!(store.saved[0].to_spec(), plate());
    }

    #[test]
    fn test_failed_run_is_not_saved() {
        let mut store = MemoryStore::default();
        let err = process_request(
            &plate().with_material("unobtainium"),
            Action::ComputeAndPersist,
            &MaterialCatalog::builtin(),
            &SimulationConfig::default(),
            &mut store,
        )
        .unwrap_err();
        assert_eq!(
            err,
            RequestError::Simulation(SimulationError::UnknownMaterial("unobtainium".to_string()))
        );
        assert!(store.saved.is_empty());
    }

    #[test]
    fn test_store_failure_reported_separately() {
        let mut store = MemoryStore {
            fail: true,
            ..MemoryStore::default()
        };
        let err = process_request(
            &plate(),
            Action::ComputeAndPersist,
            &MaterialCatalog::builtin(),
            &SimulationConfig::default(),
            &mut store,
        )
        .unwrap_err();
        assert_eq!(err, RequestError::Store("disk full".to_string()));
    }

    #[test]
    fn test_variant_json_is_flat() {
        let variant = Variant::from_spec(&plate()).with_id(7);
        let json = serde_json::to_value(&variant).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["shape"], "plate");
        assert_eq!(json["orientation"], "horizontal");

        let back: Variant = serde_json::from_value(json).unwrap();
        assert_eq!(back, variant);
    }
}

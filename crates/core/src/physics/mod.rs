//! Physics models of the lumped cooling engine
//!
//! Leaf models (geometry, air, coefficients) are pure functions; the
//! integrator in [`crate::simulation`] composes them.

pub mod air_properties;
pub mod geometry;
pub mod heat_transfer;

pub use air_properties::AirProperties;
pub use geometry::Geometry;
pub use heat_transfer::{
    biot_number, check_thermally_thin, convective_coefficient, grashof_number, nusselt_number,
    radiative_coefficient, ConvectionSurface, Correlation, HeatTransferCoefficients, BIOT_LIMIT,
    STEFAN_BOLTZMANN,
};

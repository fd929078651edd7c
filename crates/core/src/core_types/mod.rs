//! Core types and utilities

pub mod body;
pub mod material;
pub mod units;

pub use body::*;
pub use material::*;
pub use units::*;

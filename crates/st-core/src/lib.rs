//! st-core: shared foundation for the steam table crates.
//!
//! Contains:
//! - units (uom SI types + the display `UnitSystem`)
//! - numeric (node tolerances, range and finiteness checks)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::{
    Dimension, EnergyUnit, MassUnit, PressureUnit, TemperatureUnit, UnitSystem, VolumeUnit,
};

//! st-tables: tabulated steam properties and the interpolation engine.
//!
//! Provides:
//! - Saturation tables indexed by temperature and by pressure
//! - Superheated vapor and subcooled liquid grids (irregular pressure blocks)
//! - Piecewise-linear and bilinear interpolation that never extrapolates
//! - `TableStore`, the immutable bundle shared by every state
//!
//! All values are canonical: T in °C, P in MPa, v in m³/kg, u and h in kJ/kg,
//! s in kJ/(kg·K).
//!
//! # Example
//!
//! ```
//! use st_tables::{InputPair, Property, Region, TableStore};
//!
//! let store = TableStore::bundled().unwrap();
//! let grid = store.grid(Region::Superheated).unwrap();
//! let pair = InputPair::new((Property::P, 0.1), (Property::T, 300.0)).unwrap();
//! let props = grid.bilinear(pair).unwrap();
//! assert!((props.h - 3074.3).abs() < 1e-9);
//! ```

pub mod bilinear;
pub mod error;
pub mod grid;
pub mod interp;
pub mod properties;
pub mod property;
pub mod saturation;
pub mod store;

pub use bilinear::InputPair;
pub use error::{TableError, TableResult};
pub use grid::{PressureBlock, SinglePhaseGrid};
pub use interp::{Bracket, Interp1d, locate};
pub use properties::Properties;
pub use property::{
    Axis, CRITICAL_PRESSURE, CRITICAL_TEMPERATURE, Phase, Property, Region, SatKey,
};
pub use saturation::{SaturationRow, SaturationTable};
pub use store::TableStore;

//! st-state: steam/water states resolved from tabulated properties.
//!
//! A [`State`] takes two inputs (two of T, P, v, u, h, s, or one of them plus
//! the vapor quality x), classifies them as saturated or single-phase and
//! fills in every other property from a shared [`TableStore`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use st_state::{Property, State, TableStore};
//!
//! let store = Arc::new(TableStore::bundled().unwrap());
//! let mut state = State::from_quality(store, (Property::P, 0.1), 1.0).unwrap();
//! assert_eq!(state.get(Property::T).unwrap(), 99.63);
//! let liquid_h = state.liquid().unwrap().unwrap().value(Property::H);
//! assert_eq!(liquid_h, Some(417.46));
//! ```

pub mod delta;
pub mod error;
pub mod inputs;
pub mod resolver;
pub mod state;

pub use delta::Delta;
pub use error::{StateError, StateResult};
pub use inputs::{Input, Inputs, Specification};
pub use resolver::{Endpoints, Outcome, Resolver};
pub use state::{Override, State};

// Re-exports: the table types every caller needs
pub use st_tables::{Axis, Phase, Properties, Property, Region, TableStore};

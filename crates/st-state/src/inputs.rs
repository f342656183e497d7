//! Input slots of a state and the specification they form.

use std::fmt;

use st_tables::{Axis, InputPair, Property};

use crate::error::{StateError, StateResult};

/// One input slot: a tabulated property or the vapor quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Input {
    Property(Property),
    Quality,
}

impl Input {
    pub const ALL: [Input; 7] = [
        Input::Property(Property::T),
        Input::Property(Property::P),
        Input::Property(Property::V),
        Input::Property(Property::U),
        Input::Property(Property::H),
        Input::Property(Property::S),
        Input::Quality,
    ];
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Property(p) => write!(f, "{p}"),
            Input::Quality => f.write_str("x"),
        }
    }
}

/// User-supplied values in canonical units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Inputs {
    values: [Option<f64>; 6],
    quality: Option<f64>,
}

impl Inputs {
    pub fn get(&self, property: Property) -> Option<f64> {
        self.values[property.index()]
    }

    pub fn set(&mut self, property: Property, value: Option<f64>) {
        self.values[property.index()] = value;
    }

    pub fn quality(&self) -> Option<f64> {
        self.quality
    }

    pub fn set_quality(&mut self, x: Option<f64>) {
        self.quality = x;
    }

    pub fn slot(&self, input: Input) -> Option<f64> {
        match input {
            Input::Property(p) => self.get(p),
            Input::Quality => self.quality,
        }
    }

    /// Given properties in `Property::ALL` order.
    pub fn given(&self) -> Vec<(Property, f64)> {
        Property::ALL
            .into_iter()
            .filter_map(|p| self.get(p).map(|v| (p, v)))
            .collect()
    }

    /// Number of filled slots, quality included.
    pub fn count(&self) -> usize {
        Input::ALL
            .into_iter()
            .filter(|&i| self.slot(i).is_some())
            .count()
    }

    /// Slots whose value differs from `other`.
    pub fn diff(&self, other: &Inputs) -> Vec<Input> {
        Input::ALL
            .into_iter()
            .filter(|&i| self.slot(i) != other.slot(i))
            .collect()
    }
}

/// A complete, classified set of inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Specification {
    /// Two of T, P, v, u, h, s.
    Pair(InputPair),
    /// Quality with T or P.
    QualityAnchor { axis: Axis, value: f64, x: f64 },
    /// Quality with one of v, u, h, s.
    QualityTheta { theta: Property, value: f64, x: f64 },
}

impl Specification {
    /// Exactly two of {T, P, v, u, h, s}, or x with exactly one of them.
    pub fn from_inputs(inputs: &Inputs) -> StateResult<Self> {
        let given = inputs.given();
        match (inputs.quality(), given.as_slice()) {
            (Some(x), &[(property, value)]) => {
                if !(0.0..=1.0).contains(&x) {
                    return Err(StateError::specification(format!(
                        "quality x = {x} must lie in [0, 1]"
                    )));
                }
                Ok(match property.axis() {
                    Some(axis) => Specification::QualityAnchor { axis, value, x },
                    None => Specification::QualityTheta {
                        theta: property,
                        value,
                        x,
                    },
                })
            }
            (Some(_), _) => Err(StateError::specification(format!(
                "quality requires exactly one other input, found {}",
                given.len()
            ))),
            (None, &[a, b]) => Ok(Specification::Pair(InputPair::new(a, b)?)),
            (None, _) => Err(StateError::specification(format!(
                "exactly two of T, P, v, u, h, s are required, found {}",
                given.len()
            ))),
        }
    }

    /// Inputs that pin a state to the saturation curve at one end-point.
    pub(crate) fn anchored_inputs(anchor: Property, value: f64, x: f64) -> Inputs {
        let mut inputs = Inputs::default();
        inputs.set(anchor, Some(value));
        inputs.set_quality(Some(x));
        inputs
    }
}

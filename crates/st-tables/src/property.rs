//! Property, phase and region identifiers shared by the tables and the resolver.

use std::fmt;
use std::str::FromStr;

use st_core::Dimension;

use crate::error::TableError;

/// Critical temperature of water [°C].
pub const CRITICAL_TEMPERATURE: f64 = 374.15;

/// Critical pressure of water [MPa].
pub const CRITICAL_PRESSURE: f64 = 22.12;

/// Tabulated state properties.
///
/// `V`, `U`, `H` and `S` are the "theta" properties: specific quantities that
/// split into distinct liquid and vapor values on the saturation curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    T,
    P,
    V,
    U,
    H,
    S,
}

impl Property {
    pub const ALL: [Property; 6] = [
        Property::T,
        Property::P,
        Property::V,
        Property::U,
        Property::H,
        Property::S,
    ];

    pub const THETA: [Property; 4] = [Property::V, Property::U, Property::H, Property::S];

    pub fn symbol(self) -> &'static str {
        match self {
            Property::T => "T",
            Property::P => "P",
            Property::V => "v",
            Property::U => "u",
            Property::H => "h",
            Property::S => "s",
        }
    }

    /// Position in a `Properties` record and in grid rows (T first).
    pub fn index(self) -> usize {
        match self {
            Property::T => 0,
            Property::P => 1,
            Property::V => 2,
            Property::U => 3,
            Property::H => 4,
            Property::S => 5,
        }
    }

    pub fn dimension(self) -> Dimension {
        match self {
            Property::T => Dimension::Temperature,
            Property::P => Dimension::Pressure,
            Property::V => Dimension::SpecificVolume,
            Property::U | Property::H => Dimension::SpecificEnergy,
            Property::S => Dimension::SpecificEntropy,
        }
    }

    pub fn is_theta(self) -> bool {
        !matches!(self, Property::T | Property::P)
    }

    /// The saturation axis this property anchors, if it is T or P.
    pub fn axis(self) -> Option<Axis> {
        match self {
            Property::T => Some(Axis::Temperature),
            Property::P => Some(Axis::Pressure),
            _ => None,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Property {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "T" => Ok(Property::T),
            "P" => Ok(Property::P),
            "v" => Ok(Property::V),
            "u" => Ok(Property::U),
            "h" => Ok(Property::H),
            "s" => Ok(Property::S),
            other => Err(TableError::UnknownProperty {
                name: other.to_string(),
            }),
        }
    }
}

/// Coexisting phase on the saturation curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Liquid,
    Vapor,
}

impl Phase {
    pub fn suffix(self) -> &'static str {
        match self {
            Phase::Liquid => "L",
            Phase::Vapor => "V",
        }
    }
}

/// Independent variable of a saturation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Temperature,
    Pressure,
}

impl Axis {
    pub fn property(self) -> Property {
        match self {
            Axis::Temperature => Property::T,
            Axis::Pressure => Property::P,
        }
    }

    /// The other saturation axis: P is the complement of T and vice versa.
    pub fn complement(self) -> Axis {
        match self {
            Axis::Temperature => Axis::Pressure,
            Axis::Pressure => Axis::Temperature,
        }
    }

    /// Whether `value` on this axis is at or above the critical point.
    pub fn is_supercritical(self, value: f64) -> bool {
        match self {
            Axis::Temperature => value >= CRITICAL_TEMPERATURE,
            Axis::Pressure => value >= CRITICAL_PRESSURE,
        }
    }
}

/// Thermodynamic region of a resolved state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Subcooled,
    Superheated,
    Saturated,
}

impl Region {
    pub fn label(self) -> &'static str {
        match self {
            Region::Subcooled => "subcooled",
            Region::Superheated => "superheated",
            Region::Saturated => "saturated",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Dependent column of the saturation table, e.g. `hV` or the complement axis `P`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SatKey {
    pub property: Property,
    pub phase: Option<Phase>,
}

impl SatKey {
    /// The axis complement column (`P` on the T axis, `T` on the P axis).
    pub fn complement(axis: Axis) -> Self {
        Self {
            property: axis.complement().property(),
            phase: None,
        }
    }

    pub fn phase(property: Property, phase: Phase) -> Self {
        Self {
            property,
            phase: Some(phase),
        }
    }
}

impl fmt::Display for SatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Some(phase) => write!(f, "{}{}", self.property, phase.suffix()),
            None => write!(f, "{}", self.property),
        }
    }
}

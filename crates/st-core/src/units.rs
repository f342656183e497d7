// st-core/src/units.rs

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::str::FromStr;
use uom::si::f64::{
    Energy as UomEnergy, Mass as UomMass, Pressure as UomPressure,
    TemperatureInterval as UomTemperatureInterval,
    ThermodynamicTemperature as UomThermodynamicTemperature, Volume as UomVolume,
};
use uom::si::{energy, mass, pressure, temperature_interval, thermodynamic_temperature, volume};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Public canonical unit types (SI, f64)
pub type Energy = UomEnergy;
pub type Mass = UomMass;
pub type Pressure = UomPressure;
pub type TempInterval = UomTemperatureInterval;
pub type Temperature = UomThermodynamicTemperature;
pub type Volume = UomVolume;

/// Pressure in the tables' canonical unit.
#[inline]
pub fn mpa(v: f64) -> Pressure {
    Pressure::new::<pressure::megapascal>(v)
}

/// Temperature in the tables' canonical unit.
#[inline]
pub fn celsius(v: f64) -> Temperature {
    Temperature::new::<thermodynamic_temperature::degree_celsius>(v)
}

/// Physical dimension of a tabulated quantity.
///
/// Canonical units: °C, MPa, m³/kg, kJ/kg, kJ/(kg·K); quality is a bare fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Temperature,
    Pressure,
    SpecificVolume,
    SpecificEnergy,
    SpecificEntropy,
    Fraction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TemperatureUnit {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "C"))]
    Celsius,
    #[cfg_attr(feature = "serde", serde(rename = "K"))]
    Kelvin,
    #[cfg_attr(feature = "serde", serde(rename = "F"))]
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PressureUnit {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "MPa"))]
    MegaPascal,
    #[cfg_attr(feature = "serde", serde(rename = "kPa"))]
    KiloPascal,
    #[cfg_attr(feature = "serde", serde(rename = "bar"))]
    Bar,
    #[cfg_attr(feature = "serde", serde(rename = "atm"))]
    Atmosphere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MassUnit {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "kg"))]
    Kilogram,
    #[cfg_attr(feature = "serde", serde(rename = "g"))]
    Gram,
    #[cfg_attr(feature = "serde", serde(rename = "lb"))]
    Pound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VolumeUnit {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "m3"))]
    CubicMeter,
    #[cfg_attr(feature = "serde", serde(rename = "L"))]
    Liter,
    #[cfg_attr(feature = "serde", serde(rename = "ft3"))]
    CubicFoot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EnergyUnit {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "kJ"))]
    KiloJoule,
    #[cfg_attr(feature = "serde", serde(rename = "J"))]
    Joule,
    #[cfg_attr(feature = "serde", serde(rename = "BTU"))]
    Btu,
}

impl TemperatureUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Kelvin => "K",
            Self::Fahrenheit => "F",
        }
    }

    fn quantity(self, v: f64) -> Temperature {
        use thermodynamic_temperature::{degree_celsius, degree_fahrenheit, kelvin};
        match self {
            Self::Celsius => Temperature::new::<degree_celsius>(v),
            Self::Kelvin => Temperature::new::<kelvin>(v),
            Self::Fahrenheit => Temperature::new::<degree_fahrenheit>(v),
        }
    }

    fn value_of(self, t: Temperature) -> f64 {
        use thermodynamic_temperature::{degree_celsius, degree_fahrenheit, kelvin};
        match self {
            Self::Celsius => t.get::<degree_celsius>(),
            Self::Kelvin => t.get::<kelvin>(),
            Self::Fahrenheit => t.get::<degree_fahrenheit>(),
        }
    }

    fn interval_of(self, dt: TempInterval) -> f64 {
        use temperature_interval::{degree_celsius, degree_fahrenheit, kelvin};
        match self {
            Self::Celsius => dt.get::<degree_celsius>(),
            Self::Kelvin => dt.get::<kelvin>(),
            Self::Fahrenheit => dt.get::<degree_fahrenheit>(),
        }
    }
}

impl PressureUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::MegaPascal => "MPa",
            Self::KiloPascal => "kPa",
            Self::Bar => "bar",
            Self::Atmosphere => "atm",
        }
    }

    fn quantity(self, v: f64) -> Pressure {
        use pressure::{atmosphere, bar, kilopascal, megapascal};
        match self {
            Self::MegaPascal => Pressure::new::<megapascal>(v),
            Self::KiloPascal => Pressure::new::<kilopascal>(v),
            Self::Bar => Pressure::new::<bar>(v),
            Self::Atmosphere => Pressure::new::<atmosphere>(v),
        }
    }

    fn value_of(self, p: Pressure) -> f64 {
        use pressure::{atmosphere, bar, kilopascal, megapascal};
        match self {
            Self::MegaPascal => p.get::<megapascal>(),
            Self::KiloPascal => p.get::<kilopascal>(),
            Self::Bar => p.get::<bar>(),
            Self::Atmosphere => p.get::<atmosphere>(),
        }
    }
}

impl MassUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Kilogram => "kg",
            Self::Gram => "g",
            Self::Pound => "lb",
        }
    }

    /// Size of one unit in kilograms.
    fn in_kilograms(self) -> f64 {
        use mass::{gram, kilogram, pound};
        let one = match self {
            Self::Kilogram => Mass::new::<kilogram>(1.0),
            Self::Gram => Mass::new::<gram>(1.0),
            Self::Pound => Mass::new::<pound>(1.0),
        };
        one.get::<kilogram>()
    }
}

impl VolumeUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::CubicMeter => "m3",
            Self::Liter => "L",
            Self::CubicFoot => "ft3",
        }
    }

    /// Size of one unit in cubic meters.
    fn in_cubic_meters(self) -> f64 {
        use volume::{cubic_foot, cubic_meter, liter};
        let one = match self {
            Self::CubicMeter => Volume::new::<cubic_meter>(1.0),
            Self::Liter => Volume::new::<liter>(1.0),
            Self::CubicFoot => Volume::new::<cubic_foot>(1.0),
        };
        one.get::<cubic_meter>()
    }
}

impl EnergyUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::KiloJoule => "kJ",
            Self::Joule => "J",
            Self::Btu => "BTU",
        }
    }

    /// Size of one unit in kilojoules.
    fn in_kilojoules(self) -> f64 {
        use energy::{btu_it, joule, kilojoule};
        let one = match self {
            Self::KiloJoule => Energy::new::<kilojoule>(1.0),
            Self::Joule => Energy::new::<joule>(1.0),
            Self::Btu => Energy::new::<btu_it>(1.0),
        };
        one.get::<kilojoule>()
    }
}

macro_rules! impl_unit_text {
    ($ty:ty, $quantity:literal, [$($variant:ident),+]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.symbol())
            }
        }

        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                [$(Self::$variant),+]
                    .into_iter()
                    .find(|unit| unit.symbol().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| CoreError::UnknownUnit {
                        quantity: $quantity,
                        unit: trimmed.to_string(),
                    })
            }
        }
    };
}

impl_unit_text!(TemperatureUnit, "temperature", [Celsius, Kelvin, Fahrenheit]);
impl_unit_text!(PressureUnit, "pressure", [MegaPascal, KiloPascal, Bar, Atmosphere]);
impl_unit_text!(MassUnit, "mass", [Kilogram, Gram, Pound]);
impl_unit_text!(VolumeUnit, "volume", [CubicMeter, Liter, CubicFoot]);
impl_unit_text!(EnergyUnit, "energy", [KiloJoule, Joule, Btu]);

/// Units in which a caller reads and writes state values.
///
/// Tables and resolution always work in the canonical units; the unit system
/// is applied only at the boundary. Entropy is always per kelvin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UnitSystem {
    pub temperature: TemperatureUnit,
    pub pressure: PressureUnit,
    pub mass: MassUnit,
    pub volume: VolumeUnit,
    pub energy: EnergyUnit,
}

impl UnitSystem {
    /// The unit system the tables are stored in.
    pub fn canonical() -> Self {
        Self::default()
    }

    /// Convert a value given in these units to the canonical unit.
    pub fn to_canonical(&self, dim: Dimension, value: f64) -> f64 {
        match dim {
            // Canonical units pass through untouched so tabulated nodes stay bit-exact.
            Dimension::Temperature if self.temperature == TemperatureUnit::Celsius => value,
            Dimension::Pressure if self.pressure == PressureUnit::MegaPascal => value,
            Dimension::Temperature => {
                TemperatureUnit::Celsius.value_of(self.temperature.quantity(value))
            }
            Dimension::Pressure => PressureUnit::MegaPascal.value_of(self.pressure.quantity(value)),
            Dimension::SpecificVolume => value * self.specific_volume_factor(),
            Dimension::SpecificEnergy | Dimension::SpecificEntropy => {
                value * self.specific_energy_factor()
            }
            Dimension::Fraction => value,
        }
    }

    /// Convert a canonical value to these units.
    pub fn to_display(&self, dim: Dimension, canonical: f64) -> f64 {
        match dim {
            Dimension::Temperature if self.temperature == TemperatureUnit::Celsius => canonical,
            Dimension::Pressure if self.pressure == PressureUnit::MegaPascal => canonical,
            Dimension::Temperature => self.temperature.value_of(celsius(canonical)),
            Dimension::Pressure => self.pressure.value_of(mpa(canonical)),
            Dimension::SpecificVolume => canonical / self.specific_volume_factor(),
            Dimension::SpecificEnergy | Dimension::SpecificEntropy => {
                canonical / self.specific_energy_factor()
            }
            Dimension::Fraction => canonical,
        }
    }

    /// Convert a canonical difference to these units (no temperature offset).
    pub fn interval_to_display(&self, dim: Dimension, delta: f64) -> f64 {
        match dim {
            Dimension::Temperature => {
                use temperature_interval::degree_celsius;
                self.temperature
                    .interval_of(TempInterval::new::<degree_celsius>(delta))
            }
            _ => self.to_display(dim, delta),
        }
    }

    /// Human-readable unit label, e.g. `kJ/kg-K`.
    pub fn label(&self, dim: Dimension) -> String {
        match dim {
            Dimension::Temperature => self.temperature.symbol().to_string(),
            Dimension::Pressure => self.pressure.symbol().to_string(),
            Dimension::SpecificVolume => format!("{}/{}", self.volume, self.mass),
            Dimension::SpecificEnergy => format!("{}/{}", self.energy, self.mass),
            Dimension::SpecificEntropy => format!("{}/{}-K", self.energy, self.mass),
            Dimension::Fraction => format!("{} vapor/{} total", self.mass, self.mass),
        }
    }

    // m³/kg per (volume unit / mass unit)
    fn specific_volume_factor(&self) -> f64 {
        self.volume.in_cubic_meters() / self.mass.in_kilograms()
    }

    // kJ/kg per (energy unit / mass unit)
    fn specific_energy_factor(&self) -> f64 {
        self.energy.in_kilojoules() / self.mass.in_kilograms()
    }
}

/// Parse a unit system from `key=value` pairs, e.g. `temperature=K,pressure=bar`.
impl FromStr for UnitSystem {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let mut units = Self::default();
        for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or(CoreError::InvalidArg {
                what: "unit overrides must look like key=value",
            })?;
            match key.trim().to_ascii_lowercase().as_str() {
                "temperature" | "t" => units.temperature = value.parse()?,
                "pressure" | "p" => units.pressure = value.parse()?,
                "mass" => units.mass = value.parse()?,
                "volume" => units.volume = value.parse()?,
                "energy" => units.energy = value.parse()?,
                _ => {
                    return Err(CoreError::InvalidArg {
                        what: "unknown unit key (expected temperature, pressure, mass, volume or energy)",
                    });
                }
            }
        }
        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{Tolerances, nearly_equal};

    fn close(a: f64, b: f64) -> bool {
        nearly_equal(
            a,
            b,
            Tolerances {
                abs: 1e-9,
                rel: 1e-9,
            },
        )
    }

    #[test]
    fn canonical_is_identity() {
        let units = UnitSystem::canonical();
        for dim in [
            Dimension::Temperature,
            Dimension::Pressure,
            Dimension::SpecificVolume,
            Dimension::SpecificEnergy,
            Dimension::SpecificEntropy,
        ] {
            assert!(close(units.to_canonical(dim, 12.5), 12.5));
            assert!(close(units.to_display(dim, 12.5), 12.5));
        }
    }

    #[test]
    fn temperature_offsets() {
        let units = UnitSystem {
            temperature: TemperatureUnit::Kelvin,
            ..UnitSystem::default()
        };
        assert!(close(units.to_canonical(Dimension::Temperature, 373.15), 100.0));
        assert!(close(units.to_display(Dimension::Temperature, 0.0), 273.15));

        let units = UnitSystem {
            temperature: TemperatureUnit::Fahrenheit,
            ..UnitSystem::default()
        };
        assert!(close(units.to_canonical(Dimension::Temperature, 212.0), 100.0));
        // Intervals scale without the offset
        assert!(close(units.interval_to_display(Dimension::Temperature, 10.0), 18.0));
    }

    #[test]
    fn pressure_units() {
        let units = UnitSystem {
            pressure: PressureUnit::KiloPascal,
            ..UnitSystem::default()
        };
        assert!(close(units.to_canonical(Dimension::Pressure, 100.0), 0.1));

        let units = UnitSystem {
            pressure: PressureUnit::Bar,
            ..UnitSystem::default()
        };
        assert!(close(units.to_display(Dimension::Pressure, 22.12), 221.2));
    }

    #[test]
    fn specific_quantities_use_mass_and_energy() {
        let units = UnitSystem {
            energy: EnergyUnit::Joule,
            mass: MassUnit::Gram,
            ..UnitSystem::default()
        };
        // 1 J/g == 1 kJ/kg
        assert!(close(units.to_canonical(Dimension::SpecificEnergy, 2675.5), 2675.5));

        let units = UnitSystem {
            volume: VolumeUnit::Liter,
            ..UnitSystem::default()
        };
        assert!(close(units.to_display(Dimension::SpecificVolume, 0.001043), 1.043));
    }

    #[test]
    fn labels() {
        let units = UnitSystem::default();
        assert_eq!(units.label(Dimension::SpecificEntropy), "kJ/kg-K");
        assert_eq!(units.label(Dimension::SpecificVolume), "m3/kg");
        assert_eq!(units.label(Dimension::Pressure), "MPa");
    }

    #[test]
    fn parse_unit_symbols() {
        assert_eq!("k".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Kelvin);
        assert_eq!("BAR".parse::<PressureUnit>().unwrap(), PressureUnit::Bar);
        assert!("psi".parse::<PressureUnit>().is_err());
    }

    #[test]
    fn parse_unit_system_overrides() {
        let units: UnitSystem = "temperature=K, pressure=kPa".parse().unwrap();
        assert_eq!(units.temperature, TemperatureUnit::Kelvin);
        assert_eq!(units.pressure, PressureUnit::KiloPascal);
        assert_eq!(units.energy, EnergyUnit::KiloJoule);

        assert!("temperature".parse::<UnitSystem>().is_err());
        assert!("colour=red".parse::<UnitSystem>().is_err());
    }
}

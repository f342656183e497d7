//! Signed differences between two resolved states.

use st_core::UnitSystem;
use st_tables::{Properties, Property};

/// `other - self` for every property, in the first state's display units.
///
/// Temperature differences are intervals: no offset is applied, so a
/// difference of 10 °C reads as 10 K or 18 °F.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    pub values: Properties,
    /// Present only when both states are two-phase.
    pub quality: Option<f64>,
}

impl Delta {
    pub(crate) fn between(
        units: &UnitSystem,
        (a, ax): (&Properties, Option<f64>),
        (b, bx): (&Properties, Option<f64>),
    ) -> Self {
        let mut values = Properties::default();
        for property in Property::ALL {
            let diff = b.get(property) - a.get(property);
            values.set(
                property,
                units.interval_to_display(property.dimension(), diff),
            );
        }
        let quality = ax.zip(bx).map(|(ax, bx)| bx - ax);
        Self { values, quality }
    }

    pub fn get(&self, property: Property) -> f64 {
        self.values.get(property)
    }

    /// The same differences with every sign flipped.
    pub fn negated(&self) -> Self {
        let mut values = Properties::default();
        for (property, value) in self.values.iter() {
            values.set(property, -value);
        }
        Self {
            values,
            quality: self.quality.map(|x| -x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use st_core::TemperatureUnit;

    #[test]
    fn temperature_difference_is_an_interval() {
        let a = Properties::from_array([100.0, 0.1, 1.0, 2500.0, 2700.0, 7.0]);
        let b = Properties::from_array([110.0, 0.2, 1.5, 2510.0, 2720.0, 7.1]);
        let units = UnitSystem {
            temperature: TemperatureUnit::Fahrenheit,
            ..UnitSystem::default()
        };
        let delta = Delta::between(&units, (&a, None), (&b, Some(0.5)));
        assert!((delta.get(Property::T) - 18.0).abs() < 1e-9);
        assert!((delta.get(Property::H) - 20.0).abs() < 1e-9);
        assert_eq!(delta.quality, None);
    }

    #[test]
    fn negation_flips_quality() {
        let a = Properties::from_array([100.0, 0.1, 1.0, 2500.0, 2700.0, 7.0]);
        let delta = Delta::between(&UnitSystem::default(), (&a, Some(0.2)), (&a, Some(0.7)));
        assert!((delta.quality.unwrap() - 0.5).abs() < 1e-12);
        assert!((delta.negated().quality.unwrap() + 0.5).abs() < 1e-12);
    }
}

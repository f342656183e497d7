//! Full (T, P, v, u, h, s) property records.

use crate::property::Property;

/// One complete state point in canonical units.
///
/// Used for grid rows, saturated end-points and resolved states alike.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Properties {
    pub t: f64,
    pub p: f64,
    pub v: f64,
    pub u: f64,
    pub h: f64,
    pub s: f64,
}

impl Properties {
    pub fn from_array(values: [f64; 6]) -> Self {
        let [t, p, v, u, h, s] = values;
        Self { t, p, v, u, h, s }
    }

    pub fn to_array(self) -> [f64; 6] {
        [self.t, self.p, self.v, self.u, self.h, self.s]
    }

    pub fn get(&self, property: Property) -> f64 {
        match property {
            Property::T => self.t,
            Property::P => self.p,
            Property::V => self.v,
            Property::U => self.u,
            Property::H => self.h,
            Property::S => self.s,
        }
    }

    pub fn set(&mut self, property: Property, value: f64) {
        let slot = match property {
            Property::T => &mut self.t,
            Property::P => &mut self.p,
            Property::V => &mut self.v,
            Property::U => &mut self.u,
            Property::H => &mut self.h,
            Property::S => &mut self.s,
        };
        *slot = value;
    }

    /// Linear blend `a + frac * (b - a)` of every property.
    pub fn lerp(a: &Properties, b: &Properties, frac: f64) -> Properties {
        let a = a.to_array();
        let b = b.to_array();
        Properties::from_array(std::array::from_fn(|i| {
            if frac == 0.0 {
                a[i]
            } else if frac == 1.0 {
                b[i]
            } else {
                a[i] + frac * (b[i] - a[i])
            }
        }))
    }

    /// Lever rule `x * vapor + (1 - x) * liquid`.
    ///
    /// T and P are shared by both end-points and are taken from the liquid.
    pub fn lever(liquid: &Properties, vapor: &Properties, x: f64) -> Properties {
        let mut mix = Properties::lerp(liquid, vapor, x);
        mix.t = liquid.t;
        mix.p = liquid.p;
        mix
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, f64)> + '_ {
        Property::ALL.into_iter().map(move |p| (p, self.get(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn liquid() -> Properties {
        Properties::from_array([99.63, 0.1, 0.001043, 417.36, 417.46, 1.3026])
    }

    fn vapor() -> Properties {
        Properties::from_array([99.63, 0.1, 1.6940, 2506.1, 2675.5, 7.3594])
    }

    #[test]
    fn get_set_roundtrip() {
        let mut props = Properties::default();
        for (i, p) in Property::ALL.into_iter().enumerate() {
            props.set(p, i as f64 + 0.5);
        }
        assert_eq!(props.to_array(), [0.5, 1.5, 2.5, 3.5, 4.5, 5.5]);
        assert_eq!(props.get(Property::H), 4.5);
    }

    #[test]
    fn lerp_endpoints_are_exact() {
        let (l, v) = (liquid(), vapor());
        assert_eq!(Properties::lerp(&l, &v, 0.0), l);
        assert_eq!(Properties::lerp(&l, &v, 1.0), v);
    }

    #[test]
    fn lever_rule_mixes_theta_only() {
        let mix = Properties::lever(&liquid(), &vapor(), 0.5);
        assert_eq!(mix.t, 99.63);
        assert_eq!(mix.p, 0.1);
        assert!((mix.h - 0.5 * (417.46 + 2675.5)).abs() < 1e-9);
    }
}

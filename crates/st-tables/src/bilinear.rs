//! Two-variable interpolation over a single-phase grid.
//!
//! Pressure blocks are irregular: each block has its own temperature rows,
//! so every case reduces to one-dimensional lookups inside blocks (or along
//! isotherms) followed by a blend across the two bracketing lines.

use st_core::{Tolerances, nearly_equal};
use tracing::trace;

use crate::error::{TableError, TableResult};
use crate::grid::{PressureBlock, SinglePhaseGrid};
use crate::interp::locate;
use crate::properties::Properties;
use crate::property::Property;

/// A validated pair of independent inputs for a grid lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputPair {
    TemperaturePressure { t: f64, p: f64 },
    TemperatureTheta { t: f64, theta: Property, value: f64 },
    PressureTheta { p: f64, theta: Property, value: f64 },
    ThetaTheta {
        first: (Property, f64),
        second: (Property, f64),
    },
}

impl InputPair {
    /// Classify two (property, value) inputs. Order does not matter.
    pub fn new(a: (Property, f64), b: (Property, f64)) -> TableResult<Self> {
        if a.0 == b.0 {
            return Err(TableError::DuplicateInput {
                property: a.0.symbol(),
            });
        }
        let (a, b) = if a.0 <= b.0 { (a, b) } else { (b, a) };
        Ok(match (a, b) {
            ((Property::T, t), (Property::P, p)) => InputPair::TemperaturePressure { t, p },
            ((Property::T, t), (theta, value)) => InputPair::TemperatureTheta { t, theta, value },
            ((Property::P, p), (theta, value)) => InputPair::PressureTheta { p, theta, value },
            (first, second) => InputPair::ThetaTheta { first, second },
        })
    }

    pub fn inputs(&self) -> [(Property, f64); 2] {
        match *self {
            InputPair::TemperaturePressure { t, p } => [(Property::T, t), (Property::P, p)],
            InputPair::TemperatureTheta { t, theta, value } => [(Property::T, t), (theta, value)],
            InputPair::PressureTheta { p, theta, value } => [(Property::P, p), (theta, value)],
            InputPair::ThetaTheta { first, second } => [first, second],
        }
    }
}

/// Rows of the grid sharing one tabulated temperature, ordered by pressure.
struct Isotherm {
    t: f64,
    rows: Vec<Properties>,
}

impl SinglePhaseGrid {
    /// Interpolate a full state from an input pair.
    ///
    /// Grid nodes are reproduced exactly. Inputs outside the grid's envelope fail
    /// with `OutOfRange`; inputs inside it that no pair of table lines brackets
    /// fail with `NoBracket`.
    pub fn bilinear(&self, pair: InputPair) -> TableResult<Properties> {
        for (property, value) in pair.inputs() {
            self.check_envelope(property, value)?;
        }
        let mut props = match pair {
            InputPair::TemperaturePressure { t, p } => self.at_temperature_pressure(t, p)?,
            InputPair::TemperatureTheta { t, theta, value } => {
                self.at_temperature_theta(t, theta, value)?
            }
            InputPair::PressureTheta { p, theta, value } => {
                self.at_pressure_theta(p, theta, value)?
            }
            InputPair::ThetaTheta { first, second } => self.at_theta_theta(first, second)?,
        };
        for (property, value) in pair.inputs() {
            props.set(property, value);
        }
        Ok(props)
    }

    fn at_temperature_pressure(&self, t: f64, p: f64) -> TableResult<Properties> {
        if let Some(block) = self.block_exact(p) {
            return block
                .at_temperature(t)
                .ok_or_else(|| TableError::no_bracket(format!("T = {t} in block P = {p}")));
        }
        let bp = self
            .bracket_blocks(p)
            .ok_or_else(|| TableError::no_bracket(format!("blocks around P = {p}")))?;
        let (a, b) = (&self.blocks()[bp.lo], &self.blocks()[bp.hi]);
        let common = Self::common_rows(a, b);
        let temps: Vec<f64> = common.iter().map(|c| c.0).collect();
        let bt = locate(&temps, t).ok_or_else(|| {
            TableError::no_bracket(format!(
                "T = {t} among temperatures shared by P = {} and P = {}",
                a.pressure, b.pressure
            ))
        })?;
        let (lo, hi) = (common[bt.lo], common[bt.hi]);
        let at_a = Properties::lerp(&a.rows[lo.1], &a.rows[hi.1], bt.frac);
        let at_b = Properties::lerp(&b.rows[lo.2], &b.rows[hi.2], bt.frac);
        trace!(t, p, p_lo = a.pressure, p_hi = b.pressure, "bilinear (T, P)");
        Ok(Properties::lerp(&at_a, &at_b, bp.frac))
    }

    fn at_temperature_theta(&self, t: f64, theta: Property, value: f64) -> TableResult<Properties> {
        // Decreasing pressure: the sweep walks away from saturation in superheated vapor.
        let line: Vec<Properties> = self
            .blocks()
            .iter()
            .rev()
            .filter_map(|b| b.at_temperature(t))
            .collect();
        bracket_line(&line, theta, value).ok_or_else(|| {
            TableError::no_bracket(format!("{theta} = {value} along the T = {t} isotherm"))
        })
    }

    fn at_pressure_theta(&self, p: f64, theta: Property, value: f64) -> TableResult<Properties> {
        let missing = || TableError::no_bracket(format!("{theta} = {value} at P = {p}"));
        if let Some(block) = self.block_exact(p) {
            return block.at(theta, value).ok_or_else(missing);
        }
        let bp = self
            .bracket_blocks(p)
            .ok_or_else(|| TableError::no_bracket(format!("blocks around P = {p}")))?;
        let blocks = self.blocks();
        let at_a = blocks[bp.lo].at(theta, value).ok_or_else(missing)?;
        let at_b = blocks[bp.hi].at(theta, value).ok_or_else(missing)?;
        Ok(Properties::lerp(&at_a, &at_b, bp.frac))
    }

    fn at_theta_theta(
        &self,
        (p1, v1): (Property, f64),
        (p2, v2): (Property, f64),
    ) -> TableResult<Properties> {
        let isotherms = self.isotherms();
        let along_isotherms: Vec<Properties> = isotherms
            .iter()
            .filter_map(|iso| {
                let bracket = locate(&column(&iso.rows, p1), v1)?;
                let mut row =
                    Properties::lerp(&iso.rows[bracket.lo], &iso.rows[bracket.hi], bracket.frac);
                row.t = iso.t;
                Some(row)
            })
            .collect();
        if let Some(props) = bracket_line(&along_isotherms, p2, v2) {
            return Ok(props);
        }
        trace!(%p1, %p2, "isotherms too sparse, sweeping isobars");
        let along_isobars: Vec<Properties> = self
            .blocks()
            .iter()
            .filter_map(|b: &PressureBlock| b.at(p1, v1))
            .collect();
        bracket_line(&along_isobars, p2, v2).ok_or_else(|| {
            TableError::no_bracket(format!("{p1} = {v1} and {p2} = {v2}"))
        })
    }

    /// Distinct tabulated temperatures with at least two pressures, ascending.
    fn isotherms(&self) -> Vec<Isotherm> {
        let tol = Tolerances::default();
        let mut temps: Vec<f64> = self
            .blocks()
            .iter()
            .flat_map(|b| b.rows.iter().map(|r| r.t))
            .collect();
        temps.sort_by(f64::total_cmp);
        temps.dedup_by(|a, b| nearly_equal(*a, *b, tol));
        temps
            .into_iter()
            .filter_map(|t| {
                let rows: Vec<Properties> = self
                    .blocks()
                    .iter()
                    .filter_map(|b| b.rows.iter().find(|r| nearly_equal(r.t, t, tol)).copied())
                    .collect();
                (rows.len() >= 2).then_some(Isotherm { t, rows })
            })
            .collect()
    }
}

fn column(rows: &[Properties], property: Property) -> Vec<f64> {
    rows.iter().map(|r| r.get(property)).collect()
}

/// Blend the first consecutive pair of `line` whose `property` brackets `value`.
fn bracket_line(line: &[Properties], property: Property, value: f64) -> Option<Properties> {
    let bracket = locate(&column(line, property), value)?;
    Some(Properties::lerp(
        &line[bracket.lo],
        &line[bracket.hi],
        bracket.frac,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_pair_is_order_independent() {
        let a = InputPair::new((Property::P, 0.1), (Property::T, 300.0)).unwrap();
        assert_eq!(a, InputPair::TemperaturePressure { t: 300.0, p: 0.1 });

        let b = InputPair::new((Property::S, 7.5), (Property::H, 3500.0)).unwrap();
        assert_eq!(
            b,
            InputPair::ThetaTheta {
                first: (Property::H, 3500.0),
                second: (Property::S, 7.5)
            }
        );

        let c = InputPair::new((Property::V, 0.5), (Property::P, 1.0)).unwrap();
        assert!(matches!(
            c,
            InputPair::PressureTheta {
                theta: Property::V,
                ..
            }
        ));
    }

    #[test]
    fn input_pair_rejects_duplicates() {
        assert_eq!(
            InputPair::new((Property::H, 1.0), (Property::H, 2.0)),
            Err(TableError::DuplicateInput { property: "h" })
        );
    }
}

//! Saturation curve: liquid/vapor end-points indexed by T and by P.

use serde::Deserialize;

use crate::error::{TableError, TableResult};
use crate::properties::Properties;
use crate::property::{Axis, Phase, Property, SatKey};

const TABLE: &str = "saturated";

/// One tabulated point on the saturation curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationRow {
    pub liquid: Properties,
    pub vapor: Properties,
}

impl SaturationRow {
    /// Build from `[T, P, vL, vV, uL, uV, hL, hV, sL, sV]`.
    pub fn from_columns(c: [f64; 10]) -> Self {
        let [t, p, vl, vv, ul, uv, hl, hv, sl, sv] = c;
        Self {
            liquid: Properties {
                t,
                p,
                v: vl,
                u: ul,
                h: hl,
                s: sl,
            },
            vapor: Properties {
                t,
                p,
                v: vv,
                u: uv,
                h: hv,
                s: sv,
            },
        }
    }

    pub fn t(&self) -> f64 {
        self.liquid.t
    }

    pub fn p(&self) -> f64 {
        self.liquid.p
    }

    pub fn phase(&self, phase: Phase) -> &Properties {
        match phase {
            Phase::Liquid => &self.liquid,
            Phase::Vapor => &self.vapor,
        }
    }

    pub fn value(&self, key: SatKey) -> f64 {
        match key.phase {
            Some(phase) => self.phase(phase).get(key.property),
            None => self.liquid.get(key.property),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawSaturation {
    by_temperature: Vec<[f64; 10]>,
    by_pressure: Vec<[f64; 10]>,
}

/// The two saturation tables (T-indexed and P-indexed).
#[derive(Debug, Clone)]
pub struct SaturationTable {
    by_temperature: Vec<SaturationRow>,
    by_pressure: Vec<SaturationRow>,
}

impl SaturationTable {
    pub fn new(
        by_temperature: Vec<SaturationRow>,
        by_pressure: Vec<SaturationRow>,
    ) -> TableResult<Self> {
        validate(&by_temperature, Axis::Temperature)?;
        validate(&by_pressure, Axis::Pressure)?;
        Ok(Self {
            by_temperature,
            by_pressure,
        })
    }

    pub fn from_json(text: &str) -> TableResult<Self> {
        let raw: RawSaturation = serde_json::from_str(text)
            .map_err(|e| TableError::malformed(TABLE, e.to_string()))?;
        Self::new(
            raw.by_temperature
                .into_iter()
                .map(SaturationRow::from_columns)
                .collect(),
            raw.by_pressure
                .into_iter()
                .map(SaturationRow::from_columns)
                .collect(),
        )
    }

    pub fn rows(&self, axis: Axis) -> &[SaturationRow] {
        match axis {
            Axis::Temperature => &self.by_temperature,
            Axis::Pressure => &self.by_pressure,
        }
    }

    /// Abscissa of the table indexed by `axis`.
    pub fn axis_values(&self, axis: Axis) -> Vec<f64> {
        let property = axis.property();
        self.rows(axis)
            .iter()
            .map(|r| r.liquid.get(property))
            .collect()
    }

    pub fn column(&self, axis: Axis, key: SatKey) -> Vec<f64> {
        self.rows(axis).iter().map(|r| r.value(key)).collect()
    }

    /// Smallest and largest tabulated value of `property` over both indexes and phases.
    pub fn limits(&self, property: Property) -> (f64, f64) {
        self.by_temperature
            .iter()
            .chain(&self.by_pressure)
            .flat_map(|r| [r.liquid.get(property), r.vapor.get(property)])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }
}

fn validate(rows: &[SaturationRow], axis: Axis) -> TableResult<()> {
    let index = axis.property();
    if rows.len() < 2 {
        return Err(TableError::malformed(
            TABLE,
            format!("{index}-indexed table needs at least two rows"),
        ));
    }
    for row in rows {
        let finite = row
            .liquid
            .iter()
            .chain(row.vapor.iter())
            .all(|(_, v)| v.is_finite());
        if !finite {
            return Err(TableError::malformed(
                TABLE,
                format!("non-finite value at {index} = {}", row.liquid.get(index)),
            ));
        }
        for theta in Property::THETA {
            if row.liquid.get(theta) > row.vapor.get(theta) {
                return Err(TableError::malformed(
                    TABLE,
                    format!(
                        "{theta}L exceeds {theta}V at {index} = {}",
                        row.liquid.get(index)
                    ),
                ));
            }
        }
    }
    if let Some(w) = rows
        .windows(2)
        .find(|w| w[0].liquid.get(index) >= w[1].liquid.get(index))
    {
        return Err(TableError::malformed(
            TABLE,
            format!(
                "{index} not ascending at {} -> {}",
                w[0].liquid.get(index),
                w[1].liquid.get(index)
            ),
        ));
    }
    Ok(())
}

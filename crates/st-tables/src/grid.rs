//! Single-phase grids: pressure blocks of ascending-temperature rows.

use serde::Deserialize;
use st_core::{Tolerances, nearly_equal, within};

use crate::error::{TableError, TableResult};
use crate::interp::{Bracket, locate};
use crate::properties::Properties;
use crate::property::{Axis, Property, Region};

/// All rows tabulated at one pressure.
#[derive(Debug, Clone, PartialEq)]
pub struct PressureBlock {
    pub pressure: f64,
    /// Saturation temperature when the block includes a "Sat." row.
    pub saturation_temperature: Option<f64>,
    pub rows: Vec<Properties>,
}

impl PressureBlock {
    pub fn temperatures(&self) -> Vec<f64> {
        self.column(Property::T)
    }

    pub fn column(&self, property: Property) -> Vec<f64> {
        self.rows.iter().map(|r| r.get(property)).collect()
    }

    pub fn covers(&self, t: f64) -> bool {
        locate(&self.temperatures(), t).is_some()
    }

    /// Interpolate this block's rows so that `property` equals `value`.
    ///
    /// Temperature and theta columns are monotonic inside a block, so the
    /// first bracketing segment is the only one.
    pub fn at(&self, property: Property, value: f64) -> Option<Properties> {
        let bracket = locate(&self.column(property), value)?;
        let mut row = self.blend(bracket);
        row.set(property, value);
        Some(row)
    }

    pub fn at_temperature(&self, t: f64) -> Option<Properties> {
        self.at(Property::T, t)
    }

    fn blend(&self, bracket: Bracket) -> Properties {
        Properties::lerp(&self.rows[bracket.lo], &self.rows[bracket.hi], bracket.frac)
    }
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    #[serde(rename = "P")]
    pressure: f64,
    #[serde(rename = "Tsat", default)]
    saturation_temperature: Option<f64>,
    rows: Vec<[f64; 5]>,
}

#[derive(Debug, Deserialize)]
struct RawGrid {
    blocks: Vec<RawBlock>,
}

/// Superheated or subcooled table.
#[derive(Debug, Clone)]
pub struct SinglePhaseGrid {
    region: Region,
    blocks: Vec<PressureBlock>,
}

impl SinglePhaseGrid {
    pub fn new(region: Region, blocks: Vec<PressureBlock>) -> TableResult<Self> {
        let table = region.label();
        if region == Region::Saturated {
            return Err(TableError::malformed(table, "grid must be single-phase"));
        }
        if blocks.is_empty() {
            return Err(TableError::malformed(table, "no pressure blocks"));
        }
        if let Some(w) = blocks.windows(2).find(|w| w[0].pressure >= w[1].pressure) {
            return Err(TableError::malformed(
                table,
                format!("P not ascending at {} -> {}", w[0].pressure, w[1].pressure),
            ));
        }
        let tol = Tolerances::default();
        for block in &blocks {
            let p = block.pressure;
            if block.rows.is_empty() {
                return Err(TableError::malformed(table, format!("empty block at P = {p}")));
            }
            if block
                .rows
                .iter()
                .any(|r| r.iter().any(|(_, v)| !v.is_finite()) || r.p != p)
            {
                return Err(TableError::malformed(
                    table,
                    format!("non-finite or misplaced row at P = {p}"),
                ));
            }
            if block.rows.windows(2).any(|w| w[0].t >= w[1].t) {
                return Err(TableError::malformed(
                    table,
                    format!("T not ascending at P = {p}"),
                ));
            }
            if let Some(tsat) = block.saturation_temperature {
                // Superheated blocks start at saturation, subcooled blocks end there.
                let edge = match region {
                    Region::Subcooled => block.rows[block.rows.len() - 1].t,
                    _ => block.rows[0].t,
                };
                if !nearly_equal(edge, tsat, tol) {
                    return Err(TableError::malformed(
                        table,
                        format!("Sat. row at P = {p} is not at the saturation edge"),
                    ));
                }
            }
        }
        Ok(Self { region, blocks })
    }

    /// Parse `{"blocks": [{"P": .., "Tsat": .., "rows": [[T, v, u, h, s], ..]}]}`.
    pub fn from_json(region: Region, text: &str) -> TableResult<Self> {
        let raw: RawGrid = serde_json::from_str(text)
            .map_err(|e| TableError::malformed(region.label(), e.to_string()))?;
        let blocks = raw
            .blocks
            .into_iter()
            .map(|b| PressureBlock {
                pressure: b.pressure,
                saturation_temperature: b.saturation_temperature,
                rows: b
                    .rows
                    .into_iter()
                    .map(|[t, v, u, h, s]| Properties {
                        t,
                        p: b.pressure,
                        v,
                        u,
                        h,
                        s,
                    })
                    .collect(),
            })
            .collect();
        Self::new(region, blocks)
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn blocks(&self) -> &[PressureBlock] {
        &self.blocks
    }

    pub fn pressures(&self) -> Vec<f64> {
        self.blocks.iter().map(|b| b.pressure).collect()
    }

    pub fn row_count(&self) -> usize {
        self.blocks.iter().map(|b| b.rows.len()).sum()
    }

    pub fn limits(&self, property: Property) -> (f64, f64) {
        self.blocks
            .iter()
            .flat_map(|b| b.rows.iter().map(move |r| r.get(property)))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Fail with `OutOfRange` when `value` lies outside this grid's span of `property`.
    pub fn check_envelope(&self, property: Property, value: f64) -> TableResult<()> {
        let (min, max) = self.limits(property);
        if within(value, min, max, Tolerances::NODE) {
            Ok(())
        } else {
            Err(TableError::OutOfRange {
                what: property.symbol(),
                value,
                min,
                max,
            })
        }
    }

    pub fn block_exact(&self, p: f64) -> Option<&PressureBlock> {
        let tol = Tolerances::default();
        self.blocks.iter().find(|b| nearly_equal(b.pressure, p, tol))
    }

    pub fn bracket_blocks(&self, p: f64) -> Option<Bracket> {
        locate(&self.pressures(), p)
    }

    /// Rows sharing a tabulated temperature in two blocks: `(T, row in a, row in b)`.
    pub(crate) fn common_rows(a: &PressureBlock, b: &PressureBlock) -> Vec<(f64, usize, usize)> {
        let tol = Tolerances::default();
        a.rows
            .iter()
            .enumerate()
            .filter_map(|(i, ra)| {
                b.rows
                    .iter()
                    .position(|rb| nearly_equal(ra.t, rb.t, tol))
                    .map(|j| (ra.t, i, j))
            })
            .collect()
    }

    /// Tabulated row closest to saturation at a given T or P.
    ///
    /// On the pressure axis this is the lowest (superheated) or highest
    /// (subcooled) temperature available at `value`, interpolated between
    /// blocks when `value` is not a tabulated pressure. On the temperature
    /// axis it is the highest (superheated) or lowest (subcooled) pressure
    /// block that covers `value`.
    pub fn edge_row(&self, axis: Axis, value: f64) -> TableResult<Properties> {
        let superheated = self.region == Region::Superheated;
        self.check_envelope(axis.property(), value)?;
        match axis {
            Axis::Pressure => {
                if let Some(block) = self.block_exact(value) {
                    let row = if superheated {
                        block.rows.first()
                    } else {
                        block.rows.last()
                    };
                    return row.copied().ok_or_else(|| {
                        TableError::no_bracket(format!("edge row at P = {value}"))
                    });
                }
                let bp = self
                    .bracket_blocks(value)
                    .ok_or_else(|| TableError::no_bracket(format!("blocks around P = {value}")))?;
                let (a, b) = (&self.blocks[bp.lo], &self.blocks[bp.hi]);
                let common = Self::common_rows(a, b);
                let edge = if superheated {
                    common.first()
                } else {
                    common.last()
                };
                let &(_, i, j) = edge.ok_or_else(|| {
                    TableError::no_bracket(format!("common temperatures around P = {value}"))
                })?;
                let mut row = Properties::lerp(&a.rows[i], &b.rows[j], bp.frac);
                row.p = value;
                Ok(row)
            }
            Axis::Temperature => {
                let mut covering = self.blocks.iter().filter(|b| b.covers(value));
                let block = if superheated {
                    covering.next_back()
                } else {
                    covering.next()
                };
                block
                    .and_then(|b| b.at_temperature(value))
                    .ok_or_else(|| TableError::no_bracket(format!("edge row at T = {value}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(p: f64, tsat: Option<f64>, rows: &[[f64; 5]]) -> PressureBlock {
        PressureBlock {
            pressure: p,
            saturation_temperature: tsat,
            rows: rows
                .iter()
                .map(|&[t, v, u, h, s]| Properties { t, p, v, u, h, s })
                .collect(),
        }
    }

    fn small_grid() -> SinglePhaseGrid {
        SinglePhaseGrid::new(
            Region::Superheated,
            vec![
                block(
                    0.1,
                    Some(99.63),
                    &[
                        [99.63, 1.6940, 2506.1, 2675.5, 7.3594],
                        [150.0, 1.9364, 2582.8, 2776.4, 7.6134],
                        [200.0, 2.172, 2658.1, 2875.3, 7.8343],
                    ],
                ),
                block(
                    0.2,
                    Some(120.23),
                    &[
                        [120.23, 0.8857, 2529.5, 2706.7, 7.1271],
                        [150.0, 0.9596, 2576.9, 2768.8, 7.2795],
                        [200.0, 1.0803, 2654.4, 2870.5, 7.5066],
                    ],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn block_lookup_by_temperature() {
        let grid = small_grid();
        let row = grid.blocks()[0].at_temperature(175.0).unwrap();
        assert!((row.h - 0.5 * (2776.4 + 2875.3)).abs() < 1e-9);
        assert_eq!(row.p, 0.1);
        assert!(grid.blocks()[1].at_temperature(110.0).is_none());
    }

    #[test]
    fn limits_and_envelope() {
        let grid = small_grid();
        assert_eq!(grid.limits(Property::P), (0.1, 0.2));
        assert_eq!(grid.row_count(), 6);
        assert!(grid.check_envelope(Property::T, 200.0).is_ok());
        assert!(matches!(
            grid.check_envelope(Property::T, 250.0),
            Err(TableError::OutOfRange { what: "T", .. })
        ));
    }

    #[test]
    fn edge_row_on_pressure_axis() {
        let grid = small_grid();
        assert_eq!(grid.edge_row(Axis::Pressure, 0.2).unwrap().t, 120.23);

        // Between blocks the lowest common temperature is 150.
        let row = grid.edge_row(Axis::Pressure, 0.15).unwrap();
        assert_eq!(row.t, 150.0);
        assert_eq!(row.p, 0.15);
        assert!((row.h - 0.5 * (2776.4 + 2768.8)).abs() < 1e-9);
    }

    #[test]
    fn edge_row_on_temperature_axis_picks_highest_covering_pressure() {
        let grid = small_grid();
        assert_eq!(grid.edge_row(Axis::Temperature, 130.0).unwrap().p, 0.2);
        assert_eq!(grid.edge_row(Axis::Temperature, 110.0).unwrap().p, 0.1);
    }

    #[test]
    fn rejects_bad_grids() {
        let err = SinglePhaseGrid::new(
            Region::Superheated,
            vec![
                block(0.2, None, &[[150.0, 1.0, 2500.0, 2700.0, 7.0]]),
                block(0.1, None, &[[150.0, 1.0, 2500.0, 2700.0, 7.0]]),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("P not ascending"));

        let err = SinglePhaseGrid::new(
            Region::Subcooled,
            vec![block(
                5.0,
                Some(263.99),
                &[[263.99, 0.001286, 1147.81, 1154.23, 2.9202], [260.0, 0.0012749, 1127.9, 1134.3, 2.8830]],
            )],
        )
        .unwrap_err();
        assert!(matches!(err, TableError::Malformed { table: "subcooled", .. }));
    }

    #[test]
    fn parses_json_blocks() {
        let grid = SinglePhaseGrid::from_json(
            Region::Subcooled,
            r#"{"blocks": [{"P": 30.0, "Tsat": null, "rows": [[0, 0.0009856, 0.25, 29.82, 0.0001], [20, 0.0009886, 82.17, 111.84, 0.2899]]}]}"#,
        )
        .unwrap();
        assert_eq!(grid.blocks()[0].saturation_temperature, None);
        assert_eq!(grid.blocks()[0].rows[1].p, 30.0);
    }
}

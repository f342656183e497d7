//! Immutable table store shared by every state.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{TableError, TableResult};
use crate::grid::SinglePhaseGrid;
use crate::interp::Interp1d;
use crate::properties::Properties;
use crate::property::{Axis, Phase, Property, Region, SatKey};
use crate::saturation::SaturationTable;

const SATURATED_FILE: &str = "saturated.json";
const SUPERHEATED_FILE: &str = "superheated.json";
const SUBCOOLED_FILE: &str = "subcooled.json";

/// Saturation table, both single-phase grids and the saturation interpolators.
///
/// Built once; read-only afterwards. Share it between states with `Arc`.
#[derive(Debug, Clone)]
pub struct TableStore {
    saturation: SaturationTable,
    superheated: SinglePhaseGrid,
    subcooled: SinglePhaseGrid,
    interpolators: HashMap<(Axis, SatKey), Interp1d>,
}

impl TableStore {
    pub fn new(
        saturation: SaturationTable,
        superheated: SinglePhaseGrid,
        subcooled: SinglePhaseGrid,
    ) -> TableResult<Self> {
        if superheated.region() != Region::Superheated || subcooled.region() != Region::Subcooled
        {
            return Err(TableError::malformed(
                "single-phase",
                "grids passed in the wrong order",
            ));
        }
        let mut interpolators = HashMap::new();
        for axis in [Axis::Temperature, Axis::Pressure] {
            let x = saturation.axis_values(axis);
            let keys = std::iter::once(SatKey::complement(axis)).chain(
                Property::THETA.into_iter().flat_map(|theta| {
                    [Phase::Liquid, Phase::Vapor].map(|phase| SatKey::phase(theta, phase))
                }),
            );
            for key in keys {
                let y = saturation.column(axis, key);
                let f = Interp1d::new(axis.property().symbol(), x.clone(), y)?;
                interpolators.insert((axis, key), f);
            }
        }
        info!(
            saturated_by_t = saturation.rows(Axis::Temperature).len(),
            saturated_by_p = saturation.rows(Axis::Pressure).len(),
            superheated_blocks = superheated.blocks().len(),
            superheated_rows = superheated.row_count(),
            subcooled_blocks = subcooled.blocks().len(),
            subcooled_rows = subcooled.row_count(),
            "steam tables loaded"
        );
        Ok(Self {
            saturation,
            superheated,
            subcooled,
            interpolators,
        })
    }

    /// Store built from the tables compiled into this crate.
    pub fn bundled() -> TableResult<Self> {
        Self::from_json(
            include_str!("../data/saturated.json"),
            include_str!("../data/superheated.json"),
            include_str!("../data/subcooled.json"),
        )
    }

    /// Store built from canonical-unit JSON documents.
    pub fn from_json(saturated: &str, superheated: &str, subcooled: &str) -> TableResult<Self> {
        Self::new(
            SaturationTable::from_json(saturated)?,
            SinglePhaseGrid::from_json(Region::Superheated, superheated)?,
            SinglePhaseGrid::from_json(Region::Subcooled, subcooled)?,
        )
    }

    /// Store built from `saturated.json`, `superheated.json` and `subcooled.json` in `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> TableResult<Self> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read_to_string(&path).map_err(|e| TableError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        };
        Self::from_json(
            &read(SATURATED_FILE)?,
            &read(SUPERHEATED_FILE)?,
            &read(SUBCOOLED_FILE)?,
        )
    }

    pub fn saturation(&self) -> &SaturationTable {
        &self.saturation
    }

    /// The single-phase grid for `region`; `None` for the saturated region.
    pub fn grid(&self, region: Region) -> Option<&SinglePhaseGrid> {
        match region {
            Region::Superheated => Some(&self.superheated),
            Region::Subcooled => Some(&self.subcooled),
            Region::Saturated => None,
        }
    }

    /// Tabulated (min, max) of `property` in one table.
    pub fn limits(&self, source: Region, property: Property) -> (f64, f64) {
        match self.grid(source) {
            Some(grid) => grid.limits(property),
            None => self.saturation.limits(property),
        }
    }

    /// Tabulated (min, max) of `property` over all three tables.
    pub fn envelope(&self, property: Property) -> (f64, f64) {
        [Region::Saturated, Region::Superheated, Region::Subcooled]
            .into_iter()
            .map(|r| self.limits(r, property))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
                (lo.min(a), hi.max(b))
            })
    }

    /// Span of the saturation curve along `axis`.
    pub fn saturation_domain(&self, axis: Axis) -> TableResult<(f64, f64)> {
        Ok(self.interpolator(axis, SatKey::complement(axis))?.domain())
    }

    /// Whether `value` lies on the tabulated saturation curve along `axis`.
    pub fn on_saturation_curve(&self, axis: Axis, value: f64) -> bool {
        self.interpolators
            .get(&(axis, SatKey::complement(axis)))
            .is_some_and(|f| f.contains(value))
    }

    /// Evaluate the saturation column `key` at `value` on `axis`.
    pub fn interpolate(&self, axis: Axis, key: SatKey, value: f64) -> TableResult<f64> {
        self.interpolator(axis, key)?.eval(value)
    }

    /// Full liquid or vapor end-point at `value` on `axis`.
    pub fn saturated_endpoint(&self, axis: Axis, value: f64, phase: Phase) -> TableResult<Properties> {
        let mut props = Properties::default();
        props.set(axis.property(), value);
        props.set(
            axis.complement().property(),
            self.interpolate(axis, SatKey::complement(axis), value)?,
        );
        for theta in Property::THETA {
            props.set(theta, self.interpolate(axis, SatKey::phase(theta, phase), value)?);
        }
        Ok(props)
    }

    /// Liquid and vapor end-points at `value` on `axis`.
    pub fn saturated_endpoints(&self, axis: Axis, value: f64) -> TableResult<(Properties, Properties)> {
        Ok((
            self.saturated_endpoint(axis, value, Phase::Liquid)?,
            self.saturated_endpoint(axis, value, Phase::Vapor)?,
        ))
    }

    fn interpolator(&self, axis: Axis, key: SatKey) -> TableResult<&Interp1d> {
        self.interpolators
            .get(&(axis, key))
            .ok_or_else(|| TableError::no_bracket(format!("saturation column {key} on {}", axis.property())))
    }
}

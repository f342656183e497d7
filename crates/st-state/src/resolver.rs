//! Classification and dispatch of a specification to the saturation curve
//! or one of the single-phase grids.

use st_core::{Tolerances, ensure_finite, nearly_equal};
use st_tables::{
    Axis, InputPair, Phase, Properties, Property, Region, SatKey, SinglePhaseGrid, TableError,
    TableStore, locate,
};
use tracing::{debug, trace};

use crate::error::{StateError, StateResult};
use crate::inputs::Specification;

/// Saturated end-points a two-phase state was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoints {
    /// Axis the end-points were looked up on.
    pub axis: Axis,
    pub liquid: Properties,
    pub vapor: Properties,
}

/// A resolved state in canonical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub region: Region,
    pub properties: Properties,
    pub quality: Option<f64>,
    pub endpoints: Option<Endpoints>,
}

/// Stateless resolver over a borrowed table store.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    store: &'a TableStore,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a TableStore) -> Self {
        Self { store }
    }

    pub fn resolve(&self, spec: &Specification) -> StateResult<Outcome> {
        let outcome = if self.is_saturated(spec)? {
            debug!(?spec, "classified as saturated");
            self.resolve_saturated(spec)?
        } else {
            debug!(?spec, "classified as single-phase");
            self.resolve_unsaturated(spec)?
        };
        finalize(outcome)
    }

    /// Whether `spec` describes a two-phase state.
    ///
    /// A T or P anchor with a theta property is saturated only when theta lies
    /// strictly between the liquid and vapor values. Anchors at or above the
    /// critical point, or off the tabulated curve, are never saturated.
    pub fn is_saturated(&self, spec: &Specification) -> StateResult<bool> {
        match *spec {
            Specification::QualityAnchor { .. } | Specification::QualityTheta { .. } => Ok(true),
            Specification::Pair(pair) => match anchored_theta(pair) {
                Some((axis, anchor, theta, value)) => {
                    if axis.is_supercritical(anchor) || !self.store.on_saturation_curve(axis, anchor)
                    {
                        return Ok(false);
                    }
                    let (lo, hi) = self.theta_bounds(axis, anchor, theta)?;
                    Ok(lo.min(hi) < value && value < lo.max(hi))
                }
                None => Ok(false),
            },
        }
    }

    fn theta_bounds(&self, axis: Axis, anchor: f64, theta: Property) -> StateResult<(f64, f64)> {
        Ok((
            self.store
                .interpolate(axis, SatKey::phase(theta, Phase::Liquid), anchor)?,
            self.store
                .interpolate(axis, SatKey::phase(theta, Phase::Vapor), anchor)?,
        ))
    }

    fn resolve_unsaturated(&self, spec: &Specification) -> StateResult<Outcome> {
        let Specification::Pair(pair) = *spec else {
            return Err(StateError::specification(
                "quality was given for a single-phase state",
            ));
        };
        match pair {
            InputPair::TemperaturePressure { t, p } => {
                let region = self.temperature_pressure_region(t, p)?;
                debug!(t, p, %region, "dispatching (T, P)");
                let props = self.lookup_near_saturation(region, pair)?;
                Ok(single_phase(region, props))
            }
            InputPair::TemperatureTheta { .. } | InputPair::PressureTheta { .. } => {
                let Some((axis, anchor, theta, value)) = anchored_theta(pair) else {
                    return Err(StateError::specification("expected a T or P anchor"));
                };
                if axis.is_supercritical(anchor) {
                    let region = match axis {
                        Axis::Temperature => Region::Superheated,
                        Axis::Pressure => Region::Subcooled,
                    };
                    debug!(?axis, anchor, %region, "supercritical anchor");
                    return Ok(single_phase(region, self.grid(region)?.bilinear(pair)?));
                }
                if !self.store.on_saturation_curve(axis, anchor) {
                    debug!(?axis, anchor, "anchor off the saturation curve, trying both grids");
                    return self
                        .grid(Region::Superheated)?
                        .bilinear(pair)
                        .map(|props| single_phase(Region::Superheated, props))
                        .or_else(|_| -> StateResult<Outcome> {
                            let props = self.grid(Region::Subcooled)?.bilinear(pair)?;
                            Ok(single_phase(Region::Subcooled, props))
                        });
                }
                let (liquid, vapor) = self.theta_bounds(axis, anchor, theta)?;
                let region = if value <= liquid {
                    Region::Subcooled
                } else if value >= vapor {
                    Region::Superheated
                } else {
                    return Err(StateError::specification(format!(
                        "{theta} = {value} is saturated at {} = {anchor}",
                        axis.property()
                    )));
                };
                debug!(?axis, anchor, %theta, value, %region, "dispatching (T|P, theta)");
                let props = self.lookup_near_saturation(region, pair)?;
                Ok(single_phase(region, props))
            }
            InputPair::ThetaTheta { first, second } => {
                let superheated = self.grid(Region::Superheated)?.bilinear(pair);
                let subcooled = self.grid(Region::Subcooled)?.bilinear(pair);
                match (superheated, subcooled) {
                    (Ok(props), Err(_)) => Ok(single_phase(Region::Superheated, props)),
                    (Err(_), Ok(props)) => Ok(single_phase(Region::Subcooled, props)),
                    (Ok(_), Ok(_)) => Err(StateError::Ambiguous {
                        what: format!("{} = {}, {} = {}", first.0, first.1, second.0, second.1),
                    }),
                    (Err(a), Err(b)) => {
                        // Prefer the grid whose envelope contained the query.
                        let err = match (&a, &b) {
                            (TableError::OutOfRange { .. }, TableError::NoBracket { .. }) => b,
                            _ => a,
                        };
                        Err(err.into())
                    }
                }
            }
        }
    }

    /// Side of the saturation curve a (T, P) pair falls on.
    ///
    /// Below the curve's lowest temperature the state is liquid; above its
    /// highest it is vapor. Otherwise T is compared with Tsat(P) from the
    /// P-indexed curve, the same values the grids' saturation rows carry. A
    /// pair on the curve itself is two-valued and resolves to saturated vapor.
    /// Pressures off the P-indexed curve are compared with Psat(T) instead.
    fn temperature_pressure_region(&self, t: f64, p: f64) -> StateResult<Region> {
        if !self.store.on_saturation_curve(Axis::Temperature, t) {
            let (t_min, _) = self.store.saturation_domain(Axis::Temperature)?;
            return Ok(if t < t_min {
                Region::Subcooled
            } else {
                Region::Superheated
            });
        }
        if self.store.on_saturation_curve(Axis::Pressure, p) {
            let t_sat = self
                .store
                .interpolate(Axis::Pressure, SatKey::complement(Axis::Pressure), p)?;
            let liquid = t < t_sat && !nearly_equal(t, t_sat, Tolerances::NODE);
            trace!(t, p, t_sat, "(T, P) against Tsat(P)");
            return Ok(if liquid {
                Region::Subcooled
            } else {
                Region::Superheated
            });
        }
        let p_sat = self
            .store
            .interpolate(Axis::Temperature, SatKey::complement(Axis::Temperature), t)?;
        trace!(t, p, p_sat, "(T, P) against Psat(T)");
        Ok(if p > p_sat {
            Region::Subcooled
        } else {
            Region::Superheated
        })
    }

    /// Grid lookup with the near-saturation fallback.
    ///
    /// Points between the saturation curve and the first tabulated row of a
    /// block are not bracketed by the grid. When the anchor lies on the curve,
    /// they are interpolated between the saturated end-point and the grid's
    /// edge row at that anchor.
    fn lookup_near_saturation(&self, region: Region, pair: InputPair) -> StateResult<Properties> {
        let grid = self.grid(region)?;
        let err = match grid.bilinear(pair) {
            Ok(props) => return Ok(props),
            Err(err @ TableError::NoBracket { .. }) => err,
            Err(err) => return Err(err.into()),
        };
        let phase = match region {
            Region::Subcooled => Phase::Liquid,
            _ => Phase::Vapor,
        };
        let attempts: Vec<(Axis, f64, Property, f64)> = match pair {
            InputPair::TemperaturePressure { t, p } => vec![
                (Axis::Pressure, p, Property::T, t),
                (Axis::Temperature, t, Property::P, p),
            ],
            _ => anchored_theta(pair).into_iter().collect(),
        };
        for (axis, anchor, property, value) in attempts {
            if axis.is_supercritical(anchor) || !self.store.on_saturation_curve(axis, anchor) {
                continue;
            }
            if let Some(props) = self.edge_blend(grid, phase, axis, anchor, property, value) {
                debug!(?axis, anchor, %property, value, "near-saturation fallback");
                return Ok(props);
            }
        }
        Err(err.into())
    }

    fn edge_blend(
        &self,
        grid: &SinglePhaseGrid,
        phase: Phase,
        axis: Axis,
        anchor: f64,
        property: Property,
        value: f64,
    ) -> Option<Properties> {
        let endpoint = self.store.saturated_endpoint(axis, anchor, phase).ok()?;
        let edge = grid.edge_row(axis, anchor).ok()?;
        let bracket = locate(&[endpoint.get(property), edge.get(property)], value)?;
        let mut props = if bracket.is_node() {
            [endpoint, edge][bracket.lo]
        } else {
            Properties::lerp(&endpoint, &edge, bracket.frac)
        };
        props.set(axis.property(), anchor);
        props.set(property, value);
        Some(props)
    }

    fn resolve_saturated(&self, spec: &Specification) -> StateResult<Outcome> {
        match *spec {
            Specification::QualityAnchor { axis, value, x } => {
                let (liquid, vapor) = self.store.saturated_endpoints(axis, value)?;
                Ok(two_phase(axis, liquid, vapor, x, None))
            }
            Specification::QualityTheta { theta, value, x } => {
                let rows = self.store.saturation().rows(Axis::Temperature);
                let mixture: Vec<f64> = rows
                    .iter()
                    .map(|r| x * r.vapor.get(theta) + (1.0 - x) * r.liquid.get(theta))
                    .collect();
                let temps: Vec<f64> = rows.iter().map(|r| r.t()).collect();
                let bracket = locate(&mixture, value).ok_or_else(|| StateError::InversionFailed {
                    what: format!("{theta} = {value} at x = {x}"),
                })?;
                let t = bracket.apply(&temps);
                debug!(%theta, value, x, t, "inverted mixture series");
                let (liquid, vapor) = self.store.saturated_endpoints(Axis::Temperature, t)?;
                Ok(two_phase(
                    Axis::Temperature,
                    liquid,
                    vapor,
                    x,
                    Some((theta, value)),
                ))
            }
            Specification::Pair(pair) => {
                let Some((axis, anchor, theta, value)) = anchored_theta(pair) else {
                    return Err(StateError::specification(
                        "a saturated pair needs T or P with one of v, u, h, s",
                    ));
                };
                let (liquid, vapor) = self.store.saturated_endpoints(axis, anchor)?;
                let (lo, hi) = (liquid.get(theta), vapor.get(theta));
                let x = (value - lo) / (hi - lo);
                if !(0.0..=1.0).contains(&x) {
                    return Err(StateError::SaturationMismatch {
                        what: format!("{theta} = {value} at {} = {anchor}", axis.property()),
                        quality: x,
                    });
                }
                Ok(two_phase(axis, liquid, vapor, x, Some((theta, value))))
            }
        }
    }

    fn grid(&self, region: Region) -> StateResult<&'a SinglePhaseGrid> {
        self.store.grid(region).ok_or_else(|| {
            StateError::specification(format!("no single-phase grid for the {region} region"))
        })
    }
}

/// `(axis, anchor, theta, value)` for pairs of T or P with a theta property.
fn anchored_theta(pair: InputPair) -> Option<(Axis, f64, Property, f64)> {
    match pair {
        InputPair::TemperatureTheta { t, theta, value } => {
            Some((Axis::Temperature, t, theta, value))
        }
        InputPair::PressureTheta { p, theta, value } => Some((Axis::Pressure, p, theta, value)),
        _ => None,
    }
}

fn single_phase(region: Region, properties: Properties) -> Outcome {
    Outcome {
        region,
        properties,
        quality: None,
        endpoints: None,
    }
}

fn two_phase(
    axis: Axis,
    liquid: Properties,
    vapor: Properties,
    x: f64,
    given: Option<(Property, f64)>,
) -> Outcome {
    let mut properties = Properties::lever(&liquid, &vapor, x);
    if let Some((theta, value)) = given {
        properties.set(theta, value);
    }
    Outcome {
        region: Region::Saturated,
        properties,
        quality: Some(x),
        endpoints: Some(Endpoints {
            axis,
            liquid,
            vapor,
        }),
    }
}

/// Reject non-finite results before they reach a state.
fn finalize(outcome: Outcome) -> StateResult<Outcome> {
    for (property, value) in outcome.properties.iter() {
        ensure_finite(value, property.symbol())?;
    }
    if let Some(x) = outcome.quality {
        ensure_finite(x, "x")?;
    }
    Ok(outcome)
}

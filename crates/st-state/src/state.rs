//! The mutable state entity with resolve-on-demand caching.

use std::sync::Arc;

use st_core::{UnitSystem, ensure_finite};
use st_tables::{Properties, Property, Region, TableStore};
use tracing::{debug, trace};

use crate::delta::Delta;
use crate::error::{StateError, StateResult};
use crate::inputs::{Input, Inputs, Specification};
use crate::resolver::{Outcome, Resolver};

/// Change applied by [`State::clone_with`]. Values are in the clone's display units.
#[derive(Debug, Clone, PartialEq)]
pub enum Override {
    /// Set (`Some`) or clear (`None`) a property input.
    Value(Property, Option<f64>),
    /// Set or clear the quality input.
    Quality(Option<f64>),
    /// Replace the display unit system.
    Units(UnitSystem),
}

#[derive(Debug, Clone)]
struct Resolution {
    region: Region,
    properties: Properties,
    quality: Option<f64>,
    liquid: Option<Box<State>>,
    vapor: Option<Box<State>>,
}

/// Water/steam state built from two inputs.
///
/// Inputs are stored in canonical units; the unit system only affects values
/// going in through setters and coming out through getters. Resolution runs
/// once per distinct input set and is cached until an input changes.
#[derive(Debug, Clone)]
pub struct State {
    store: Arc<TableStore>,
    units: UnitSystem,
    inputs: Inputs,
    cache: Option<Resolution>,
    snapshot: Option<Inputs>,
    resolutions: u64,
}

impl State {
    pub fn new(store: Arc<TableStore>) -> Self {
        Self::with_units(store, UnitSystem::default())
    }

    pub fn with_units(store: Arc<TableStore>, units: UnitSystem) -> Self {
        Self {
            store,
            units,
            inputs: Inputs::default(),
            cache: None,
            snapshot: None,
            resolutions: 0,
        }
    }

    /// State from two property values, resolved immediately.
    pub fn from_pair(
        store: Arc<TableStore>,
        a: (Property, f64),
        b: (Property, f64),
    ) -> StateResult<Self> {
        let mut state = Self::new(store);
        state.set(a.0, a.1)?;
        state.set(b.0, b.1)?;
        Ok(state)
    }

    /// State from one property value and a vapor quality, resolved immediately.
    pub fn from_quality(store: Arc<TableStore>, a: (Property, f64), x: f64) -> StateResult<Self> {
        let mut state = Self::new(store);
        state.set(a.0, a.1)?;
        state.set_quality(x)?;
        Ok(state)
    }

    pub fn units(&self) -> &UnitSystem {
        &self.units
    }

    /// Switch display units. Inputs are canonical, so the cache stays valid.
    pub fn set_units(&mut self, units: UnitSystem) {
        self.units = units;
        if let Some(res) = self.cache.as_mut() {
            for child in [res.liquid.as_mut(), res.vapor.as_mut()].into_iter().flatten() {
                child.units = units;
            }
        }
    }

    pub fn store(&self) -> &Arc<TableStore> {
        &self.store
    }

    /// Current inputs in canonical units.
    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    /// Record `value` (display units) as an input.
    ///
    /// Replaces an existing value for the same property. A third distinct input
    /// is rejected. Resolves as soon as the inputs form a complete specification.
    pub fn set(&mut self, property: Property, value: f64) -> StateResult<()> {
        let value = ensure_finite(value, property.symbol())?;
        let canonical = self.units.to_canonical(property.dimension(), value);
        self.record(Input::Property(property), Some(canonical))
    }

    pub fn set_quality(&mut self, x: f64) -> StateResult<()> {
        let x = ensure_finite(x, "x")?;
        if !(0.0..=1.0).contains(&x) {
            return Err(StateError::specification(format!(
                "quality x = {x} must lie in [0, 1]"
            )));
        }
        self.record(Input::Quality, Some(x))
    }

    /// Remove a property input.
    pub fn clear(&mut self, property: Property) {
        self.write(Input::Property(property), None);
    }

    pub fn clear_quality(&mut self) {
        self.write(Input::Quality, None);
    }

    fn record(&mut self, input: Input, value: Option<f64>) -> StateResult<()> {
        if self.inputs.slot(input).is_none() && self.inputs.count() >= 2 {
            return Err(StateError::specification(format!(
                "cannot add {input}: two inputs are already set"
            )));
        }
        self.write(input, value);
        if Specification::from_inputs(&self.inputs).is_ok() {
            self.lookup()?;
        }
        Ok(())
    }

    fn write(&mut self, input: Input, value: Option<f64>) {
        let before = self.inputs;
        match input {
            Input::Property(p) => self.inputs.set(p, value),
            Input::Quality => self.inputs.set_quality(value),
        }
        if self.inputs != before {
            trace!(%input, "input changed, cache cleared");
            self.cache = None;
        }
    }

    /// Resolve the current inputs unless the cached resolution is still valid.
    pub fn lookup(&mut self) -> StateResult<()> {
        if !self.is_cache_stale() {
            trace!("state cache hit");
            return Ok(());
        }
        let spec = Specification::from_inputs(&self.inputs)?;
        let outcome = Resolver::new(&self.store).resolve(&spec)?;
        self.resolutions += 1;
        debug!(region = %outcome.region, resolutions = self.resolutions, "state resolved");
        self.cache = Some(self.resolution(outcome));
        self.snapshot = Some(self.inputs);
        Ok(())
    }

    fn resolution(&self, outcome: Outcome) -> Resolution {
        let (liquid, vapor) = match outcome.endpoints {
            Some(ends) => (
                Some(Box::new(self.seeded(ends.axis.property(), ends.liquid, 0.0))),
                Some(Box::new(self.seeded(ends.axis.property(), ends.vapor, 1.0))),
            ),
            None => (None, None),
        };
        Resolution {
            region: outcome.region,
            properties: outcome.properties,
            quality: outcome.quality,
            liquid,
            vapor,
        }
    }

    /// Sub-state pinned at one saturated end-point, already resolved.
    fn seeded(&self, anchor: Property, endpoint: Properties, x: f64) -> State {
        let mut child = self.blank();
        child.inputs = Specification::anchored_inputs(anchor, endpoint.get(anchor), x);
        child.snapshot = Some(child.inputs);
        child.cache = Some(Resolution {
            region: Region::Saturated,
            properties: endpoint,
            quality: Some(x),
            liquid: None,
            vapor: None,
        });
        child
    }

    fn blank(&self) -> State {
        State::with_units(Arc::clone(&self.store), self.units)
    }

    fn resolved(&mut self) -> StateResult<&Resolution> {
        self.lookup()?;
        self.cache
            .as_ref()
            .ok_or_else(|| StateError::specification("state has no resolution"))
    }

    /// Resolved value of `property` in display units.
    pub fn get(&mut self, property: Property) -> StateResult<f64> {
        let canonical = self.resolved()?.properties.get(property);
        Ok(self.units.to_display(property.dimension(), canonical))
    }

    /// Vapor quality; `None` for single-phase states.
    pub fn quality(&mut self) -> StateResult<Option<f64>> {
        Ok(self.resolved()?.quality)
    }

    /// All six properties in display units.
    pub fn properties(&mut self) -> StateResult<Properties> {
        let canonical = self.resolved()?.properties;
        let mut display = Properties::default();
        for (property, value) in canonical.iter() {
            display.set(property, self.units.to_display(property.dimension(), value));
        }
        Ok(display)
    }

    /// Cached or input value without resolving.
    pub fn value(&self, property: Property) -> Option<f64> {
        let canonical = match &self.cache {
            Some(res) => Some(res.properties.get(property)),
            None => self.inputs.get(property),
        }?;
        Some(self.units.to_display(property.dimension(), canonical))
    }

    pub fn region(&mut self) -> StateResult<Region> {
        Ok(self.resolved()?.region)
    }

    /// Saturated liquid sub-state (x = 0) of a two-phase state.
    pub fn liquid(&mut self) -> StateResult<Option<&State>> {
        Ok(self.resolved()?.liquid.as_deref())
    }

    /// Saturated vapor sub-state (x = 1) of a two-phase state.
    pub fn vapor(&mut self) -> StateResult<Option<&State>> {
        Ok(self.resolved()?.vapor.as_deref())
    }

    /// Independent state seeded from the current inputs with `overrides` applied.
    ///
    /// The clone owns its cache; it is resolved when its inputs are complete.
    pub fn clone_with(&self, overrides: &[Override]) -> StateResult<State> {
        let mut clone = self.clone();
        for change in overrides {
            match change {
                Override::Units(units) => clone.set_units(*units),
                Override::Value(property, value) => {
                    let canonical = value
                        .map(|v| ensure_finite(v, property.symbol()))
                        .transpose()?
                        .map(|v| clone.units.to_canonical(property.dimension(), v));
                    clone.write(Input::Property(*property), canonical);
                }
                Override::Quality(x) => {
                    let x = x.map(|x| ensure_finite(x, "x")).transpose()?;
                    clone.write(Input::Quality, x);
                }
            }
        }
        if clone.inputs.count() > 2 {
            return Err(StateError::specification(format!(
                "clone has {} inputs, at most two are allowed",
                clone.inputs.count()
            )));
        }
        if Specification::from_inputs(&clone.inputs).is_ok() {
            clone.lookup()?;
        }
        Ok(clone)
    }

    /// Signed differences `other - self` in this state's display units.
    ///
    /// Forces resolution of both states; neither is otherwise modified.
    pub fn delta(&mut self, other: &mut State) -> StateResult<Delta> {
        let (mine, my_x) = {
            let res = self.resolved()?;
            (res.properties, res.quality)
        };
        let (theirs, their_x) = {
            let res = other.resolved()?;
            (res.properties, res.quality)
        };
        Ok(Delta::between(&self.units, (&mine, my_x), (&theirs, their_x)))
    }

    /// Tabulated (min, max) of `property` over every table, in display units.
    pub fn limits(&self, property: Property) -> (f64, f64) {
        let (lo, hi) = self.store.envelope(property);
        let dim = property.dimension();
        let (a, b) = (self.units.to_display(dim, lo), self.units.to_display(dim, hi));
        (a.min(b), a.max(b))
    }

    /// Whether the next read will re-resolve.
    pub fn is_cache_stale(&self) -> bool {
        self.cache.is_none() || self.snapshot.as_ref() != Some(&self.inputs)
    }

    /// Inputs changed since the last resolution; every slot before the first one.
    pub fn changed_inputs(&self) -> Vec<Input> {
        match &self.snapshot {
            Some(snapshot) => self.inputs.diff(snapshot),
            None => Input::ALL.to_vec(),
        }
    }

    /// Number of resolutions performed by this state.
    pub fn resolution_count(&self) -> u64 {
        self.resolutions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use st_core::PressureUnit;

    fn store() -> Arc<TableStore> {
        Arc::new(TableStore::bundled().unwrap())
    }

    #[test]
    fn empty_state_has_no_values() {
        let state = State::new(store());
        assert_eq!(state.value(Property::P), None);
        assert!(state.is_cache_stale());
        assert_eq!(state.changed_inputs().len(), 7);
    }

    #[test]
    fn units_apply_to_setters_and_getters() {
        let units = UnitSystem {
            pressure: PressureUnit::KiloPascal,
            ..UnitSystem::default()
        };
        let mut state = State::with_units(store(), units);
        state.set(Property::P, 100.0).unwrap();
        let p = state.inputs().get(Property::P).unwrap();
        assert!((p - 0.1).abs() < 1e-12);
        state.set(Property::T, 300.0).unwrap();
        assert!((state.get(Property::H).unwrap() - 3074.3).abs() < 1e-9);
        assert!((state.get(Property::P).unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn third_input_is_rejected() {
        let mut state = State::from_pair(store(), (Property::P, 0.1), (Property::T, 300.0)).unwrap();
        let err = state.set(Property::H, 3000.0).unwrap_err();
        assert!(matches!(err, StateError::Specification { .. }));
        // Replacing an existing input is fine.
        state.set(Property::T, 400.0).unwrap();
        assert_eq!(state.get(Property::H).unwrap(), 3278.2);
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let mut state = State::new(store());
        assert!(matches!(
            state.set(Property::T, f64::NAN),
            Err(StateError::Core(_))
        ));
        assert_eq!(state.inputs().count(), 0);
    }

    #[test]
    fn unit_switch_keeps_cache() {
        let mut state = State::from_pair(store(), (Property::P, 0.1), (Property::T, 300.0)).unwrap();
        state.set_units(UnitSystem {
            pressure: PressureUnit::Bar,
            ..UnitSystem::default()
        });
        assert!(!state.is_cache_stale());
        assert!((state.get(Property::P).unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(state.resolution_count(), 1);
    }
}

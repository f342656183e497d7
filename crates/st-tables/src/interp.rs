//! Piecewise-linear lookup on tabulated series.

use st_core::{Tolerances, nearly_equal};

use crate::error::{TableError, TableResult};

/// Position of a query inside a tabulated series.
///
/// `lo == hi` means the query snapped onto node `lo` and `frac` is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub lo: usize,
    pub hi: usize,
    pub frac: f64,
}

impl Bracket {
    pub fn node(i: usize) -> Self {
        Self {
            lo: i,
            hi: i,
            frac: 0.0,
        }
    }

    pub fn is_node(&self) -> bool {
        self.lo == self.hi
    }

    /// Evaluate `ys` at this bracket.
    pub fn apply(&self, ys: &[f64]) -> f64 {
        if self.is_node() {
            ys[self.lo]
        } else {
            ys[self.lo] + self.frac * (ys[self.hi] - ys[self.lo])
        }
    }
}

/// Find the first node or segment of `xs` that contains `q`.
///
/// Nodes and segments are scanned in table order, so for a non-monotonic
/// series the earliest match wins. Works for ascending and descending runs.
/// Returns `None` rather than extrapolating.
pub fn locate(xs: &[f64], q: f64) -> Option<Bracket> {
    let tol = Tolerances::default();
    for (i, &x) in xs.iter().enumerate() {
        if nearly_equal(x, q, tol) {
            return Some(Bracket::node(i));
        }
        if let Some(&next) = xs.get(i + 1) {
            if nearly_equal(next, q, tol) {
                return Some(Bracket::node(i + 1));
            }
            if (x < q && q < next) || (next < q && q < x) {
                return Some(Bracket {
                    lo: i,
                    hi: i + 1,
                    frac: (q - x) / (next - x),
                });
            }
        }
    }
    None
}

/// One-dimensional interpolator over a strictly ascending abscissa.
#[derive(Debug, Clone)]
pub struct Interp1d {
    what: &'static str,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Interp1d {
    pub fn new(what: &'static str, x: Vec<f64>, y: Vec<f64>) -> TableResult<Self> {
        if x.len() != y.len() || x.len() < 2 {
            return Err(TableError::malformed(
                "saturated",
                format!("{what} series needs at least two points of equal length"),
            ));
        }
        if x.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TableError::malformed(
                "saturated",
                format!("{what} abscissa is not strictly ascending"),
            ));
        }
        Ok(Self { what, x, y })
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    pub fn contains(&self, q: f64) -> bool {
        locate(&self.x, q).is_some()
    }

    pub fn eval(&self, q: f64) -> TableResult<f64> {
        let (min, max) = self.domain();
        let bracket = locate(&self.x, q).ok_or(TableError::OutOfRange {
            what: self.what,
            value: q,
            min,
            max,
        })?;
        Ok(bracket.apply(&self.y))
    }
}

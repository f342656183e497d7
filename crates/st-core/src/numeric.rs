//! Float comparisons used for node snapping and envelope tests.

use crate::{CoreError, CoreResult};

/// Absolute and relative tolerance pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

impl Tolerances {
    /// Snapping tolerance for tabulated nodes. Tables carry at most five
    /// significant digits, so anything closer than this is the same node.
    pub const NODE: Self = Self {
        abs: 1e-12,
        rel: 1e-9,
    };
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::NODE
    }
}

pub fn nearly_equal(a: f64, b: f64, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    diff <= tol.abs || diff <= tol.rel * a.abs().max(b.abs())
}

/// `value` lies in `[lo, hi]`, with either end matched within `tol`.
pub fn within(value: f64, lo: f64, hi: f64, tol: Tolerances) -> bool {
    (lo..=hi).contains(&value) || nearly_equal(value, lo, tol) || nearly_equal(value, hi, tol)
}

pub fn ensure_finite(value: f64, what: &'static str) -> CoreResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoreError::NonFinite { what, value })
    }
}

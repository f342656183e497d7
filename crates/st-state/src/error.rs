//! State resolution errors.

use st_core::CoreError;
use st_tables::TableError;
use thiserror::Error;

/// Result type for state operations.
pub type StateResult<T> = Result<T, StateError>;

/// Failures raised while specifying or resolving a state.
///
/// None of these are retried internally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Wrong number or combination of inputs.
    #[error("Invalid state specification: {reason}")]
    Specification { reason: String },

    /// Value outside the tabulated coverage, or no valid bracket.
    #[error("Out of table domain: {0}")]
    Domain(#[from] TableError),

    /// Both single-phase grids can represent the inputs.
    #[error("Ambiguous state: {what} resolves in both the subcooled and superheated tables")]
    Ambiguous { what: String },

    /// A saturated state's secondary property is not between the liquid and vapor values.
    #[error("Saturation mismatch: {what} gives quality {quality} outside [0, 1]")]
    SaturationMismatch { what: String, quality: f64 },

    /// The mixture series cannot be inverted for the requested property at this quality.
    #[error("Cannot invert the saturated mixture for {what}")]
    InversionFailed { what: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StateError {
    pub(crate) fn specification(reason: impl Into<String>) -> Self {
        Self::Specification {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StateError::specification("exactly two inputs are required");
        assert!(err.to_string().contains("exactly two"));

        let err = StateError::SaturationMismatch {
            what: "h = 3000 at T = 120".into(),
            quality: 1.2,
        };
        assert!(err.to_string().contains("1.2"));
    }

    #[test]
    fn table_and_core_errors_convert() {
        let err: StateError = TableError::NoBracket {
            what: "h = 1 at P = 1".into(),
        }
        .into();
        assert!(matches!(err, StateError::Domain(TableError::NoBracket { .. })));

        let err: StateError = CoreError::InvalidArg { what: "x" }.into();
        assert!(matches!(err, StateError::Core(_)));
    }
}

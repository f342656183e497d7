//! Table store and interpolation errors.

use thiserror::Error;

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Errors raised while loading tables or interpolating in them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    /// Table data violates an ordering or finiteness invariant.
    #[error("Malformed {table} table: {reason}")]
    Malformed { table: &'static str, reason: String },

    /// A table file could not be read.
    #[error("Cannot read table file {path}: {message}")]
    Io { path: String, message: String },

    /// Query lies outside the tabulated envelope. Nothing is extrapolated.
    #[error("{what} = {value} is outside the tabulated range [{min}, {max}]")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Query is inside the envelope but no pair of table lines brackets it.
    #[error("No bracketing table entries for {what}")]
    NoBracket { what: String },

    /// Property symbol not one of T, P, v, u, h, s.
    #[error("Unknown property '{name}'")]
    UnknownProperty { name: String },

    /// The same property was given twice as an input pair.
    #[error("Property {property} given twice")]
    DuplicateInput { property: &'static str },
}

impl TableError {
    pub(crate) fn malformed(table: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            table,
            reason: reason.into(),
        }
    }

    pub(crate) fn no_bracket(what: impl Into<String>) -> Self {
        Self::NoBracket { what: what.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TableError::OutOfRange {
            what: "T",
            value: 1500.0,
            min: 0.01,
            max: 1300.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("1500"));
        assert!(msg.contains("1300"));

        let err = TableError::malformed("saturated", "T not ascending");
        assert!(err.to_string().contains("saturated"));
    }
}

//! Error types for rod mechanics.

use thiserror::Error;

/// Errors that can occur while building or evaluating a Cosserat rod.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RodError {
    /// Configuration or construction parameters are invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A per-node, per-element or per-Voronoi array has the wrong length.
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Name of the offending collection.
        what: &'static str,
        /// Required length.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// Two consecutive nodes coincide (or are not finite), so the element
    /// between them has no tangent.
    #[error("Degenerate element {index}: length {length}")]
    DegenerateElement {
        /// Element index.
        index: usize,
        /// Measured element length.
        length: f64,
    },

    /// A state entry contains `NaN` or infinity.
    #[error("Non-finite {what} at index {index}")]
    NonFiniteState {
        /// Name of the offending collection.
        what: &'static str,
        /// Index of the first non-finite entry.
        index: usize,
    },
}

impl RodError {
    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a dimension mismatch error.
    #[must_use]
    pub const fn dimension_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            what,
            expected,
            actual,
        }
    }

    /// Create a degenerate element error.
    #[must_use]
    pub const fn degenerate_element(index: usize, length: f64) -> Self {
        Self::DegenerateElement { index, length }
    }

    /// Create a non-finite state error.
    #[must_use]
    pub const fn non_finite(what: &'static str, index: usize) -> Self {
        Self::NonFiniteState { what, index }
    }
}

/// Result type for rod operations.
pub type Result<T> = std::result::Result<T, RodError>;

/// Check that a collection has the expected length.
pub(crate) fn check_len<T>(what: &'static str, items: &[T], expected: usize) -> Result<()> {
    if items.len() == expected {
        Ok(())
    } else {
        Err(RodError::dimension_mismatch(what, expected, items.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RodError::dimension_mismatch("velocities", 5, 4);
        assert_eq!(
            err.to_string(),
            "Dimension mismatch for velocities: expected 5, got 4"
        );

        let err = RodError::degenerate_element(2, 0.0);
        assert!(err.to_string().contains("element 2"));
    }

    #[test]
    fn test_check_len() {
        assert!(check_len("mass", &[1.0, 2.0], 2).is_ok());
        assert_eq!(
            check_len("mass", &[1.0], 2),
            Err(RodError::dimension_mismatch("mass", 2, 1))
        );
    }
}

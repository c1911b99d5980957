//! Error types for contact registration.

use thiserror::Error;

use crate::bodies::SystemKind;

/// Errors raised while registering or applying a contact pair.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContactError {
    /// The participants have the wrong kind or order for the law.
    #[error("{law} cannot act between a {first} and a {second}")]
    InvalidOrder {
        /// Name of the contact law.
        law: &'static str,
        /// Kind of the first participant.
        first: SystemKind,
        /// Kind of the second participant.
        second: SystemKind,
    },

    /// A two-body law was given the same system twice.
    #[error("{law} requires two distinct systems; use self contact for a single rod")]
    IdenticalSystems {
        /// Name of the contact law.
        law: &'static str,
    },

    /// Self contact was given two different systems.
    #[error("self contact requires the same rod twice, got systems {first} and {second}")]
    SelfContactMismatch {
        /// Index of the first participant.
        first: usize,
        /// Index of the second participant.
        second: usize,
    },

    /// A system index is out of range.
    #[error("no system registered at index {index}")]
    UnknownSystem {
        /// The offending index.
        index: usize,
    },

    /// Law parameters are invalid.
    #[error("Invalid contact parameters: {0}")]
    InvalidParams(String),
}

impl ContactError {
    /// Create an invalid parameter error.
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    /// Create an invalid order error.
    #[must_use]
    pub const fn invalid_order(law: &'static str, first: SystemKind, second: SystemKind) -> Self {
        Self::InvalidOrder { law, first, second }
    }
}

/// Result type for contact operations.
pub type Result<T> = std::result::Result<T, ContactError>;

/// Require a parameter to be finite and non-negative.
pub(crate) fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ContactError::invalid_params(format!(
            "{name} must be non-negative and finite, got {value}"
        )))
    }
}

/// Require a parameter to be finite and strictly positive.
pub(crate) fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ContactError::invalid_params(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

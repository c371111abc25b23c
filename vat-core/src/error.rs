use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::Ineligibility;

/// Errors raised for numeric or textual input that cannot be computed with.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    /// A monetary amount, rate or revenue figure was below zero.
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: Decimal },

    /// A floating-point input was `NaN` or infinite.
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: String },

    /// A floating-point input was finite but outside the range of [`Decimal`].
    #[error("{field} is out of range, got {value}")]
    OutOfRange { field: &'static str, value: String },

    /// A required text field was empty or whitespace only.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
}

/// Errors returned by rate resolution.
///
/// None of these are transient: the same query always yields the same error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RateError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("unsupported tax regime '{0}'")]
    UnsupportedRegime(String),

    #[error("unsupported policy year {0}; expected 2025 or 2026")]
    UnsupportedYear(i32),

    /// The regime cannot be applied to the business described by the query.
    ///
    /// This is not a 0% rate; callers must branch on it before using a rate.
    #[error("{0}")]
    InapplicableRegime(Ineligibility),
}

impl RateError {
    /// Returns `true` when the error only reports that the regime is unavailable.
    pub fn is_inapplicable(&self) -> bool {
        matches!(self, Self::InapplicableRegime(_))
    }

    /// Returns the eligibility details when the regime is unavailable.
    pub fn ineligibility(&self) -> Option<&Ineligibility> {
        match self {
            Self::InapplicableRegime(ineligibility) => Some(ineligibility),
            _ => None,
        }
    }
}

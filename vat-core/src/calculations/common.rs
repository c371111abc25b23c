//! Common utility functions for rate and amount calculations.
//!
//! This module provides shared input checks and display rounding used by the
//! resolver, the money calculator and the front ends.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::InputError;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Calculations never round; this is for display only. Values at exactly
/// 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use vat_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `value` unchanged when it is zero or positive.
///
/// # Errors
///
/// Returns [`InputError::Negative`] naming `field` when `value` is below zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use vat_core::calculations::common::ensure_non_negative;
///
/// assert_eq!(ensure_non_negative("amount", dec!(0)), Ok(dec!(0)));
/// assert!(ensure_non_negative("amount", dec!(-0.01)).is_err());
/// ```
pub fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, InputError> {
    if value < Decimal::ZERO {
        return Err(InputError::Negative { field, value });
    }
    Ok(value)
}

/// Converts a floating-point input into a [`Decimal`].
///
/// # Arguments
///
/// * `field` - Name of the input, used in the error
/// * `value` - The value entered by the caller
///
/// # Errors
///
/// Returns [`InputError::NonFinite`] for `NaN` and infinities, and
/// [`InputError::OutOfRange`] for finite values a [`Decimal`] cannot hold.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use vat_core::calculations::common::decimal_from_f64;
///
/// assert_eq!(decimal_from_f64("amount", 100000.5), Ok(dec!(100000.5)));
/// assert!(decimal_from_f64("amount", f64::NAN).is_err());
/// ```
pub fn decimal_from_f64(
    field: &'static str,
    value: f64,
) -> Result<Decimal, InputError> {
    if !value.is_finite() {
        return Err(InputError::NonFinite {
            field,
            value: value.to_string(),
        });
    }
    Decimal::from_f64(value).ok_or_else(|| InputError::OutOfRange {
        field,
        value: value.to_string(),
    })
}

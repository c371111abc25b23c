//! Tax amount and tax-inclusive total for a base amount.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use vat_core::calculations::compute_tax;
//!
//! let result = compute_tax(dec!(100000), dec!(20)).unwrap();
//!
//! assert_eq!(result.tax_amount, dec!(20000));
//! assert_eq!(result.total_amount, dec!(120000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::InputError;
use crate::calculations::common::{decimal_from_f64, ensure_non_negative};

/// Tax charged on a base amount at one rate.
///
/// `total_amount` is always exactly `base_amount + tax_amount`; nothing is
/// rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyComputation {
    pub base_amount: Decimal,
    pub rate_percent: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

/// Computes the tax and the tax-inclusive total.
///
/// # Errors
///
/// Returns [`InputError::Negative`] when `base_amount` or `rate_percent` is
/// below zero, and [`InputError::OutOfRange`] when the tax or the total does
/// not fit in a [`Decimal`].
pub fn compute_tax(
    base_amount: Decimal,
    rate_percent: Decimal,
) -> Result<MoneyComputation, InputError> {
    let base_amount = ensure_non_negative("base amount", base_amount)?;
    let rate_percent = ensure_non_negative("rate", rate_percent)?;

    let out_of_range = || InputError::OutOfRange {
        field: "base amount",
        value: base_amount.to_string(),
    };

    let tax_amount = base_amount
        .checked_mul(rate_percent)
        .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(out_of_range)?;
    let total_amount = base_amount
        .checked_add(tax_amount)
        .ok_or_else(out_of_range)?;

    Ok(MoneyComputation {
        base_amount,
        rate_percent,
        tax_amount,
        total_amount,
    })
}

/// [`compute_tax`] for callers holding floating-point input.
///
/// # Errors
///
/// Returns [`InputError::NonFinite`] for `NaN` or infinite input, and the
/// errors of [`compute_tax`].
pub fn compute_tax_f64(
    base_amount: f64,
    rate_percent: f64,
) -> Result<MoneyComputation, InputError> {
    compute_tax(
        decimal_from_f64("base amount", base_amount)?,
        decimal_from_f64("rate", rate_percent)?,
    )
}

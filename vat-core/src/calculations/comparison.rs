use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::MoneyComputation;

/// Direction of the change between two years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increase,
    Decrease,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearComparison {
    pub result_year_a: MoneyComputation,
    pub result_year_b: MoneyComputation,

    /// Total of year B minus total of year A.
    pub difference: Decimal,
}

impl YearComparison {
    /// `difference` relative to the year A total.
    ///
    /// Returns `None` when the year A total is zero.
    pub fn relative_change(&self) -> Option<Decimal> {
        let base = self.result_year_a.total_amount;
        if base.is_zero() {
            return None;
        }
        self.difference.checked_div(base)
    }

    /// Tax of year B minus tax of year A.
    pub fn tax_difference(&self) -> Decimal {
        self.result_year_b.tax_amount - self.result_year_a.tax_amount
    }

    pub fn trend(&self) -> Trend {
        if self.difference > Decimal::ZERO {
            Trend::Increase
        } else if self.difference < Decimal::ZERO {
            Trend::Decrease
        } else {
            Trend::Unchanged
        }
    }
}

/// Compares the totals of two computations.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use vat_core::calculations::{compare_years, compute_tax};
///
/// let a = compute_tax(dec!(100000), dec!(20)).unwrap();
/// let b = compute_tax(dec!(100000), dec!(22)).unwrap();
///
/// let comparison = compare_years(a, b);
///
/// assert_eq!(comparison.difference, dec!(2000));
/// ```
pub fn compare_years(
    result_year_a: MoneyComputation,
    result_year_b: MoneyComputation,
) -> YearComparison {
    let difference = result_year_b.total_amount - result_year_a.total_amount;

    YearComparison {
        result_year_a,
        result_year_b,
        difference,
    }
}

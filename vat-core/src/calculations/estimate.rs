//! Two-year estimate: the whole calculator form in one call.
//!
//! Resolves the rate for both policy years, computes the tax on the base
//! amount for each year the regime applies in, and compares the totals when
//! both years are computable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::RateError;
use crate::calculations::common::ensure_non_negative;
use crate::calculations::{
    MoneyComputation, RateResolver, YearComparison, compare_years, compute_tax,
};
use crate::models::{Ineligibility, PolicyYear, RateQuery, RateResult, TaxRegime};

/// Everything the form collects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub regime: TaxRegime,

    /// Amount before tax.
    pub base_amount: Decimal,

    #[serde(default)]
    pub revenue_millions: Decimal,

    #[serde(default)]
    pub employee_count: u32,

    #[serde(default)]
    pub classification_code: Option<String>,

    #[serde(default)]
    pub classification_name: Option<String>,

    /// General-regime rate for 2025 chosen by the user.
    #[serde(default)]
    pub selected_rate: Option<Decimal>,
}

impl EstimateRequest {
    pub fn new(
        regime: TaxRegime,
        base_amount: Decimal,
    ) -> Self {
        Self {
            regime,
            base_amount,
            revenue_millions: Decimal::ZERO,
            employee_count: 0,
            classification_code: None,
            classification_name: None,
            selected_rate: None,
        }
    }

    /// The rate query for one policy year.
    pub fn query(
        &self,
        year: PolicyYear,
    ) -> RateQuery {
        RateQuery {
            regime: self.regime,
            year,
            revenue_millions: self.revenue_millions,
            employee_count: self.employee_count,
            classification_code: self.classification_code.clone(),
            classification_name: self.classification_name.clone(),
            selected_rate: self.selected_rate,
        }
    }
}

/// Result for one policy year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum YearOutcome {
    Applicable {
        rate: RateResult,
        computation: MoneyComputation,
    },
    Inapplicable(Ineligibility),
}

impl YearOutcome {
    pub fn computation(&self) -> Option<&MoneyComputation> {
        match self {
            Self::Applicable { computation, .. } => Some(computation),
            Self::Inapplicable(_) => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::Applicable { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoYearEstimate {
    pub regime: TaxRegime,
    pub base_year: YearOutcome,
    pub following_year: YearOutcome,

    /// Present only when the regime applies in both years.
    pub comparison: Option<YearComparison>,
}

/// Computes the estimate for 2025 and 2026.
///
/// # Errors
///
/// Returns [`RateError::InvalidInput`] for negative amounts, revenue or
/// selected rate. Inapplicable years are reported inside the estimate.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use vat_core::calculations::{EstimateRequest, RateResolver, estimate};
/// use vat_core::TaxRegime;
///
/// let request = EstimateRequest::new(TaxRegime::General, dec!(100000));
///
/// let estimate = estimate(&RateResolver::default(), &request).unwrap();
///
/// assert_eq!(estimate.comparison.unwrap().difference, dec!(2000));
/// ```
pub fn estimate(
    resolver: &RateResolver,
    request: &EstimateRequest,
) -> Result<TwoYearEstimate, RateError> {
    ensure_non_negative("base amount", request.base_amount)?;

    let base_year = year_outcome(resolver, request, PolicyYear::Y2025)?;
    let following_year = year_outcome(resolver, request, PolicyYear::Y2026)?;

    let comparison = match (base_year.computation(), following_year.computation()) {
        (Some(a), Some(b)) => Some(compare_years(a.clone(), b.clone())),
        _ => None,
    };

    debug!(
        regime = %request.regime,
        base_amount = %request.base_amount,
        difference = ?comparison.as_ref().map(|c| c.difference),
        "computed two-year estimate"
    );

    Ok(TwoYearEstimate {
        regime: request.regime,
        base_year,
        following_year,
        comparison,
    })
}

fn year_outcome(
    resolver: &RateResolver,
    request: &EstimateRequest,
    year: PolicyYear,
) -> Result<YearOutcome, RateError> {
    match resolver.resolve(&request.query(year)) {
        Ok(rate) => {
            let computation = compute_tax(request.base_amount, rate.rate_percent)?;
            Ok(YearOutcome::Applicable { rate, computation })
        }
        Err(RateError::InapplicableRegime(ineligibility)) => {
            Ok(YearOutcome::Inapplicable(ineligibility))
        }
        Err(other) => Err(other),
    }
}

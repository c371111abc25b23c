//! Rate resolution for every supported tax regime.
//!
//! The resolver maps a [`RateQuery`] to the rate that applies in the queried
//! policy year, following the schedules held in a [`RatePolicy`].
//!
//! # Regime Rules
//!
//! | Regime               | Inputs used |
//! |----------------------|-------------|
//! | General              | selected rate, else classification code and name |
//! | Simplified           | revenue and head count against year-specific tiers |
//! | Patent               | revenue and head count against year-specific ceilings |
//! | Automated simplified | revenue; head count is reported as a signal only |
//!
//! A regime that does not apply is reported as
//! [`RateError::InapplicableRegime`], never as a 0% rate.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use vat_core::calculations::RateResolver;
//! use vat_core::{PolicyYear, RateQuery, TaxRegime};
//!
//! let resolver = RateResolver::default();
//!
//! let query = RateQuery::new(TaxRegime::Simplified, PolicyYear::Y2025)
//!     .with_revenue(dec!(300))
//!     .with_employees(50);
//!
//! let result = resolver.resolve(&query).unwrap();
//! assert_eq!(result.rate_percent, dec!(8));
//!
//! let too_small = RateQuery::new(TaxRegime::Simplified, PolicyYear::Y2025)
//!     .with_revenue(dec!(59));
//! assert!(resolver.resolve(&too_small).unwrap_err().is_inapplicable());
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::RateError;
use crate::calculations::common::ensure_non_negative;
use crate::models::{
    Ineligibility, IneligibilityReason, PolicyYear, RatePolicy, RateQuery, RateResult, TaxRegime,
    VatCategory,
};

/// Resolves rates against a [`RatePolicy`].
#[derive(Debug, Clone, Default)]
pub struct RateResolver {
    policy: RatePolicy,
}

impl RateResolver {
    pub fn new(policy: RatePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RatePolicy {
        &self.policy
    }

    /// Resolves the rate for `query`.
    ///
    /// # Errors
    ///
    /// * [`RateError::InvalidInput`] - revenue or the selected rate is negative.
    /// * [`RateError::InapplicableRegime`] - the business is outside the
    ///   regime's limits for the queried year.
    pub fn resolve(
        &self,
        query: &RateQuery,
    ) -> Result<RateResult, RateError> {
        let revenue = ensure_non_negative("revenue", query.revenue_millions)?;
        if let Some(selected) = query.selected_rate {
            ensure_non_negative("selected rate", selected)?;
        }

        let result = match query.regime {
            TaxRegime::General => Ok(self.general_rate(query)),
            TaxRegime::Simplified => self.simplified_rate(query.year, revenue, query.employee_count),
            TaxRegime::Patent => self.patent_rate(query.year, revenue, query.employee_count),
            TaxRegime::AutomatedSimplified => {
                self.automated_simplified_rate(query.year, revenue, query.employee_count)
            }
        };

        match &result {
            Ok(rate) => debug!(
                regime = %query.regime,
                year = %query.year,
                rate = %rate.rate_percent,
                "resolved tax rate"
            ),
            Err(RateError::InapplicableRegime(ineligibility)) => debug!(
                regime = %query.regime,
                year = %query.year,
                reason = %ineligibility.reason,
                "regime not applicable"
            ),
            Err(_) => {}
        }

        result
    }

    /// Suggests the VAT category for an activity code and name.
    pub fn suggest_category(
        &self,
        code: &str,
        name: &str,
    ) -> VatCategory {
        self.policy.general.classify(code, name)
    }

    /// Rate suggested for an activity in the base year of the general regime.
    pub fn suggest_rate(
        &self,
        code: &str,
        name: &str,
    ) -> Decimal {
        let category = self.suggest_category(code, name);
        self.policy
            .general
            .category_rate(category, PolicyYear::Y2025)
    }

    /// General regime.
    ///
    /// The base-year rate is the user's selection, else the classification
    /// suggestion, else the standard rate. Later years derive from it.
    fn general_rate(
        &self,
        query: &RateQuery,
    ) -> RateResult {
        let general = &self.policy.general;

        let base_year_rate = match query.selected_rate {
            Some(selected) => selected,
            None if query.has_classification() => {
                let code = query.classification_code.as_deref().unwrap_or_default();
                let name = query.classification_name.as_deref().unwrap_or_default();
                let category = general.classify(code, name);
                debug!(code, category = ?category, "classified activity");
                general.category_rate(category, PolicyYear::Y2025)
            }
            None => *general.standard_rate.get(PolicyYear::Y2025),
        };

        let rate_percent = match query.year {
            PolicyYear::Y2025 => base_year_rate,
            PolicyYear::Y2026 => general.following_year_rate(base_year_rate),
        };

        RateResult {
            regime: TaxRegime::General,
            year: query.year,
            rate_percent,
            headcount_eligible: None,
        }
    }

    /// Simplified regime tiers.
    ///
    /// Eligibility is checked before tiering: revenue under the year's floor,
    /// revenue over the regime ceiling or head count over the regime ceiling
    /// all make the regime inapplicable.
    fn simplified_rate(
        &self,
        year: PolicyYear,
        revenue: Decimal,
        employees: u32,
    ) -> Result<RateResult, RateError> {
        let policy = &self.policy.simplified;
        let ineligible = |reason| inapplicable(TaxRegime::Simplified, year, reason);

        let floor = policy.revenue_floor.get(year);
        if !floor.admits(revenue) {
            return Err(ineligible(IneligibilityReason::RevenueBelowFloor {
                revenue,
                floor: floor.limit,
            }));
        }
        if !policy.revenue_ceiling.admits(revenue) {
            return Err(ineligible(IneligibilityReason::RevenueAboveCeiling {
                revenue,
                ceiling: policy.revenue_ceiling.limit,
            }));
        }
        if let Some(ceiling) = policy.headcount_ceiling {
            if !ceiling.admits(employees) {
                return Err(ineligible(IneligibilityReason::HeadcountAboveCeiling {
                    employees,
                    ceiling: ceiling.limit,
                }));
            }
        }

        let within_base_tier = policy.base_revenue_ceiling.admits(revenue)
            && policy
                .base_headcount_ceiling
                .is_none_or(|ceiling| ceiling.admits(employees));

        let rate_percent = if within_base_tier {
            policy.base_rate
        } else {
            policy.elevated_rate
        };

        Ok(RateResult {
            regime: TaxRegime::Simplified,
            year,
            rate_percent,
            headcount_eligible: None,
        })
    }

    fn patent_rate(
        &self,
        year: PolicyYear,
        revenue: Decimal,
        employees: u32,
    ) -> Result<RateResult, RateError> {
        let policy = &self.policy.patent;

        let ceiling = policy.revenue_ceiling.get(year);
        if !ceiling.admits(revenue) {
            return Err(inapplicable(
                TaxRegime::Patent,
                year,
                IneligibilityReason::RevenueAboveCeiling {
                    revenue,
                    ceiling: ceiling.limit,
                },
            ));
        }
        if !policy.headcount_ceiling.admits(employees) {
            return Err(inapplicable(
                TaxRegime::Patent,
                year,
                IneligibilityReason::HeadcountAboveCeiling {
                    employees,
                    ceiling: policy.headcount_ceiling.limit,
                },
            ));
        }

        Ok(RateResult {
            regime: TaxRegime::Patent,
            year,
            rate_percent: policy.rate,
            headcount_eligible: None,
        })
    }

    fn automated_simplified_rate(
        &self,
        year: PolicyYear,
        revenue: Decimal,
        employees: u32,
    ) -> Result<RateResult, RateError> {
        let policy = &self.policy.automated_simplified;

        if !policy.revenue_ceiling.admits(revenue) {
            return Err(inapplicable(
                TaxRegime::AutomatedSimplified,
                year,
                IneligibilityReason::RevenueAboveCeiling {
                    revenue,
                    ceiling: policy.revenue_ceiling.limit,
                },
            ));
        }

        Ok(RateResult {
            regime: TaxRegime::AutomatedSimplified,
            year,
            rate_percent: policy.rate,
            headcount_eligible: Some(policy.headcount_ceiling.admits(employees)),
        })
    }
}

fn inapplicable(
    regime: TaxRegime,
    year: PolicyYear,
    reason: IneligibilityReason,
) -> RateError {
    RateError::InapplicableRegime(Ineligibility {
        regime,
        year,
        reason,
    })
}

/// Resolves `query` against the default policy.
///
/// # Errors
///
/// See [`RateResolver::resolve`].
pub fn resolve_rate(query: &RateQuery) -> Result<RateResult, RateError> {
    RateResolver::default().resolve(query)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tracing_subscriber::fmt::format::FmtSpan;

    use super::*;
    use crate::InputError;
    use crate::models::{Ceiling, Floor, PerYear};

    /// Initializes tracing subscriber for tests that exercise log output.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_span_events(FmtSpan::NONE)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    fn rate(query: RateQuery) -> Decimal {
        resolve_rate(&query).unwrap().rate_percent
    }

    fn reason(query: RateQuery) -> IneligibilityReason {
        match resolve_rate(&query) {
            Err(RateError::InapplicableRegime(ineligibility)) => ineligibility.reason,
            other => panic!("expected InapplicableRegime, got {other:?}"),
        }
    }

    fn general(year: PolicyYear) -> RateQuery {
        RateQuery::new(TaxRegime::General, year)
    }

    fn simplified(
        year: PolicyYear,
        revenue: Decimal,
        employees: u32,
    ) -> RateQuery {
        RateQuery::new(TaxRegime::Simplified, year)
            .with_revenue(revenue)
            .with_employees(employees)
    }

    fn patent(
        year: PolicyYear,
        revenue: Decimal,
        employees: u32,
    ) -> RateQuery {
        RateQuery::new(TaxRegime::Patent, year)
            .with_revenue(revenue)
            .with_employees(employees)
    }

    // =========================================================================
    // Input validation tests
    // =========================================================================

    #[test]
    fn resolve_rejects_negative_revenue() {
        let query = simplified(PolicyYear::Y2025, dec!(-1), 0);

        let result = resolve_rate(&query);

        assert_eq!(
            result,
            Err(RateError::InvalidInput(InputError::Negative {
                field: "revenue",
                value: dec!(-1),
            }))
        );
    }

    #[test]
    fn resolve_rejects_negative_selected_rate() {
        let query = general(PolicyYear::Y2025).with_selected_rate(dec!(-20));

        let result = resolve_rate(&query);

        assert_eq!(
            result,
            Err(RateError::InvalidInput(InputError::Negative {
                field: "selected rate",
                value: dec!(-20),
            }))
        );
    }

    // =========================================================================
    // General regime tests
    // =========================================================================

    #[test]
    fn general_export_activity_is_zero_rated() {
        let query = general(PolicyYear::Y2025).with_classification("51.1", "cargo export");

        assert_eq!(rate(query), dec!(0));
    }

    #[test]
    fn general_food_activity_is_reduced_rate() {
        let query = general(PolicyYear::Y2025).with_classification("10.5", "dairy products");

        assert_eq!(rate(query), dec!(10));
    }

    #[test]
    fn general_other_activity_is_standard_rate() {
        let query = general(PolicyYear::Y2025).with_classification("62.01", "software");

        assert_eq!(rate(query), dec!(20));
    }

    #[test]
    fn general_without_classification_uses_standard_rate() {
        assert_eq!(rate(general(PolicyYear::Y2025)), dec!(20));
        assert_eq!(rate(general(PolicyYear::Y2026)), dec!(22));
    }

    #[test]
    fn general_following_year_raises_only_standard_rate() {
        let software = general(PolicyYear::Y2026).with_classification("62.01", "software");
        let dairy = general(PolicyYear::Y2026).with_classification("10.5", "dairy products");
        let export = general(PolicyYear::Y2026).with_classification("51.1", "cargo export");

        assert_eq!(rate(software), dec!(22));
        assert_eq!(rate(dairy), dec!(10));
        assert_eq!(rate(export), dec!(0));
    }

    #[test]
    fn general_selected_rate_overrides_classification() {
        let query = general(PolicyYear::Y2025)
            .with_classification("10.5", "dairy products")
            .with_selected_rate(dec!(20));

        assert_eq!(rate(query), dec!(20));
    }

    #[test]
    fn general_selected_rate_is_carried_into_following_year() {
        let standard = general(PolicyYear::Y2026).with_selected_rate(dec!(20));
        let reduced = general(PolicyYear::Y2026).with_selected_rate(dec!(10));

        assert_eq!(rate(standard), dec!(22));
        assert_eq!(rate(reduced), dec!(10));
    }

    #[test]
    fn general_ignores_revenue_and_staff() {
        let query = general(PolicyYear::Y2025)
            .with_revenue(dec!(10000))
            .with_employees(5000);

        assert_eq!(rate(query), dec!(20));
    }

    #[test]
    fn suggest_rate_matches_category_rate() {
        let resolver = RateResolver::default();

        assert_eq!(resolver.suggest_rate("10.11", "Переработка мяса"), dec!(10));
        assert_eq!(
            resolver.suggest_category("62.01", "software"),
            VatCategory::Standard
        );
    }

    // =========================================================================
    // Simplified regime tests
    // =========================================================================

    #[test]
    fn simplified_below_floor_is_inapplicable() {
        let _guard = init_test_tracing();

        let result = reason(simplified(PolicyYear::Y2025, dec!(59), 10));

        assert_eq!(
            result,
            IneligibilityReason::RevenueBelowFloor {
                revenue: dec!(59),
                floor: dec!(60),
            }
        );
    }

    #[test]
    fn simplified_at_floor_is_base_rate() {
        assert_eq!(rate(simplified(PolicyYear::Y2025, dec!(60), 50)), dec!(6));
    }

    #[test]
    fn simplified_floor_is_lower_in_2026() {
        assert_eq!(rate(simplified(PolicyYear::Y2026, dec!(10), 5)), dec!(6));
        assert_eq!(
            reason(simplified(PolicyYear::Y2026, dec!(9.99), 5)),
            IneligibilityReason::RevenueBelowFloor {
                revenue: dec!(9.99),
                floor: dec!(10),
            }
        );
    }

    #[test]
    fn simplified_base_tier_includes_its_upper_bounds() {
        assert_eq!(rate(simplified(PolicyYear::Y2025, dec!(250), 100)), dec!(6));
    }

    #[test]
    fn simplified_revenue_over_base_tier_is_elevated_rate() {
        assert_eq!(rate(simplified(PolicyYear::Y2025, dec!(300), 50)), dec!(8));
        assert_eq!(rate(simplified(PolicyYear::Y2025, dec!(250.01), 1)), dec!(8));
    }

    #[test]
    fn simplified_headcount_over_base_tier_is_elevated_rate() {
        assert_eq!(rate(simplified(PolicyYear::Y2025, dec!(100), 101)), dec!(8));
        assert_eq!(rate(simplified(PolicyYear::Y2026, dec!(100), 130)), dec!(8));
    }

    #[test]
    fn simplified_at_ceiling_is_elevated_rate() {
        assert_eq!(rate(simplified(PolicyYear::Y2025, dec!(450), 130)), dec!(8));
    }

    #[test]
    fn simplified_above_revenue_ceiling_is_inapplicable() {
        assert_eq!(
            reason(simplified(PolicyYear::Y2025, dec!(500), 10)),
            IneligibilityReason::RevenueAboveCeiling {
                revenue: dec!(500),
                ceiling: dec!(450),
            }
        );
    }

    #[test]
    fn simplified_above_headcount_ceiling_is_inapplicable_regardless_of_revenue() {
        for revenue in [dec!(60), dec!(100), dec!(250), dec!(450)] {
            assert_eq!(
                reason(simplified(PolicyYear::Y2025, revenue, 131)),
                IneligibilityReason::HeadcountAboveCeiling {
                    employees: 131,
                    ceiling: 130,
                }
            );
        }
    }

    #[test]
    fn simplified_inapplicable_is_distinct_from_zero_rate() {
        let error = resolve_rate(&simplified(PolicyYear::Y2025, dec!(0), 0)).unwrap_err();

        assert!(error.is_inapplicable());
        assert_eq!(
            error.ineligibility().map(|i| i.regime),
            Some(TaxRegime::Simplified)
        );
    }

    #[test]
    fn simplified_revenue_only_policy_ignores_headcount() {
        let mut policy = RatePolicy::default();
        policy.simplified.revenue_floor = PerYear::uniform(Floor::inclusive(dec!(60)));
        policy.simplified.base_rate = dec!(5);
        policy.simplified.elevated_rate = dec!(7);
        policy.simplified.base_revenue_ceiling = Ceiling::exclusive(dec!(250));
        policy.simplified.base_headcount_ceiling = None;
        policy.simplified.headcount_ceiling = None;
        let resolver = RateResolver::new(policy);

        let resolve = |revenue, employees| {
            resolver
                .resolve(&simplified(PolicyYear::Y2025, revenue, employees))
                .map(|result| result.rate_percent)
        };

        assert_eq!(resolve(dec!(249.99), 500), Ok(dec!(5)));
        assert_eq!(resolve(dec!(250), 0), Ok(dec!(7)));
        assert_eq!(resolve(dec!(450), 0), Ok(dec!(7)));
        assert!(resolve(dec!(451), 0).unwrap_err().is_inapplicable());
    }

    // =========================================================================
    // Patent regime tests
    // =========================================================================

    #[test]
    fn patent_within_limits_is_fixed_rate() {
        assert_eq!(rate(patent(PolicyYear::Y2025, dec!(60), 15)), dec!(6));
    }

    #[test]
    fn patent_above_revenue_ceiling_is_inapplicable() {
        assert_eq!(
            reason(patent(PolicyYear::Y2025, dec!(61), 1)),
            IneligibilityReason::RevenueAboveCeiling {
                revenue: dec!(61),
                ceiling: dec!(60),
            }
        );
    }

    #[test]
    fn patent_above_headcount_ceiling_is_inapplicable() {
        assert_eq!(
            reason(patent(PolicyYear::Y2025, dec!(10), 16)),
            IneligibilityReason::HeadcountAboveCeiling {
                employees: 16,
                ceiling: 15,
            }
        );
    }

    #[test]
    fn patent_ceiling_is_lower_in_2026() {
        assert_eq!(rate(patent(PolicyYear::Y2026, dec!(20), 15)), dec!(6));
        assert!(
            resolve_rate(&patent(PolicyYear::Y2026, dec!(21), 1))
                .unwrap_err()
                .is_inapplicable()
        );
    }

    // =========================================================================
    // Automated simplified regime tests
    // =========================================================================

    #[test]
    fn automated_simplified_within_ceiling_is_zero_rate() {
        let query = RateQuery::new(TaxRegime::AutomatedSimplified, PolicyYear::Y2025)
            .with_revenue(dec!(60))
            .with_employees(3);

        let result = resolve_rate(&query).unwrap();

        assert_eq!(
            result,
            RateResult {
                regime: TaxRegime::AutomatedSimplified,
                year: PolicyYear::Y2025,
                rate_percent: dec!(0),
                headcount_eligible: Some(true),
            }
        );
    }

    #[test]
    fn automated_simplified_headcount_signal_does_not_change_rate() {
        let query = RateQuery::new(TaxRegime::AutomatedSimplified, PolicyYear::Y2026)
            .with_revenue(dec!(30))
            .with_employees(6);

        let result = resolve_rate(&query).unwrap();

        assert_eq!(result.rate_percent, dec!(0));
        assert_eq!(result.headcount_eligible, Some(false));
    }

    #[test]
    fn automated_simplified_above_ceiling_is_inapplicable() {
        let query = RateQuery::new(TaxRegime::AutomatedSimplified, PolicyYear::Y2025)
            .with_revenue(dec!(60.5));

        assert_eq!(
            reason(query),
            IneligibilityReason::RevenueAboveCeiling {
                revenue: dec!(60.5),
                ceiling: dec!(60),
            }
        );
    }
}

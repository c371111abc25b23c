use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ActivityClassificationEntry, PolicyYear, TaxRegime};

/// Input to rate resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuery {
    pub regime: TaxRegime,
    pub year: PolicyYear,

    /// Annual revenue in millions of roubles.
    pub revenue_millions: Decimal,

    #[serde(default)]
    pub employee_count: u32,

    #[serde(default)]
    pub classification_code: Option<String>,

    #[serde(default)]
    pub classification_name: Option<String>,

    /// General-regime rate picked by the user for the base year.
    ///
    /// Takes precedence over the rate suggested from the classification. The
    /// following year's rate is derived from it.
    #[serde(default)]
    pub selected_rate: Option<Decimal>,
}

impl RateQuery {
    pub fn new(
        regime: TaxRegime,
        year: PolicyYear,
    ) -> Self {
        Self {
            regime,
            year,
            revenue_millions: Decimal::ZERO,
            employee_count: 0,
            classification_code: None,
            classification_name: None,
            selected_rate: None,
        }
    }

    pub fn with_revenue(
        mut self,
        revenue_millions: Decimal,
    ) -> Self {
        self.revenue_millions = revenue_millions;
        self
    }

    pub fn with_employees(
        mut self,
        employee_count: u32,
    ) -> Self {
        self.employee_count = employee_count;
        self
    }

    pub fn with_classification(
        mut self,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.classification_code = Some(code.into());
        self.classification_name = Some(name.into());
        self
    }

    pub fn with_entry(
        self,
        entry: &ActivityClassificationEntry,
    ) -> Self {
        self.with_classification(entry.code.clone(), entry.name.clone())
    }

    pub fn with_selected_rate(
        mut self,
        rate_percent: Decimal,
    ) -> Self {
        self.selected_rate = Some(rate_percent);
        self
    }

    /// Returns `true` when a code or a name was supplied.
    pub fn has_classification(&self) -> bool {
        self.classification_code.is_some() || self.classification_name.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateResult {
    pub regime: TaxRegime,
    pub year: PolicyYear,
    pub rate_percent: Decimal,

    /// Whether the head count is within the small-business ceiling.
    ///
    /// Only reported for the automated simplified regime; it does not change
    /// the rate.
    pub headcount_eligible: Option<bool>,
}

/// Why a regime cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IneligibilityReason {
    RevenueBelowFloor { revenue: Decimal, floor: Decimal },
    RevenueAboveCeiling { revenue: Decimal, ceiling: Decimal },
    HeadcountAboveCeiling { employees: u32, ceiling: u32 },
}

impl fmt::Display for IneligibilityReason {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::RevenueBelowFloor { revenue, floor } => {
                write!(f, "revenue {revenue}M is below the {floor}M floor")
            }
            Self::RevenueAboveCeiling { revenue, ceiling } => {
                write!(f, "revenue {revenue}M exceeds the {ceiling}M ceiling")
            }
            Self::HeadcountAboveCeiling { employees, ceiling } => {
                write!(f, "{employees} employees exceed the limit of {ceiling}")
            }
        }
    }
}

/// A regime that is not available for the queried business and year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ineligibility {
    pub regime: TaxRegime,
    pub year: PolicyYear,
    pub reason: IneligibilityReason,
}

impl fmt::Display for Ineligibility {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{} regime is not applicable in {}: {}",
            self.regime, self.year, self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_query_defaults_to_zero_revenue_and_staff() {
        let query = RateQuery::new(TaxRegime::Simplified, PolicyYear::Y2025);

        assert_eq!(query.revenue_millions, Decimal::ZERO);
        assert_eq!(query.employee_count, 0);
        assert!(!query.has_classification());
        assert_eq!(query.selected_rate, None);
    }

    #[test]
    fn with_entry_copies_code_and_name() {
        let entry = ActivityClassificationEntry::new("10.11", "Meat processing").unwrap();

        let query = RateQuery::new(TaxRegime::General, PolicyYear::Y2025).with_entry(&entry);

        assert_eq!(query.classification_code.as_deref(), Some("10.11"));
        assert_eq!(query.classification_name.as_deref(), Some("Meat processing"));
    }

    #[test]
    fn ineligibility_message_names_regime_year_and_limit() {
        let ineligibility = Ineligibility {
            regime: TaxRegime::Patent,
            year: PolicyYear::Y2026,
            reason: IneligibilityReason::RevenueAboveCeiling {
                revenue: dec!(25),
                ceiling: dec!(20),
            },
        };

        assert_eq!(
            ineligibility.to_string(),
            "patent regime is not applicable in 2026: revenue 25M exceeds the 20M ceiling"
        );
    }
}

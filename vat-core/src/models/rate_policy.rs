//! Rate schedules and eligibility thresholds for every regime.
//!
//! The rules are data: thresholds, rates and whether each boundary value is
//! itself admitted can all be changed through a policy file without touching
//! the resolver. [`RatePolicy::default`] holds the canonical schedules.
//!
//! | Regime               | Rule |
//! |----------------------|------|
//! | General              | 0% for exports, 10% for food/children's goods/medicine/books, otherwise 20% (22% in 2026) |
//! | Simplified           | revenue below the floor (60M in 2025, 10M in 2026) or above 450M, or more than 130 employees: not applicable; up to 250M and 100 employees: 6%; otherwise 8% |
//! | Patent               | 6% up to 60M revenue (20M in 2026) and 15 employees |
//! | Automated simplified | 0% up to 60M revenue; 5 employees is reported as a signal |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{PerYear, PolicyYear, VatCategory};

/// Errors found while validating a [`RatePolicy`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("{field} must be between 0 and 100 percent, got {rate}")]
    RateOutOfRange { field: &'static str, rate: Decimal },

    #[error("{field} must be non-negative, got {limit}")]
    NegativeLimit { field: &'static str, limit: Decimal },

    #[error("{tier} must not exceed {ceiling}")]
    TierAboveCeiling {
        tier: &'static str,
        ceiling: &'static str,
    },
}

/// Whether the limit value itself is admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    #[default]
    Inclusive,
    Exclusive,
}

/// Upper bound: admits values up to `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ceiling<T> {
    pub limit: T,
    #[serde(default)]
    pub boundary: Boundary,
}

impl<T: PartialOrd + Copy> Ceiling<T> {
    pub fn inclusive(limit: T) -> Self {
        Self {
            limit,
            boundary: Boundary::Inclusive,
        }
    }

    pub fn exclusive(limit: T) -> Self {
        Self {
            limit,
            boundary: Boundary::Exclusive,
        }
    }

    pub fn admits(
        &self,
        value: T,
    ) -> bool {
        match self.boundary {
            Boundary::Inclusive => value <= self.limit,
            Boundary::Exclusive => value < self.limit,
        }
    }
}

/// Lower bound: admits values from `limit` upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor<T> {
    pub limit: T,
    #[serde(default)]
    pub boundary: Boundary,
}

impl<T: PartialOrd + Copy> Floor<T> {
    pub fn inclusive(limit: T) -> Self {
        Self {
            limit,
            boundary: Boundary::Inclusive,
        }
    }

    pub fn exclusive(limit: T) -> Self {
        Self {
            limit,
            boundary: Boundary::Exclusive,
        }
    }

    pub fn admits(
        &self,
        value: T,
    ) -> bool {
        match self.boundary {
            Boundary::Inclusive => value >= self.limit,
            Boundary::Exclusive => value > self.limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RatePolicy {
    pub general: GeneralRegimePolicy,
    pub simplified: SimplifiedRegimePolicy,
    pub patent: PatentRegimePolicy,
    pub automated_simplified: AutomatedSimplifiedPolicy,
}

impl RatePolicy {
    /// Validates every regime section.
    ///
    /// # Errors
    ///
    /// Returns the first [`PolicyError`] found.
    pub fn validate(&self) -> Result<(), PolicyError> {
        self.general.validate()?;
        self.simplified.validate()?;
        self.patent.validate()?;
        self.automated_simplified.validate()
    }
}

/// VAT rates of the general regime and the activity rules that pick them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralRegimePolicy {
    pub zero_rate: Decimal,
    pub reduced_rate: Decimal,
    pub standard_rate: PerYear<Decimal>,

    /// Code prefixes of zero-rated activities.
    pub zero_rate_code_prefixes: Vec<String>,
    /// Lower-case name fragments of zero-rated activities.
    pub zero_rate_keywords: Vec<String>,
    pub reduced_rate_code_prefixes: Vec<String>,
    pub reduced_rate_keywords: Vec<String>,
}

impl Default for GeneralRegimePolicy {
    fn default() -> Self {
        Self {
            zero_rate: dec!(0),
            reduced_rate: dec!(10),
            standard_rate: PerYear::new(dec!(20), dec!(22)),
            zero_rate_code_prefixes: strings(&["51"]),
            zero_rate_keywords: strings(&["экспорт", "международн", "export", "international"]),
            reduced_rate_code_prefixes: strings(&["10.", "11.", "47.2"]),
            reduced_rate_keywords: strings(&[
                "продовольств",
                "пищев",
                "детск",
                "медицин",
                "лекарств",
                "книж",
                "издател",
                "food",
                "child",
                "medic",
                "pharma",
                "books",
                "publish",
            ]),
        }
    }
}

impl GeneralRegimePolicy {
    /// Picks the VAT category for an activity.
    ///
    /// Zero-rated rules are checked before reduced-rate rules; code prefixes
    /// and name fragments are compared case-insensitively.
    pub fn classify(
        &self,
        code: &str,
        name: &str,
    ) -> VatCategory {
        let code = code.trim().to_lowercase();
        let name = name.to_lowercase();

        let matches = |prefixes: &[String], keywords: &[String]| {
            prefixes
                .iter()
                .any(|prefix| !prefix.is_empty() && code.starts_with(&prefix.to_lowercase()))
                || keywords
                    .iter()
                    .any(|keyword| !keyword.is_empty() && name.contains(&keyword.to_lowercase()))
        };

        if matches(&self.zero_rate_code_prefixes, &self.zero_rate_keywords) {
            VatCategory::ZeroRated
        } else if matches(&self.reduced_rate_code_prefixes, &self.reduced_rate_keywords) {
            VatCategory::Reduced
        } else {
            VatCategory::Standard
        }
    }

    pub fn category_rate(
        &self,
        category: VatCategory,
        year: PolicyYear,
    ) -> Decimal {
        match category {
            VatCategory::ZeroRated => self.zero_rate,
            VatCategory::Reduced => self.reduced_rate,
            VatCategory::Standard => *self.standard_rate.get(year),
        }
    }

    /// Maps a 2025 rate to the rate charged for the same supply in 2026.
    ///
    /// Only the standard rate changes; every other rate carries over.
    pub fn following_year_rate(
        &self,
        rate: Decimal,
    ) -> Decimal {
        if rate == self.standard_rate.y2025 {
            self.standard_rate.y2026
        } else {
            rate
        }
    }

    fn validate(&self) -> Result<(), PolicyError> {
        check_rate("general.zero_rate", self.zero_rate)?;
        check_rate("general.reduced_rate", self.reduced_rate)?;
        check_rate("general.standard_rate.2025", self.standard_rate.y2025)?;
        check_rate("general.standard_rate.2026", self.standard_rate.y2026)
    }
}

/// Tiers of the simplified regime.
///
/// The head-count ceilings are optional: a policy without them tiers on
/// revenue alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedRegimePolicy {
    pub revenue_floor: PerYear<Floor<Decimal>>,
    pub base_rate: Decimal,
    pub elevated_rate: Decimal,

    /// Upper bound of the base-rate tier.
    pub base_revenue_ceiling: Ceiling<Decimal>,
    #[serde(default)]
    pub base_headcount_ceiling: Option<Ceiling<u32>>,

    /// Upper bound of the regime itself.
    pub revenue_ceiling: Ceiling<Decimal>,
    #[serde(default)]
    pub headcount_ceiling: Option<Ceiling<u32>>,
}

impl Default for SimplifiedRegimePolicy {
    fn default() -> Self {
        Self {
            revenue_floor: PerYear::new(Floor::inclusive(dec!(60)), Floor::inclusive(dec!(10))),
            base_rate: dec!(6),
            elevated_rate: dec!(8),
            base_revenue_ceiling: Ceiling::inclusive(dec!(250)),
            base_headcount_ceiling: Some(Ceiling::inclusive(100)),
            revenue_ceiling: Ceiling::inclusive(dec!(450)),
            headcount_ceiling: Some(Ceiling::inclusive(130)),
        }
    }
}

impl SimplifiedRegimePolicy {
    fn validate(&self) -> Result<(), PolicyError> {
        check_rate("simplified.base_rate", self.base_rate)?;
        check_rate("simplified.elevated_rate", self.elevated_rate)?;
        check_limit("simplified.revenue_floor.2025", self.revenue_floor.y2025.limit)?;
        check_limit("simplified.revenue_floor.2026", self.revenue_floor.y2026.limit)?;
        check_limit(
            "simplified.base_revenue_ceiling",
            self.base_revenue_ceiling.limit,
        )?;
        check_limit("simplified.revenue_ceiling", self.revenue_ceiling.limit)?;

        if self.base_revenue_ceiling.limit > self.revenue_ceiling.limit {
            return Err(PolicyError::TierAboveCeiling {
                tier: "simplified.base_revenue_ceiling",
                ceiling: "simplified.revenue_ceiling",
            });
        }
        if let (Some(base), Some(ceiling)) = (self.base_headcount_ceiling, self.headcount_ceiling) {
            if base.limit > ceiling.limit {
                return Err(PolicyError::TierAboveCeiling {
                    tier: "simplified.base_headcount_ceiling",
                    ceiling: "simplified.headcount_ceiling",
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatentRegimePolicy {
    pub rate: Decimal,
    pub revenue_ceiling: PerYear<Ceiling<Decimal>>,
    pub headcount_ceiling: Ceiling<u32>,
}

impl Default for PatentRegimePolicy {
    fn default() -> Self {
        Self {
            rate: dec!(6),
            revenue_ceiling: PerYear::new(
                Ceiling::inclusive(dec!(60)),
                Ceiling::inclusive(dec!(20)),
            ),
            headcount_ceiling: Ceiling::inclusive(15),
        }
    }
}

impl PatentRegimePolicy {
    fn validate(&self) -> Result<(), PolicyError> {
        check_rate("patent.rate", self.rate)?;
        check_limit("patent.revenue_ceiling.2025", self.revenue_ceiling.y2025.limit)?;
        check_limit("patent.revenue_ceiling.2026", self.revenue_ceiling.y2026.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomatedSimplifiedPolicy {
    pub rate: Decimal,
    pub revenue_ceiling: Ceiling<Decimal>,

    /// Small-business head count. Reported to the caller, never changes the rate.
    pub headcount_ceiling: Ceiling<u32>,
}

impl Default for AutomatedSimplifiedPolicy {
    fn default() -> Self {
        Self {
            rate: dec!(0),
            revenue_ceiling: Ceiling::inclusive(dec!(60)),
            headcount_ceiling: Ceiling::inclusive(5),
        }
    }
}

impl AutomatedSimplifiedPolicy {
    fn validate(&self) -> Result<(), PolicyError> {
        check_rate("automated_simplified.rate", self.rate)?;
        check_limit(
            "automated_simplified.revenue_ceiling",
            self.revenue_ceiling.limit,
        )
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn check_rate(
    field: &'static str,
    rate: Decimal,
) -> Result<(), PolicyError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err(PolicyError::RateOutOfRange { field, rate });
    }
    Ok(())
}

fn check_limit(
    field: &'static str,
    limit: Decimal,
) -> Result<(), PolicyError> {
    if limit < Decimal::ZERO {
        return Err(PolicyError::NegativeLimit { field, limit });
    }
    Ok(())
}

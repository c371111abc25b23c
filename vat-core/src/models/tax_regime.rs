use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// General regime: the business charges VAT.
    General,
    /// Simplified regime with revenue and head-count tiers.
    Simplified,
    /// Patent regime.
    Patent,
    /// Automated simplified regime for small businesses.
    AutomatedSimplified,
}

impl TaxRegime {
    pub const ALL: [TaxRegime; 4] = [
        Self::General,
        Self::Simplified,
        Self::Patent,
        Self::AutomatedSimplified,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Simplified => "simplified",
            Self::Patent => "patent",
            Self::AutomatedSimplified => "automated_simplified",
        }
    }

    /// Label of the tax the regime levies, as printed next to amounts.
    pub fn tax_label(&self) -> &'static str {
        match self {
            Self::General => "НДС",
            Self::Simplified => "УСН",
            Self::Patent => "ПСН",
            Self::AutomatedSimplified => "АУСН",
        }
    }

    /// Parses a regime tag.
    ///
    /// Accepts the canonical tags returned by [`TaxRegime::as_str`] and the
    /// abbreviations `osn`, `usn`, `psn` and `ausn`, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" | "osn" => Some(Self::General),
            "simplified" | "usn" => Some(Self::Simplified),
            "patent" | "psn" => Some(Self::Patent),
            "automated_simplified" | "automated-simplified" | "ausn" => {
                Some(Self::AutomatedSimplified)
            }
            _ => None,
        }
    }
}

impl FromStr for TaxRegime {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| RateError::UnsupportedRegime(s.to_string()))
    }
}

impl fmt::Display for TaxRegime {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

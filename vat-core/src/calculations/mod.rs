//! Rate and amount calculations.
//!
//! This module provides the pure computation core: rate resolution per tax
//! regime, tax amounts, year-over-year comparison and classification lookup.

pub mod common;
pub mod comparison;
pub mod estimate;
pub mod matcher;
pub mod money;
pub mod rate_resolver;

pub use comparison::{Trend, YearComparison, compare_years};
pub use estimate::{EstimateRequest, TwoYearEstimate, YearOutcome, estimate};
pub use matcher::{ClassificationMatches, DISPLAY_LIMIT, match_classification};
pub use money::{MoneyComputation, compute_tax, compute_tax_f64};
pub use rate_resolver::{RateResolver, resolve_rate};

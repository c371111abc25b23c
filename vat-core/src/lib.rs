pub mod calculations;
pub mod error;
pub mod models;

pub use calculations::{
    MoneyComputation, RateResolver, YearComparison, compare_years, compute_tax,
    match_classification, resolve_rate,
};
pub use error::{InputError, RateError};
pub use models::*;

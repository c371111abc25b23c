mod classification;
mod policy_year;
mod rate_policy;
mod rate_query;
mod tax_regime;

pub use classification::{ActivityClassificationEntry, ClassificationTable, VatCategory};
pub use policy_year::{PerYear, PolicyYear};
pub use rate_policy::{
    AutomatedSimplifiedPolicy, Boundary, Ceiling, Floor, GeneralRegimePolicy, PatentRegimePolicy,
    PolicyError, RatePolicy, SimplifiedRegimePolicy,
};
pub use rate_query::{Ineligibility, IneligibilityReason, RateQuery, RateResult};
pub use tax_regime::TaxRegime;

//! Rate policy files.
//!
//! A policy file is TOML. Sections that are left out keep the built-in
//! schedules; a `[simplified]` section must be complete, and leaving out its
//! head-count ceilings tiers the regime on revenue alone.
//!
//! ```toml
//! [general]
//! standard_rate = { 2025 = 20, 2026 = 22 }
//!
//! [simplified]
//! base_rate = 5
//! elevated_rate = 7
//! revenue_floor = { 2025 = { limit = 60 }, 2026 = { limit = 60 } }
//! base_revenue_ceiling = { limit = 250, boundary = "exclusive" }
//! revenue_ceiling = { limit = 450 }
//! ```

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;
use vat_core::{PolicyError, RatePolicy};

#[derive(Debug, Error)]
pub enum PolicyLoaderError {
    #[error("failed to read policy file: {0}")]
    Read(#[from] std::io::Error),

    #[error("policy parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid policy: {0}")]
    Invalid(#[from] PolicyError),
}

pub struct PolicyLoader;

impl PolicyLoader {
    /// Parse and validate a policy document.
    pub fn from_toml_str(input: &str) -> Result<RatePolicy, PolicyLoaderError> {
        let policy: RatePolicy = toml::from_str(input)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn from_file(path: &Path) -> Result<RatePolicy, PolicyLoaderError> {
        let contents = fs::read_to_string(path)?;
        let policy = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), "loaded rate policy");
        Ok(policy)
    }
}

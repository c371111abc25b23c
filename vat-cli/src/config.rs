//! Configuration file for `vat-calc`.
//!
//! ```toml
//! classifications = "data/okved.csv"
//! policy = "policy.toml"
//! display_limit = 20
//! log_level = "debug"
//! log_file = "vat-calc.log"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.
//! Command-line flags override every setting.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use vat_core::calculations::DISPLAY_LIMIT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("display_limit must be at least 1")]
    ZeroDisplayLimit,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Classification table, `.csv` or `.json`. The built-in sample is used
    /// when unset.
    pub classifications: Option<PathBuf>,

    /// Rate policy overrides.
    pub policy: Option<PathBuf>,

    /// Maximum number of search results printed.
    pub display_limit: usize,

    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: Option<String>,

    /// Append log records to this file as well.
    pub log_file: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            classifications: None,
            policy: None,
            display_limit: DISPLAY_LIMIT,
            log_level: None,
            log_file: None,
        }
    }
}

impl CliConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display_limit == 0 {
            return Err(ConfigError::ZeroDisplayLimit);
        }
        Ok(())
    }

    fn resolve_paths(
        &mut self,
        base: &Path,
    ) {
        for path in [
            &mut self.classifications,
            &mut self.policy,
            &mut self.log_file,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

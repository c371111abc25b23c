use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use vat_core::calculations::{EstimateRequest, TwoYearEstimate, estimate};
use vat_core::{
    ActivityClassificationEntry, ClassificationTable, PolicyYear, RateError, RateQuery,
    RateResolver, RateResult, TaxRegime,
};
use vat_data::{PolicyLoader, load_or_empty, sample_classifications};

use crate::config::CliConfig;
use crate::report::{IneligibilityNotice, Suggestion};

/// Loaded policy and classification data shared by every command.
pub struct AppContext {
    pub resolver: RateResolver,
    pub table: ClassificationTable,
    pub display_limit: usize,
}

impl AppContext {
    /// Builds the context from merged settings.
    ///
    /// A broken policy file is an error. A missing or unreadable
    /// classification file degrades to an empty table.
    pub fn load(config: &CliConfig) -> Result<Self> {
        let resolver = match &config.policy {
            Some(path) => {
                let policy = PolicyLoader::from_file(path)
                    .with_context(|| format!("failed to load policy: {}", path.display()))?;
                info!(path = %path.display(), "using rate policy file");
                RateResolver::new(policy)
            }
            None => RateResolver::default(),
        };

        let table = match &config.classifications {
            Some(path) => load_or_empty(path),
            None => {
                debug!("no classification file configured; using the built-in sample");
                sample_classifications()
            }
        };

        Ok(Self {
            resolver,
            table,
            display_limit: config.display_limit,
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            resolver: RateResolver::default(),
            table: sample_classifications(),
            display_limit: CliConfig::default().display_limit,
        }
    }

    /// Looks up `code` in the table, warning when it is unknown.
    pub fn entry(
        &self,
        code: &str,
    ) -> Option<&ActivityClassificationEntry> {
        let entry = self.table.find(code.trim());
        if entry.is_none() {
            warn!(code, "activity code not found in the classification table");
        }
        entry
    }

    /// Runs the two-year estimate and, for the general regime, the rate
    /// suggested by the selected activity.
    pub fn estimate(
        &self,
        input: &EstimateInput,
    ) -> Result<(TwoYearEstimate, Option<Suggestion<'_>>)> {
        let mut request = EstimateRequest::new(input.regime, input.amount);
        request.revenue_millions = input.revenue_millions;
        request.employee_count = input.employees;
        request.selected_rate = input.selected_rate;

        let entry = input.code.as_deref().and_then(|code| self.entry(code));
        match entry {
            Some(entry) => {
                request.classification_code = Some(entry.code.clone());
                request.classification_name = Some(entry.name.clone());
            }
            None => request.classification_code = input.code.clone(),
        }

        let result = estimate(&self.resolver, &request).context("failed to compute estimate")?;

        let suggestion = entry
            .filter(|_| input.regime == TaxRegime::General)
            .map(|entry| Suggestion {
                entry,
                rate_percent: self.resolver.suggest_rate(&entry.code, &entry.name),
            });

        Ok((result, suggestion))
    }

    /// Resolves one rate. An inapplicable regime is reported as an error.
    pub fn rate(
        &self,
        input: &RateInput,
    ) -> Result<RateResult> {
        let mut query = RateQuery::new(input.regime, input.year)
            .with_revenue(input.revenue_millions)
            .with_employees(input.employees);
        if let Some(code) = &input.code {
            query = match self.entry(code) {
                Some(entry) => query.with_entry(entry),
                None => query.with_classification(code.clone(), String::new()),
            };
        }

        match self.resolver.resolve(&query) {
            Ok(result) => Ok(result),
            Err(RateError::InapplicableRegime(ineligibility)) => {
                bail!("{}", IneligibilityNotice(&ineligibility))
            }
            Err(error) => Err(error).context("failed to resolve rate"),
        }
    }

    /// Search limit: the requested one, capped at the configured limit.
    pub fn search_limit(
        &self,
        requested: Option<usize>,
    ) -> usize {
        requested
            .map(|limit| limit.min(self.display_limit))
            .unwrap_or(self.display_limit)
    }
}

#[derive(Debug, Clone)]
pub struct EstimateInput {
    pub regime: TaxRegime,
    pub amount: Decimal,
    pub revenue_millions: Decimal,
    pub employees: u32,
    pub code: Option<String>,
    pub selected_rate: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct RateInput {
    pub regime: TaxRegime,
    pub year: PolicyYear,
    pub revenue_millions: Decimal,
    pub employees: u32,
    pub code: Option<String>,
}

/// Overrides from the command line. `None` keeps the config file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub classifications: Option<PathBuf>,
    pub policy: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Applies command-line overrides on top of the config file.
pub fn merge_config(
    mut config: CliConfig,
    overrides: Overrides,
) -> CliConfig {
    if overrides.classifications.is_some() {
        config.classifications = overrides.classifications;
    }
    if overrides.policy.is_some() {
        config.policy = overrides.policy;
    }
    if overrides.log_level.is_some() {
        config.log_level = overrides.log_level;
    }
    config
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn estimate_input(regime: TaxRegime) -> EstimateInput {
        EstimateInput {
            regime,
            amount: dec!(100000),
            revenue_millions: Decimal::ZERO,
            employees: 0,
            code: None,
            selected_rate: None,
        }
    }

    fn rate_input(
        regime: TaxRegime,
        year: PolicyYear,
    ) -> RateInput {
        RateInput {
            regime,
            year,
            revenue_millions: Decimal::ZERO,
            employees: 0,
            code: None,
        }
    }

    // =========================================================================
    // estimate tests
    // =========================================================================

    #[test]
    fn estimate_uses_table_entry_for_general_regime() {
        let app = AppContext::with_defaults();
        let mut input = estimate_input(TaxRegime::General);
        input.code = Some("10.11".to_string());

        let (result, suggestion) = app.estimate(&input).unwrap();

        let suggestion = suggestion.expect("general regime should suggest a rate");
        assert_eq!(suggestion.entry.code, "10.11");
        assert_eq!(suggestion.rate_percent, dec!(10));
        assert_eq!(result.comparison.unwrap().difference, dec!(0));
    }

    #[test]
    fn estimate_selected_rate_overrides_suggestion() {
        let app = AppContext::with_defaults();
        let mut input = estimate_input(TaxRegime::General);
        input.code = Some("10.11".to_string());
        input.selected_rate = Some(dec!(20));

        let (result, suggestion) = app.estimate(&input).unwrap();

        assert_eq!(suggestion.unwrap().rate_percent, dec!(10));
        assert_eq!(result.comparison.unwrap().difference, dec!(2000));
    }

    #[test]
    fn estimate_has_no_suggestion_outside_general_regime() {
        let app = AppContext::with_defaults();
        let mut input = estimate_input(TaxRegime::Patent);
        input.code = Some("62.01".to_string());

        let (_, suggestion) = app.estimate(&input).unwrap();

        assert_eq!(suggestion, None);
    }

    #[test]
    fn estimate_rejects_negative_amount() {
        let app = AppContext::with_defaults();
        let mut input = estimate_input(TaxRegime::General);
        input.amount = dec!(-1);

        assert!(app.estimate(&input).is_err());
    }

    #[test]
    fn estimate_rejects_amount_beyond_decimal_range() {
        let app = AppContext::with_defaults();
        let mut input = estimate_input(TaxRegime::General);
        input.amount = Decimal::MAX;

        let err = app.estimate(&input).unwrap_err();

        assert!(format!("{err:#}").contains("base amount is out of range"));
    }

    // =========================================================================
    // rate tests
    // =========================================================================

    #[test]
    fn rate_for_simplified_tier() {
        let app = AppContext::with_defaults();
        let mut input = rate_input(TaxRegime::Simplified, PolicyYear::Y2026);
        input.revenue_millions = dec!(300);

        assert_eq!(app.rate(&input).unwrap().rate_percent, dec!(8));
    }

    #[test]
    fn inapplicable_rate_is_error_with_reason() {
        let app = AppContext::with_defaults();
        let mut input = rate_input(TaxRegime::Patent, PolicyYear::Y2026);
        input.revenue_millions = dec!(25);

        let err = app.rate(&input).unwrap_err();

        assert!(err.to_string().contains("ПСН в 2026 году не применяется"));
    }

    #[test]
    fn unknown_code_still_resolves_by_prefix() {
        let app = AppContext::with_defaults();
        let mut input = rate_input(TaxRegime::General, PolicyYear::Y2025);
        input.code = Some("51.22".to_string());

        assert_eq!(app.rate(&input).unwrap().rate_percent, dec!(0));
    }

    // =========================================================================
    // config helpers
    // =========================================================================

    #[test]
    fn search_limit_is_capped_by_config() {
        let app = AppContext::with_defaults();

        assert_eq!(app.search_limit(None), 50);
        assert_eq!(app.search_limit(Some(5)), 5);
        assert_eq!(app.search_limit(Some(500)), 50);
    }

    #[test]
    fn command_line_overrides_config_file() {
        let config = CliConfig {
            policy: Some(PathBuf::from("file.toml")),
            log_level: Some("warn".to_string()),
            ..CliConfig::default()
        };
        let overrides = Overrides {
            policy: Some(PathBuf::from("flag.toml")),
            ..Overrides::default()
        };

        let merged = merge_config(config, overrides);

        assert_eq!(merged.policy, Some(PathBuf::from("flag.toml")));
        assert_eq!(merged.log_level.as_deref(), Some("warn"));
        assert_eq!(merged.classifications, None);
    }

    #[test]
    fn load_without_files_uses_sample_table() {
        let app = AppContext::load(&CliConfig::default()).unwrap();

        assert_eq!(app.table.len(), 30);
    }

    #[test]
    fn load_with_missing_policy_fails() {
        let config = CliConfig {
            policy: Some(PathBuf::from("no/such/policy.toml")),
            ..CliConfig::default()
        };

        assert!(AppContext::load(&config).is_err());
    }
}

//! Plain-text rendering of engine results.

use std::fmt;

use rust_decimal::Decimal;
use vat_core::calculations::{TwoYearEstimate, Trend, YearComparison, YearOutcome};
use vat_core::{
    ActivityClassificationEntry, Ineligibility, IneligibilityReason, PolicyYear, RateResult,
    TaxRegime,
};

use crate::utils::{format_number, format_percent, format_rub, format_signed_rub};

/// Rate suggested from the selected classification entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion<'a> {
    pub entry: &'a ActivityClassificationEntry,
    pub rate_percent: Decimal,
}

/// The two-year form output.
pub struct EstimateReport<'a> {
    pub estimate: &'a TwoYearEstimate,
    pub suggestion: Option<Suggestion<'a>>,
}

impl fmt::Display for EstimateReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let regime = self.estimate.regime;
        writeln!(f, "Режим: {} ({})", regime.tax_label(), regime)?;

        if let Some(suggestion) = &self.suggestion {
            writeln!(
                f,
                "Рекомендуемая ставка для {}: {}",
                suggestion.entry,
                format_percent(suggestion.rate_percent)
            )?;
        }

        write_year(f, regime, PolicyYear::Y2025, "текущий год", &self.estimate.base_year)?;
        write_year(
            f,
            regime,
            PolicyYear::Y2026,
            "следующий год",
            &self.estimate.following_year,
        )?;

        match &self.estimate.comparison {
            Some(comparison) => write_comparison(f, comparison),
            None => writeln!(f, "Сравнение недоступно: режим применим не в оба года"),
        }
    }
}

fn write_year(
    f: &mut fmt::Formatter<'_>,
    regime: TaxRegime,
    year: PolicyYear,
    caption: &str,
    outcome: &YearOutcome,
) -> fmt::Result {
    let label = regime.tax_label();
    writeln!(f)?;
    writeln!(f, "{year} ({caption})")?;
    match outcome {
        YearOutcome::Applicable { computation, .. } => {
            writeln!(f, "  Ставка {label}: {}", format_percent(computation.rate_percent))?;
            writeln!(f, "  {label}: {}", format_rub(computation.tax_amount))?;
            writeln!(f, "  Итого с {label}: {}", format_rub(computation.total_amount))
        }
        YearOutcome::Inapplicable(ineligibility) => {
            writeln!(f, "  ⚠ {}", IneligibilityNotice(ineligibility))
        }
    }
}

fn write_comparison(
    f: &mut fmt::Formatter<'_>,
    comparison: &YearComparison,
) -> fmt::Result {
    writeln!(f)?;
    write!(f, "Разница 2026 к 2025: {}", format_signed_rub(comparison.difference))?;
    if let Some(ratio) = comparison.relative_change() {
        let percent = ratio * Decimal::ONE_HUNDRED;
        let sign = if percent > Decimal::ZERO { "+" } else { "" };
        write!(f, " ({sign}{})", format_percent(percent))?;
    }
    writeln!(f)?;
    writeln!(f, "{}", verdict(comparison))
}

/// One-line summary of what the change means for the payer.
pub fn verdict(comparison: &YearComparison) -> String {
    let amount = format_rub(comparison.difference.abs());
    match comparison.trend() {
        Trend::Increase => format!("В 2026 году вы заплатите на {amount} больше"),
        Trend::Decrease => format!("В 2026 году вы сэкономите {amount}"),
        Trend::Unchanged => "Разницы в налогах нет".to_string(),
    }
}

/// Localized explanation of why a regime does not apply.
pub struct IneligibilityNotice<'a>(pub &'a Ineligibility);

impl fmt::Display for IneligibilityNotice<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let ineligibility = self.0;
        write!(
            f,
            "{} в {} году не применяется: ",
            ineligibility.regime.tax_label(),
            ineligibility.year
        )?;
        match &ineligibility.reason {
            IneligibilityReason::RevenueBelowFloor { revenue, floor } => write!(
                f,
                "выручка {} млн ₽ ниже порога {} млн ₽",
                format_number(*revenue),
                format_number(*floor)
            ),
            IneligibilityReason::RevenueAboveCeiling { revenue, ceiling } => write!(
                f,
                "выручка {} млн ₽ превышает лимит {} млн ₽",
                format_number(*revenue),
                format_number(*ceiling)
            ),
            IneligibilityReason::HeadcountAboveCeiling { employees, ceiling } => write!(
                f,
                "численность {employees} чел. превышает лимит {ceiling} чел."
            ),
        }
    }
}

/// Output of a single rate lookup.
pub struct RateReport<'a>(pub &'a RateResult);

impl fmt::Display for RateReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let result = self.0;
        write!(
            f,
            "Ставка {} в {} году: {}",
            result.regime.tax_label(),
            result.year,
            format_percent(result.rate_percent)
        )?;
        if result.headcount_eligible == Some(false) {
            write!(f, " (численность выше лимита для малого бизнеса)")?;
        }
        Ok(())
    }
}

/// Renders up to `limit` search hits, one per line.
///
/// A trailing line reports that more entries matched.
pub fn render_matches<'a, I>(
    matches: I,
    limit: usize,
) -> String
where
    I: IntoIterator<Item = &'a ActivityClassificationEntry>,
{
    let mut matches = matches.into_iter().peekable();
    let mut out = String::new();
    let mut shown = 0;
    while shown < limit {
        let Some(entry) = matches.next() else { break };
        out.push_str(&format!("{:<10} {}\n", entry.code, entry.name));
        shown += 1;
    }

    if shown == 0 {
        out.push_str("Ничего не найдено\n");
    } else if matches.peek().is_some() {
        out.push_str(&format!("… показаны первые {shown}, уточните запрос\n"));
    }
    out
}

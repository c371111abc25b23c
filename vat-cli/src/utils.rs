use rust_decimal::Decimal;
use thiserror::Error;
use vat_core::calculations::common::round_half_up;

/// Group separator used by the ru-RU number format.
pub const GROUP_SEPARATOR: char = '\u{a0}';

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing.
///
/// Drops whitespace (spaces, NBSP and narrow NBSP are all used as group
/// separators). A comma is the decimal separator unless the input also has a
/// dot, in which case commas are grouping.
fn normalize_decimal_input(s: &str) -> String {
    let compact: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{202f}')
        .collect();
    if compact.contains('.') {
        compact.replace(',', "")
    } else {
        compact.replace(',', ".")
    }
}

/// Parses a string into a [`Decimal`].
///
/// Accepts `"1 234,56"`, `"1234.56"` and `"1,234.56"`.
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Formats a number the ru-RU way: NBSP groups, decimal comma and at most
/// two fraction digits.
pub fn format_number(value: Decimal) -> String {
    let rounded = round_half_up(value).normalize();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + 4);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(digit);
    }
    if let Some(frac_part) = frac_part {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

/// Formats an amount in roubles, e.g. `"122 000 ₽"`.
pub fn format_rub(value: Decimal) -> String {
    format!("{} ₽", format_number(value))
}

/// Same as [`format_rub`] with an explicit `+` for positive values.
pub fn format_signed_rub(value: Decimal) -> String {
    if value > Decimal::ZERO {
        format!("+{}", format_rub(value))
    } else {
        format_rub(value)
    }
}

/// Formats a percentage, e.g. `"22%"` or `"1,67%"`.
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", format_number(value))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // parse_decimal tests
    // =========================================================================

    #[test]
    fn parse_decimal_accepts_ru_grouping_and_decimal_comma() {
        assert_eq!(parse_decimal("1 234,56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("1\u{a0}234\u{a0}567,8").unwrap(), dec!(1234567.8));
        assert_eq!(parse_decimal("100\u{202f}000").unwrap(), dec!(100000));
    }

    #[test]
    fn parse_decimal_accepts_comma_thousands_with_dot_decimal() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("1234.56").unwrap(), dec!(1234.56));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("1,2,3").is_err());
    }

    #[test]
    fn parse_decimal_keeps_sign() {
        assert_eq!(parse_decimal("-500").unwrap(), dec!(-500));
    }

    // =========================================================================
    // format tests
    // =========================================================================

    #[test]
    fn format_number_groups_thousands_with_nbsp() {
        assert_eq!(format_number(dec!(122000)), "122\u{a0}000");
        assert_eq!(format_number(dec!(1234567.8)), "1\u{a0}234\u{a0}567,8");
        assert_eq!(format_number(dec!(999)), "999");
    }

    #[test]
    fn format_number_rounds_to_two_places() {
        assert_eq!(format_number(dec!(1.005)), "1,01");
        assert_eq!(format_number(dec!(20000.00)), "20\u{a0}000");
        assert_eq!(format_number(dec!(0.001)), "0");
    }

    #[test]
    fn format_number_negative() {
        assert_eq!(format_number(dec!(-2000)), "-2\u{a0}000");
        assert_eq!(format_number(dec!(-0.001)), "0");
    }

    #[test]
    fn format_rub_appends_currency_sign() {
        assert_eq!(format_rub(dec!(22000)), "22\u{a0}000 ₽");
    }

    #[test]
    fn format_signed_rub_marks_increase_only() {
        assert_eq!(format_signed_rub(dec!(2000)), "+2\u{a0}000 ₽");
        assert_eq!(format_signed_rub(dec!(-2000)), "-2\u{a0}000 ₽");
        assert_eq!(format_signed_rub(dec!(0)), "0 ₽");
    }

    #[test]
    fn format_percent_uses_decimal_comma() {
        assert_eq!(format_percent(dec!(22)), "22%");
        assert_eq!(format_percent(dec!(1.6667)), "1,67%");
    }
}

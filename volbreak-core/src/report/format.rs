//! Display formatting for report cells.
//!
//! Display strings use thousands grouping ("1,234.50"); CSV export uses the
//! same precision without grouping so the file stays machine readable.

/// Decimal places for prices and percentages.
pub const PRICE_DECIMALS: usize = 2;

/// Format `value` with `decimals` places and comma thousands grouping.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let raw = format!("{value:.decimals$}");
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Price or percentage for display: 2 decimals, grouped.
pub fn format_price(value: f64) -> String {
    format_grouped(value, PRICE_DECIMALS)
}

/// Volume for display: no decimals, grouped.
pub fn format_volume(volume: f64) -> String {
    format_grouped(volume, 0)
}

/// Display an optional value; `None` renders as an empty string.
pub fn format_optional(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
    value.map(fmt).unwrap_or_default()
}

/// Fixed-precision value without grouping (CSV cells).
pub fn format_plain(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_grouped(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_grouped(999.0, 2), "999.00");
        assert_eq!(format_grouped(1000.0, 0), "1,000");
        assert_eq!(format_grouped(0.5, 2), "0.50");
    }

    #[test]
    fn groups_negative_values() {
        assert_eq!(format_grouped(-1234.5, 2), "-1,234.50");
        assert_eq!(format_grouped(-12.0, 2), "-12.00");
    }

    #[test]
    fn volume_has_no_decimals() {
        assert_eq!(format_volume(45_678_901.0), "45,678,901");
    }

    #[test]
    fn optional_none_is_empty() {
        assert_eq!(format_optional(None, format_price), "");
        assert_eq!(format_optional(Some(3.14159), format_price), "3.14");
    }

    #[test]
    fn plain_has_no_grouping() {
        assert_eq!(format_plain(12345.678, 2), "12345.68");
    }
}

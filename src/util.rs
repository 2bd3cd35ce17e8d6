// Utility helpers for casting raw text and basic statistics.
//
// This module centralizes the "dirty" CSV value handling so the rest of the
// code can assume clean, typed values. A failed cast is `None`, never an
// error: rows with missing fields are filtered later.
use bigdecimal::{BigDecimal, RoundingMode};
use num_format::{Locale, ToFormattedString};
use std::str::FromStr;

/// Cast a text field to `i32`.
///
/// - Trims whitespace and treats an empty value as missing.
/// - Accepts an optional sign, digits and an optional fractional part
///   (`"3.0"`, `"-3.9"`), which is truncated toward zero.
/// - Rejects exponents (`"1e2"`), `NaN`/`inf`, and anything outside `i32`.
pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    let (negative, unsigned) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let v = if negative { -magnitude } else { magnitude };
    i32::try_from(v).ok()
}

pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok()
}

/// `year * 100 + month`, or `None` if either part is missing or the
/// result overflows.
pub fn period_id(year: Option<i32>, month: Option<i32>) -> Option<i32> {
    year?.checked_mul(100)?.checked_add(month?)
}

pub fn median(mut v: Vec<f64>) -> f64 {
    // Even length averages the two middle values. Sorts the owned vector.
    if v.is_empty() {
        return 0.0;
    }
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = v.len() / 2;
    if v.len() % 2 == 1 {
        v[mid]
    } else {
        (v[mid - 1] + v[mid]) / 2.0
    }
}

/// Round half-up to `decimals` places using decimal arithmetic.
///
/// The value is first printed with nine fractional digits, which strips
/// binary noise such as `42.324999999999996` back to `42.325` so it rounds
/// to `42.33` like the written number would.
pub fn round_half_up(n: f64, decimals: i64) -> f64 {
    if !n.is_finite() {
        return n;
    }
    let Ok(d) = BigDecimal::from_str(&format!("{n:.9}")) else {
        return n;
    };
    d.with_scale_round(decimals, RoundingMode::HalfUp)
        .to_string()
        .parse::<f64>()
        .unwrap_or(n)
}

/// Counts with thousands separators for log lines, e.g. `9,855`.
pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integer_literals() {
        assert_eq!(parse_i32_safe(Some(" 3115 ")), Some(3115));
        assert_eq!(parse_i32_safe(Some("-4")), Some(-4));
    }

    #[test]
    fn truncates_decimal_literals() {
        assert_eq!(parse_i32_safe(Some("12.0")), Some(12));
        assert_eq!(parse_i32_safe(Some("7.9")), Some(7));
        assert_eq!(parse_i32_safe(Some("-7.9")), Some(-7));
    }

    #[test]
    fn rejects_bad_integers() {
        assert_eq!(parse_i32_safe(None), None);
        assert_eq!(parse_i32_safe(Some("")), None);
        assert_eq!(parse_i32_safe(Some("abc")), None);
        assert_eq!(parse_i32_safe(Some("NaN")), None);
        assert_eq!(parse_i32_safe(Some("1e12")), None);
        assert_eq!(parse_i32_safe(Some("1e2")), None);
        assert_eq!(parse_i32_safe(Some("inf")), None);
        assert_eq!(parse_i32_safe(Some("-")), None);
        assert_eq!(parse_i32_safe(Some(".")), None);
        assert_eq!(parse_i32_safe(Some("1.2.3")), None);
        assert_eq!(parse_i32_safe(Some("2147483648")), None);
    }

    #[test]
    fn parses_floats() {
        assert_eq!(parse_f64_safe(Some("42.35")), Some(42.35));
        assert_eq!(parse_f64_safe(Some(" -71.05")), Some(-71.05));
        assert_eq!(parse_f64_safe(Some("  ")), None);
        assert_eq!(parse_f64_safe(Some("north")), None);
    }

    #[test]
    fn builds_period_id() {
        assert_eq!(period_id(Some(2015), Some(1)), Some(201_501));
        assert_eq!(period_id(None, Some(1)), None);
        assert_eq!(period_id(Some(2015), None), None);
        assert_eq!(period_id(Some(i32::MAX), Some(1)), None);
    }

    #[test]
    fn median_of_odd_and_even_series() {
        assert_eq!(median(vec![5.0, 1.0, 3.0]), 3.0);
        assert_eq!(median(vec![4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(vec![7.0]), 7.0);
    }

    #[test]
    fn rounds_half_up_through_binary_noise() {
        assert_eq!(round_half_up((42.30 * 3.0 + 42.40) / 4.0, 2), 42.33);
        assert_eq!(round_half_up(-71.054, 2), -71.05);
        assert_eq!(round_half_up(42.35, 2), 42.35);
    }

    #[test]
    fn formats_counts_with_separators() {
        assert_eq!(format_int(9_855usize), "9,855");
    }
}

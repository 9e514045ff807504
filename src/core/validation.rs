//! Normalization of raw user input before it reaches the registry or ledger.
//!
//! Every function here is total: bad input yields an empty string or `None`
//! instead of an error, and callers decide how to report the rejection.

use chrono::{Datelike, NaiveDate};

use crate::domain::Period;

pub const MAX_CATEGORY_CHARS: usize = 50;
pub const MAX_DESCRIPTION_CHARS: usize = 200;
pub const MAX_AMOUNT: f64 = 9_999_999.99;
pub const MAX_YEARS_BACK: u32 = 10;
pub const MAX_YEARS_AHEAD: u32 = 1;

/// Normalizes a category name. An empty result means the name is invalid.
pub fn normalize_category_name(input: &str) -> String {
    sanitize_text(input, MAX_CATEGORY_CHARS)
}

/// Normalizes an optional free-text description. Empty is a valid result.
pub fn normalize_description(input: &str) -> String {
    sanitize_text(input, MAX_DESCRIPTION_CHARS)
}

/// Parses an amount, returning its absolute value clamped to [`MAX_AMOUNT`]
/// and rounded to cents.
pub fn normalize_amount(input: &str) -> Option<f64> {
    let value: f64 = input.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let clamped = value.abs().min(MAX_AMOUNT);
    Some((clamped * 100.0).round() / 100.0)
}

/// Parses a strict `YYYY-MM-DD` string into a real calendar date.
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let bytes = input.as_bytes();
    if bytes.len() != 10 {
        return None;
    }
    let shaped = bytes.iter().enumerate().all(|(idx, byte)| match idx {
        4 | 7 => *byte == b'-',
        _ => byte.is_ascii_digit(),
    });
    if !shaped {
        return None;
    }
    let year: i32 = input[0..4].parse().ok()?;
    let month: u32 = input[5..7].parse().ok()?;
    let day: u32 = input[8..10].parse().ok()?;
    // from_ymd_opt rejects overflowing days such as 2021-02-30.
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses an expense date and enforces the rolling window around `today`.
pub fn normalize_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let date = parse_calendar_date(input)?;
    let (earliest, latest) = date_bounds(today)?;
    if date < earliest || date > latest {
        return None;
    }
    Some(date)
}

/// Inclusive bounds for expense dates relative to `today`.
///
/// The day exactly ten years back is already out of range; the day exactly
/// one year ahead is still accepted.
pub fn date_bounds(today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let earliest = shift_years(today, -(MAX_YEARS_BACK as i32))?.succ_opt()?;
    let latest = shift_years(today, MAX_YEARS_AHEAD as i32)?;
    Some((earliest, latest))
}

/// Same month and day `years` away. Feb 29 rolls over to Mar 1 in common years.
fn shift_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = date.year().checked_add(years)?;
    date.with_year(year).or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// Maps user input to a period, falling back to [`Period::Daily`].
pub fn normalize_period(input: &str) -> Period {
    input.parse().unwrap_or_default()
}

fn sanitize_text(input: &str, max_chars: usize) -> String {
    let trimmed = input.trim();
    let mut out = String::with_capacity(trimmed.len().min(max_chars * 4));
    let mut in_whitespace = false;
    for ch in trimmed
        .chars()
        .take(max_chars)
        .filter(|ch| !matches!(ch, '<' | '>'))
    {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
                in_whitespace = true;
            }
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_strings() -> Vec<String> {
        let mut samples: Vec<String> = vec![
            String::new(),
            "   ".into(),
            "<>".into(),
            "<script>alert(1)</script>".into(),
            "  Food  ".into(),
            "Café\t\tcon\n\nleche".into(),
            "a<b>c".into(),
            "x".repeat(51),
            "<".repeat(80),
            format!("{}<>{}", "y".repeat(49), "z".repeat(10)),
            "ñ".repeat(120),
        ];
        for len in [0usize, 1, 49, 50, 51, 199, 200, 201, 500] {
            samples.push("ab <c> ".repeat(len / 7 + 1).chars().take(len).collect());
        }
        samples
    }

    #[test]
    fn category_names_are_bounded_and_tag_free() {
        for input in sample_strings() {
            let name = normalize_category_name(&input);
            assert!(name.chars().count() <= MAX_CATEGORY_CHARS, "{input:?}");
            assert!(!name.contains('<') && !name.contains('>'), "{input:?}");
        }
    }

    #[test]
    fn descriptions_are_bounded_and_tag_free() {
        for input in sample_strings() {
            let text = normalize_description(&input);
            assert!(text.chars().count() <= MAX_DESCRIPTION_CHARS, "{input:?}");
            assert!(!text.contains('<') && !text.contains('>'), "{input:?}");
        }
    }

    #[test]
    fn category_whitespace_is_trimmed_and_collapsed() {
        assert_eq!(normalize_category_name("  Food  "), "Food");
        assert_eq!(normalize_category_name("Eating \t  out"), "Eating out");
        assert_eq!(normalize_category_name("a<b>c"), "abc");
        assert_eq!(normalize_category_name("<>"), "");
        assert_eq!(normalize_category_name("   "), "");
    }

    #[test]
    fn amounts_are_non_negative_capped_and_rounded() {
        let inputs = [
            "0", "1", "10.5", "10.555", "10.554", "-3.333", "1e3", "  42  ", "9999999.99",
            "10000000", "1e300", "-1e300", "0.005", "123456.789",
        ];
        for input in inputs {
            let amount = normalize_amount(input).expect(input);
            assert!(amount >= 0.0, "{input}");
            assert!(amount <= MAX_AMOUNT, "{input}");
            let cents = amount * 100.0;
            assert!((cents - cents.round()).abs() < 1e-6, "{input} -> {amount}");
        }
        assert_eq!(normalize_amount("10.555"), Some(10.56));
        assert_eq!(normalize_amount("-3.333"), Some(3.33));
        assert_eq!(normalize_amount("10000000"), Some(MAX_AMOUNT));
    }

    #[test]
    fn unparsable_amounts_are_rejected() {
        for input in ["", "abc", "NaN", "inf", "-inf", "1,5", "$5"] {
            assert_eq!(normalize_amount(input), None, "{input}");
        }
    }

    #[test]
    fn impossible_calendar_dates_are_rejected() {
        let today = date(2021, 6, 1);
        assert_eq!(normalize_date("2021-02-30", today), None);
        assert_eq!(normalize_date("2021-04-31", today), None);
        assert_eq!(normalize_date("2021-13-01", today), None);
        assert_eq!(normalize_date("2020-02-29", today), Some(date(2020, 2, 29)));
    }

    #[test]
    fn malformed_date_shapes_are_rejected() {
        let today = date(2024, 6, 1);
        for input in ["2024-6-1", "2024/06/01", " 2024-06-01", "20240601", "2024-06-01T00", ""] {
            assert_eq!(normalize_date(input, today), None, "{input:?}");
        }
    }

    #[test]
    fn dates_outside_rolling_window_are_rejected() {
        let today = date(2024, 6, 15);
        assert_eq!(normalize_date("2026-06-15", today), None);
        assert_eq!(normalize_date("2025-06-16", today), None);
        assert_eq!(normalize_date("2025-06-15", today), Some(date(2025, 6, 15)));
        assert_eq!(normalize_date("2014-06-16", today), Some(date(2014, 6, 16)));
        assert_eq!(normalize_date("2014-06-15", today), None);
        assert_eq!(normalize_date("2014-06-14", today), None);
    }

    #[test]
    fn leap_day_bounds_roll_over_to_march() {
        let (earliest, latest) = date_bounds(date(2024, 2, 29)).unwrap();
        assert_eq!(earliest, date(2014, 3, 2));
        assert_eq!(latest, date(2025, 3, 1));
    }

    #[test]
    fn periods_default_to_daily() {
        assert_eq!(normalize_period("monthly"), Period::Monthly);
        assert_eq!(normalize_period("TOTAL"), Period::Total);
        assert_eq!(normalize_period("fortnightly"), Period::Daily);
        assert_eq!(normalize_period(""), Period::Daily);
    }
}

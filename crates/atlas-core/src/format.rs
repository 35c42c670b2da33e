//! Display formatting for popups and the detail panel

use chrono::{DateTime, TimeZone, Utc};

/// Shown for absent or non-numeric values
pub const PLACEHOLDER: &str = "—";

/// Maximum fraction digits kept by [`format_count`]
const MAX_FRACTION_DIGITS: usize = 3;

/// Group a number with `,` thousands separators, keeping up to three
/// fraction digits (en-US locale style).
pub fn format_count(value: Option<f64>) -> String {
    let v = match value {
        Some(v) if !v.is_nan() => v,
        _ => return PLACEHOLDER.to_string(),
    };
    if v.is_infinite() {
        return if v > 0.0 { "∞".to_string() } else { "-∞".to_string() };
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if v < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Fixed-decimal coordinate, placeholder when absent
pub fn format_coord(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", decimals, v),
        _ => PLACEHOLDER.to_string(),
    }
}

/// RFC 1123 UTC date, e.g. `Tue, 14 Nov 2023 22:13:20 GMT`
pub fn format_utc(ts: DateTime<Utc>) -> String {
    ts.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Epoch milliseconds as an RFC 1123 date; placeholder for absent or zero
pub fn format_timestamp_ms(ms: Option<i64>) -> String {
    ms.filter(|ms| *ms != 0)
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map(format_utc)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Text for the "last updated" element
pub fn last_updated_label(latest: Option<DateTime<Utc>>) -> Option<String> {
    latest.map(|ts| format!("Last data update: {}", format_utc(ts)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count_groups_thousands() {
        assert_eq!(format_count(Some(0.0)), "0");
        assert_eq!(format_count(Some(999.0)), "999");
        assert_eq!(format_count(Some(1_000.0)), "1,000");
        assert_eq!(format_count(Some(40_138_560.0)), "40,138,560");
        assert_eq!(format_count(Some(-1_234_567.0)), "-1,234,567");
    }

    #[test]
    fn test_format_count_fraction_digits() {
        assert_eq!(format_count(Some(12_345.6)), "12,345.6");
        assert_eq!(format_count(Some(0.12345)), "0.123");
        assert_eq!(format_count(Some(2.0006)), "2.001");
        assert_eq!(format_count(Some(7.10)), "7.1");
    }

    #[test]
    fn test_format_count_placeholder() {
        assert_eq!(format_count(None), PLACEHOLDER);
        assert_eq!(format_count(Some(f64::NAN)), PLACEHOLDER);
    }

    #[test]
    fn test_format_coord() {
        assert_eq!(format_coord(Some(46.0), 2), "46.00");
        assert_eq!(format_coord(Some(-12.34567), 4), "-12.3457");
        assert_eq!(format_coord(Some(0.0), 4), "0.0000");
        assert_eq!(format_coord(None, 2), PLACEHOLDER);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp_ms(Some(1_700_000_000_000)),
            "Tue, 14 Nov 2023 22:13:20 GMT"
        );
        assert_eq!(format_timestamp_ms(None), PLACEHOLDER);
        assert_eq!(format_timestamp_ms(Some(0)), PLACEHOLDER);
    }

    #[test]
    fn test_last_updated_label() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_000).single();
        assert_eq!(
            last_updated_label(ts).unwrap(),
            "Last data update: Tue, 14 Nov 2023 22:13:20 GMT"
        );
        assert!(last_updated_label(None).is_none());
    }
}

//! Cell value coercions shared by conversion, chart aggregation and import.
//!
//! Cells are [`serde_json::Value`]s. The helpers here define the loose numeric, boolean and
//! textual readings every other module relies on, plus the date formats the engine accepts.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeDelta, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("static regex")
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%m/%d/%Y"];

/// Strict numeric reading: `""` is 0, booleans are 1/0, anything unparseable is `NaN`.
pub fn strict_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_number_str(s).unwrap_or(f64::NAN),
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] => strict_number(&Value::String(stringify(single))),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

/// [`strict_number`] with `NaN` (and infinities) collapsed to 0.
pub fn number_or_zero(value: &Value) -> f64 {
    let n = strict_number(value);
    if n.is_finite() { n } else { 0.0 }
}

fn parse_number_str(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.contains("inf") || lower.contains("nan") {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Leading-prefix float parse: `"12.5kg"` is 12.5, `"kg"` is `None`.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    FLOAT_PREFIX
        .find(trimmed)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Whether a non-empty string is numeric as a whole (surrounding whitespace allowed).
pub fn is_numeric_str(s: &str) -> bool {
    !s.trim().is_empty() && parse_number_str(s).is_some()
}

/// Wrap a float as a JSON number, preferring the integer representation when exact.
pub fn number_value(n: f64) -> Value {
    if !n.is_finite() {
        return Value::from(0);
    }
    if n.fract() == 0.0 && n.abs() <= 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

/// Shortest decimal form; integral values print without a fractional part.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n.fract() == 0.0 && n.abs() < 9.0e18 {
        return (n as i64).to_string();
    }
    n.to_string()
}

/// Half-up rounding (`-2.5` rounds to `-2`).
pub fn round_half_up(n: f64) -> f64 {
    (n + 0.5).floor()
}

/// Round to two decimals, half-up.
pub fn round2(n: f64) -> f64 {
    round_half_up(n * 100.0) / 100.0
}

/// Plain string reading of a cell.
///
/// Arrays join their elements with `", "`; objects carrying a `label` read as that label.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_default(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(", "),
        Value::Object(map) => match map.get("label") {
            Some(label) => stringify(label),
            None => value.to_string(),
        },
    }
}

/// Loose truthiness: null, `false`, `0`, `NaN` and `""` are false; arrays and objects are true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Null, whitespace-only strings and empty arrays count as blank.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Parse a date/time string in any of the accepted layouts. Zone-less inputs are read as UTC.
pub fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|ndt| ndt.and_utc());
        }
    }
    None
}

/// Interpret a number as milliseconds since the Unix epoch.
pub fn date_from_epoch_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(ms.round() as i64)
}

/// Decode a spreadsheet serial date (days since 1899-12-30, fraction = time of day).
pub fn date_from_serial(serial: f64) -> Option<DateTime<Utc>> {
    if !serial.is_finite() {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let offset = TimeDelta::try_milliseconds((serial * 86_400_000.0).round() as i64)?;
    base.checked_add_signed(offset).map(|ndt| ndt.and_utc())
}

/// Read a cell as a date: strings are parsed, numbers are epoch milliseconds.
pub fn value_to_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => n.as_f64().and_then(date_from_epoch_millis),
        _ => None,
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn to_iso_string(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Short display date, `YYYY/M/D`.
pub fn to_display_date(dt: &DateTime<Utc>) -> String {
    dt.format("%Y/%-m/%-d").to_string()
}

/// Grouped display form of a number: `1234567.891` prints as `1,234,567.891`.
///
/// At most three fraction digits are kept, trailing zeros dropped.
pub fn to_grouped_string(n: f64) -> String {
    if !n.is_finite() {
        return format_number(n);
    }
    let rounded = round_half_up(n.abs() * 1000.0) / 1000.0;
    let int_part = rounded.trunc();
    let frac = rounded - int_part;

    let digits = format!("{int_part:.0}");
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let frac_digits = format!("{:.3}", frac);
    let frac_digits = frac_digits
        .trim_start_matches('0')
        .trim_start_matches('.')
        .trim_end_matches('0');

    let sign = if n < 0.0 && rounded != 0.0 { "-" } else { "" };
    if frac_digits.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_digits}")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn strict_number_follows_loose_rules() {
        assert_eq!(strict_number(&json!("")), 0.0);
        assert_eq!(strict_number(&json!(" 42 ")), 42.0);
        assert_eq!(strict_number(&json!(true)), 1.0);
        assert!(strict_number(&json!("12abc")).is_nan());
        assert!(strict_number(&json!("inf")).is_nan());
        assert_eq!(strict_number(&json!(["7"])), 7.0);
        assert_eq!(number_or_zero(&json!({"a": 1})), 0.0);
    }

    #[test]
    fn float_prefix_reads_leading_number() {
        assert_eq!(parse_float_prefix("12.5kg"), Some(12.5));
        assert_eq!(parse_float_prefix("  -3e2 rest"), Some(-300.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("kg"), None);
    }

    #[test]
    fn number_value_prefers_integers() {
        assert_eq!(number_value(50.0), json!(50));
        assert_eq!(number_value(2.5), json!(2.5));
        assert_eq!(number_value(f64::NAN), json!(0));
    }

    #[test]
    fn stringify_handles_arrays_and_labels() {
        assert_eq!(stringify(&json!(3.0)), "3");
        assert_eq!(stringify(&json!(["a", {"label": "B"}])), "a, B");
        assert_eq!(stringify(&json!(false)), "false");
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round2(10.0 / 3.0), 3.33);
        assert_eq!(round2(2.0 / 3.0), 0.67);
    }

    #[test]
    fn parses_common_date_layouts() {
        let iso = |s: &str| parse_date_str(s).map(|d| to_iso_string(&d));
        assert_eq!(iso("2024-01-05").as_deref(), Some("2024-01-05T00:00:00.000Z"));
        assert_eq!(iso("2024-1-5").as_deref(), Some("2024-01-05T00:00:00.000Z"));
        assert_eq!(iso("2024/02/15 08:30").as_deref(), Some("2024-02-15T08:30:00.000Z"));
        assert_eq!(
            iso("2024-03-01T10:00:00.000Z").as_deref(),
            Some("2024-03-01T10:00:00.000Z")
        );
        assert_eq!(iso("not a date"), None);
    }

    #[test]
    fn serial_dates_decode_from_1899_epoch() {
        let dt = date_from_serial(45292.0).unwrap();
        assert_eq!(to_iso_string(&dt), "2024-01-01T00:00:00.000Z");
        let noon = date_from_serial(45292.5).unwrap();
        assert_eq!(to_iso_string(&noon), "2024-01-01T12:00:00.000Z");
    }

    #[test]
    fn grouped_string_inserts_separators() {
        assert_eq!(to_grouped_string(1234567.891), "1,234,567.891");
        assert_eq!(to_grouped_string(-1000.0), "-1,000");
        assert_eq!(to_grouped_string(12.5), "12.5");
        assert_eq!(to_grouped_string(0.0), "0");
    }
}

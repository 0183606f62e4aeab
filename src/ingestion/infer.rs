//! Column type inference for imported sheets.
//!
//! Inference is heuristic: it looks at a small sample and picks the first type every sampled
//! value fits. It is meant to pre-fill the mapping form, and the user can override it.

use std::collections::HashSet;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::types::FieldType;
use crate::value::{is_blank, is_numeric_str, parse_date_str, stringify};

use super::ParsedSheet;

/// Non-empty values sampled per column.
pub const SAMPLE_SIZE: usize = 20;

/// Most distinct values a column may have and still infer as select.
pub const SELECT_MAX_DISTINCT: usize = 10;

/// Fewest sampled values needed before a column may infer as select.
pub const SELECT_MIN_SAMPLES: usize = 5;

static DATE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})").expect("static regex"));

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"));

const BOOLEAN_TOKENS: &[&str] = &[
    "true", "false", "yes", "no", "y", "n", "on", "off", "checked", "unchecked", "是", "否", "对",
    "错", "真", "假",
];

/// Infer the field type of one column.
///
/// Precedence, first rule every sampled value satisfies wins: number, date (a `YYYY-M-D` prefix
/// on a value the date parser accepts), checkbox tokens, email, `http(s)://` url, select (few
/// distinct values over enough samples), text. An all-blank column is text.
pub fn infer_column_type<'a>(values: impl IntoIterator<Item = &'a Value>) -> FieldType {
    let sample: Vec<&Value> = values
        .into_iter()
        .filter(|v| !is_blank(v))
        .take(SAMPLE_SIZE)
        .collect();
    if sample.is_empty() {
        return FieldType::Text;
    }
    let texts: Vec<String> = sample.iter().map(|v| stringify(v).trim().to_string()).collect();

    if sample.iter().zip(&texts).all(|(v, s)| v.is_number() || is_numeric_str(s)) {
        return FieldType::Number;
    }
    if texts.iter().all(|s| looks_like_date(s)) {
        return FieldType::Date;
    }
    if sample.iter().zip(&texts).all(|(v, s)| v.is_boolean() || is_boolean_token(s)) {
        return FieldType::Checkbox;
    }
    if texts.iter().all(|s| EMAIL.is_match(s)) {
        return FieldType::Email;
    }
    if texts.iter().all(|s| is_http_url(s)) {
        return FieldType::Url;
    }
    let distinct: HashSet<&str> = texts.iter().map(String::as_str).collect();
    if distinct.len() <= SELECT_MAX_DISTINCT && texts.len() >= SELECT_MIN_SAMPLES {
        return FieldType::Select;
    }
    FieldType::Text
}

/// Inferred type of every column of a sheet, in column order.
pub fn infer_sheet_types(sheet: &ParsedSheet) -> Vec<FieldType> {
    (0..sheet.column_count())
        .map(|i| infer_column_type(sheet.column(i)))
        .collect()
}

/// A `YYYY-M-D` prefix naming a real calendar day, on a string [`parse_date_str`] accepts.
fn looks_like_date(s: &str) -> bool {
    let Some(caps) = DATE_PREFIX.captures(s) else {
        return false;
    };
    if parse_date_str(s).is_none() {
        return false;
    }
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    match (part(1), part(2), part(3)) {
        (Some(y), Some(m), Some(d)) => i32::try_from(y)
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, m, d))
            .is_some(),
        _ => false,
    }
}

fn is_boolean_token(s: &str) -> bool {
    let lower = s.to_lowercase();
    BOOLEAN_TOKENS.contains(&lower.as_str())
}

fn is_http_url(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

//! Field type conversion engine.
//!
//! [`convert_field_value`] is total: every `(from, to)` pair yields a value shaped for the
//! target type, and null input yields the target type's default. Unmatched select labels
//! convert to null (or an empty list) rather than failing; options are never created here.
//!
//! Callers converting a select or multi-select column should first run the cells through
//! [`expand_option_refs`] so option ids read as their labels.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::id::{generate_id, IdKind};
use crate::types::{FieldConfig, FieldType, RecordData, SelectOption};
use crate::value::{
    date_from_serial, is_blank, is_numeric_str, is_truthy, number_or_zero, number_value, parse_date_str,
    parse_float_prefix, round_half_up, stringify, to_display_date, to_iso_string, value_to_date,
};

/// Colors assigned to generated select options, cycled in order.
pub const OPTION_COLORS: [&str; 8] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#06b6d4", "#84cc16",
];

/// Most options [`generate_select_options_from_data`] will produce.
pub const MAX_GENERATED_OPTIONS: usize = 50;

const CHECKBOX_TRUE_TOKENS: &[&str] = &["true", "yes", "1", "checked", "on", "是", "对", "真"];

/// Extra truthy spellings accepted when importing raw spreadsheet cells.
const IMPORT_TRUE_TOKENS: &[&str] = &["y"];

/// Convert `value` from one field type's representation to another's.
///
/// `field` is the target field; its options back select matching and its format picks the
/// rating scale.
pub fn convert_field_value(
    value: &Value,
    from: FieldType,
    to: FieldType,
    field: Option<&FieldConfig>,
) -> Value {
    if from == to {
        return value.clone();
    }
    if value.is_null() {
        return to.default_value();
    }

    match to {
        FieldType::Text
        | FieldType::Url
        | FieldType::Email
        | FieldType::Phone
        | FieldType::Formula
        | FieldType::CreatedBy
        | FieldType::UpdatedBy
        | FieldType::Id => Value::String(to_text(value, from)),
        FieldType::Number | FieldType::AutoNumber => number_value(to_number(value, from)),
        FieldType::Date | FieldType::CreatedTime | FieldType::UpdatedTime => to_date(value, from),
        FieldType::Checkbox => Value::Bool(to_checkbox(value, from)),
        FieldType::Select => to_select(value, from, field),
        FieldType::MultiSelect => to_multi_select(value, from, field),
        FieldType::Rating => {
            let max = field.map(FieldConfig::max_rating).unwrap_or(5);
            number_value(to_rating(value, from, max))
        }
        FieldType::Progress => number_value(to_progress(value, from)),
        FieldType::Person | FieldType::Attachment | FieldType::Relation => to_list(value, from),
    }
}

fn is_textual(t: FieldType) -> bool {
    matches!(
        t,
        FieldType::Text | FieldType::Url | FieldType::Email | FieldType::Phone
    )
}

fn is_date_like(t: FieldType) -> bool {
    matches!(
        t,
        FieldType::Date | FieldType::CreatedTime | FieldType::UpdatedTime
    )
}

fn to_text(value: &Value, from: FieldType) -> String {
    if from == FieldType::Checkbox {
        return if is_truthy(value) { "Yes" } else { "No" }.to_string();
    }
    if is_date_like(from) {
        if let Some(dt) = value_to_date(value) {
            return to_display_date(&dt);
        }
    }
    stringify(value)
}

fn to_number(value: &Value, from: FieldType) -> f64 {
    match from {
        FieldType::Checkbox => f64::from(u8::from(is_truthy(value))),
        t if is_textual(t) => parse_float_prefix(&stringify(value)).unwrap_or(0.0),
        FieldType::Rating | FieldType::Progress => number_or_zero(value),
        t if is_date_like(t) => value_to_date(value)
            .map(|dt| dt.timestamp_millis() as f64)
            .unwrap_or(0.0),
        _ => number_or_zero(value),
    }
}

fn to_date(value: &Value, from: FieldType) -> Value {
    let parsed = if is_textual(from) || from == FieldType::Number {
        value_to_date(value)
    } else {
        match value {
            Value::String(s) => parse_date_str(s),
            _ => None,
        }
    };
    parsed
        .map(|dt| Value::String(to_iso_string(&dt)))
        .unwrap_or(Value::Null)
}

fn to_checkbox(value: &Value, from: FieldType) -> bool {
    match from {
        FieldType::Number | FieldType::Rating | FieldType::Progress => number_or_zero(value) > 0.0,
        t if is_textual(t) => is_checkbox_true_token(&stringify(value)),
        _ => is_truthy(value),
    }
}

pub(crate) fn is_checkbox_true_token(s: &str) -> bool {
    let token = s.trim().to_lowercase();
    CHECKBOX_TRUE_TOKENS.contains(&token.as_str())
}

/// Truthy tokens for imported cells. Every boolean token inference accepts that is not listed
/// here or in [`is_checkbox_true_token`] reads as false.
pub(crate) fn is_import_true_token(s: &str) -> bool {
    let token = s.trim().to_lowercase();
    is_checkbox_true_token(&token) || IMPORT_TRUE_TOKENS.contains(&token.as_str())
}

fn option_id_of<'a>(value: &'a Value, field: &FieldConfig) -> Option<&'a str> {
    let candidate = match value {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("id").and_then(Value::as_str)?,
        _ => return None,
    };
    field.option(candidate).map(|_| candidate)
}

fn to_select(value: &Value, from: FieldType, field: Option<&FieldConfig>) -> Value {
    if let Value::Array(items) = value {
        return match items.first() {
            Some(first) => to_select(first, from, field),
            None => Value::Null,
        };
    }
    let Some(field) = field else {
        return Value::Null;
    };
    if let Some(id) = option_id_of(value, field) {
        return Value::String(id.to_string());
    }
    let label = to_text(value, from);
    field
        .option_by_label(&label)
        .map(|o| Value::String(o.id.clone()))
        .unwrap_or(Value::Null)
}

fn to_multi_select(value: &Value, from: FieldType, field: Option<&FieldConfig>) -> Value {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut push = |v: Value| {
        if let Value::String(id) = v {
            if seen.insert(id.clone()) {
                out.push(Value::String(id));
            }
        }
    };

    match value {
        Value::Array(items) => {
            for item in items {
                push(to_select(item, from, field));
            }
        }
        other => push(to_select(other, from, field)),
    }
    Value::Array(out)
}

fn to_rating(value: &Value, from: FieldType, max: u32) -> f64 {
    let max = f64::from(max);
    let raw = match from {
        FieldType::Progress => number_or_zero(value) / 100.0 * max,
        FieldType::Checkbox => return if is_truthy(value) { max } else { 0.0 },
        t if is_textual(t) => parse_float_prefix(&stringify(value)).unwrap_or(0.0),
        _ => number_or_zero(value),
    };
    round_half_up(raw).clamp(0.0, max)
}

fn to_progress(value: &Value, from: FieldType) -> f64 {
    match from {
        FieldType::Number | FieldType::AutoNumber => normalize_progress(number_or_zero(value)),
        FieldType::Rating => round_half_up(number_or_zero(value) / 10.0 * 100.0).clamp(0.0, 100.0),
        FieldType::Checkbox => {
            if is_truthy(value) {
                100.0
            } else {
                0.0
            }
        }
        t if is_textual(t) => round_half_up(parse_float_prefix(&stringify(value)).unwrap_or(0.0))
            .clamp(0.0, 100.0),
        _ => round_half_up(number_or_zero(value)).clamp(0.0, 100.0),
    }
}

/// Fractions in `[0, 1]` scale to percent, `(1, 100]` is already percent, and anything larger is
/// read as per-mille.
fn normalize_progress(n: f64) -> f64 {
    if n <= 0.0 {
        0.0
    } else if n <= 1.0 {
        round_half_up(n * 100.0)
    } else if n <= 100.0 {
        round_half_up(n)
    } else {
        round_half_up(n / 10.0).clamp(0.0, 100.0)
    }
}

fn to_list(value: &Value, from: FieldType) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().filter(|v| !is_blank(v)).cloned().collect()),
        other => {
            let text = to_text(other, from);
            if text.trim().is_empty() {
                Value::Array(Vec::new())
            } else {
                Value::Array(vec![Value::String(text)])
            }
        }
    }
}

/// Advisory message for conversions that lose information. Never blocks the conversion.
pub fn conversion_warning(from: FieldType, to: FieldType) -> Option<&'static str> {
    if from == to {
        return None;
    }
    match (from, to) {
        (FieldType::MultiSelect, FieldType::Select) => {
            Some("Converting to single select keeps only the first selection")
        }
        (FieldType::Date, FieldType::Number) => {
            Some("Dates will be converted to Unix timestamps (milliseconds)")
        }
        (
            FieldType::Select | FieldType::MultiSelect,
            FieldType::Text | FieldType::Url | FieldType::Email | FieldType::Phone,
        ) => Some("Option colors and structure will be lost; only labels are kept"),
        (_, FieldType::Checkbox) => Some("Values will be reduced to true/false only"),
        _ => None,
    }
}

/// Replace select option ids with the option object (`{id, label, color}`) they refer to, so
/// the text rule reads labels. Non-select fields and unknown ids pass through unchanged.
pub fn expand_option_refs(value: &Value, source: &FieldConfig) -> Value {
    if !source.field_type.has_options() {
        return value.clone();
    }
    let expand_one = |v: &Value| -> Value {
        match v.as_str().and_then(|id| source.option(id)) {
            Some(option) => {
                let mut map = Map::new();
                map.insert("id".to_string(), Value::String(option.id.clone()));
                map.insert("label".to_string(), Value::String(option.label.clone()));
                map.insert("color".to_string(), Value::String(option.color.clone()));
                Value::Object(map)
            }
            None => v.clone(),
        }
    };
    match value {
        Value::Array(items) => Value::Array(items.iter().map(expand_one).collect()),
        other => expand_one(other),
    }
}

/// Build select options from the distinct values of a column, in first-seen order.
///
/// Values are read with the text rule for `from`; list cells contribute each element. At most
/// [`MAX_GENERATED_OPTIONS`] options are produced.
pub fn generate_select_options_from_data(
    records: &[RecordData],
    field_id: &str,
    from: FieldType,
) -> Vec<SelectOption> {
    options_from_values(
        records.iter().map(|r| r.get(field_id)),
        from,
        MAX_GENERATED_OPTIONS,
    )
}

pub(crate) fn options_from_values<'a>(
    values: impl Iterator<Item = &'a Value>,
    from: FieldType,
    limit: usize,
) -> Vec<SelectOption> {
    let mut seen = HashSet::new();
    let mut options = Vec::new();

    let mut consider = |label: String, options: &mut Vec<SelectOption>| {
        let label = label.trim().to_string();
        if label.is_empty() || options.len() >= limit || !seen.insert(label.clone()) {
            return;
        }
        let color = OPTION_COLORS[options.len() % OPTION_COLORS.len()];
        options.push(SelectOption::new(generate_id(Some(IdKind::Option)), label, color));
    };

    for value in values {
        if value.is_null() {
            continue;
        }
        match value {
            Value::Array(items) => {
                for item in items {
                    consider(to_text(item, from), &mut options);
                }
            }
            other => consider(to_text(other, from), &mut options),
        }
        if options.len() >= limit {
            break;
        }
    }
    options
}

/// Split a raw multi-value cell on commas and semicolons (ASCII and full-width).
pub(crate) fn split_multi_value(raw: &str) -> impl Iterator<Item = &str> {
    raw.split([',', ';', '，', '；'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn blank_cell_value(t: FieldType) -> Value {
    match t {
        FieldType::Checkbox | FieldType::MultiSelect | FieldType::Person | FieldType::Attachment
        | FieldType::Relation => t.default_value(),
        _ => Value::Null,
    }
}

fn parse_raw_number(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .trim_start_matches(['$', '¥', '€', '£'])
                .chars()
                .filter(|c| *c != ',' && !c.is_whitespace())
                .collect();
            cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

/// Convert a raw imported cell into the representation of `field`'s type.
///
/// Numeric cells bound for date fields, including numeric text from CSV, are decoded as
/// spreadsheet serial dates.
pub fn convert_raw_value(raw: &Value, field: &FieldConfig) -> Value {
    let t = field.field_type;
    if is_blank(raw) {
        return blank_cell_value(t);
    }

    match t {
        FieldType::Number | FieldType::AutoNumber => {
            parse_raw_number(raw).map(number_value).unwrap_or(Value::Null)
        }
        FieldType::Rating => match parse_raw_number(raw) {
            Some(n) => convert_field_value(&number_value(n), FieldType::Number, t, Some(field)),
            None => Value::Null,
        },
        FieldType::Progress => {
            let text = stringify(raw);
            let percent = text.trim().strip_suffix('%').and_then(|p| p.trim().parse::<f64>().ok());
            match percent.or_else(|| parse_raw_number(raw)) {
                Some(n) if percent.is_some() => number_value(round_half_up(n).clamp(0.0, 100.0)),
                Some(n) => convert_field_value(&number_value(n), FieldType::Number, t, Some(field)),
                None => Value::Null,
            }
        }
        FieldType::Checkbox => Value::Bool(match raw {
            Value::Bool(b) => *b,
            Value::Number(_) => number_or_zero(raw) > 0.0,
            other => is_import_true_token(&stringify(other)),
        }),
        FieldType::Date | FieldType::CreatedTime | FieldType::UpdatedTime => {
            let parsed = match raw {
                Value::Number(n) => n.as_f64().and_then(date_from_serial),
                Value::String(s) if is_numeric_str(s) => {
                    s.trim().parse::<f64>().ok().and_then(date_from_serial)
                }
                other => parse_date_str(&stringify(other)),
            };
            parsed
                .map(|dt| Value::String(to_iso_string(&dt)))
                .unwrap_or(Value::Null)
        }
        FieldType::Select => {
            let label = stringify(raw);
            field
                .option_by_label(&label)
                .map(|o| Value::String(o.id.clone()))
                .unwrap_or(Value::Null)
        }
        FieldType::MultiSelect => {
            let text = stringify(raw);
            let mut seen = HashSet::new();
            let ids = split_multi_value(&text)
                .filter_map(|label| field.option_by_label(label))
                .filter(|o| seen.insert(o.id.clone()))
                .map(|o| Value::String(o.id.clone()))
                .collect();
            Value::Array(ids)
        }
        FieldType::Person | FieldType::Attachment | FieldType::Relation => Value::Array(
            split_multi_value(&stringify(raw))
                .map(|s| Value::String(s.to_string()))
                .collect(),
        ),
        FieldType::Text
        | FieldType::Url
        | FieldType::Email
        | FieldType::Phone
        | FieldType::Formula
        | FieldType::CreatedBy
        | FieldType::UpdatedBy
        | FieldType::Id => Value::String(stringify(raw).trim().to_string()),
    }
}

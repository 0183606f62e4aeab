//! View filters.

use serde_json::Value;

use crate::convert::expand_option_refs;
use crate::types::{FieldConfig, FieldType, FilterOperator, RecordData, ViewFilter};
use crate::value::{is_blank, is_truthy, stringify, strict_number, value_to_date};

/// Returns the records that satisfy every filter, in their original order.
///
/// Filters naming a field that no longer exists are ignored.
pub fn filter<'a>(
    records: &'a [RecordData],
    filters: &[ViewFilter],
    fields: &[FieldConfig],
) -> Vec<&'a RecordData> {
    let active: Vec<(&ViewFilter, &FieldConfig)> = filters
        .iter()
        .filter_map(|f| fields.iter().find(|x| x.id == f.field_id).map(|x| (f, x)))
        .collect();

    records
        .iter()
        .filter(|record| active.iter().all(|(f, field)| matches_filter(record, f, field)))
        .collect()
}

/// Whether one record satisfies one filter.
pub fn matches_filter(record: &RecordData, filter: &ViewFilter, field: &FieldConfig) -> bool {
    let cell = record.get(&filter.field_id);
    match filter.operator {
        FilterOperator::IsEmpty => is_blank(cell),
        FilterOperator::IsNotEmpty => !is_blank(cell),
        FilterOperator::Equals => cell_equals(cell, &filter.value, field),
        FilterOperator::NotEquals => !cell_equals(cell, &filter.value, field),
        FilterOperator::Contains => cell_contains(cell, &filter.value, field),
        FilterOperator::NotContains => !cell_contains(cell, &filter.value, field),
        FilterOperator::GreaterThan => compare(cell, &filter.value, field)
            .is_some_and(|o| o == std::cmp::Ordering::Greater),
        FilterOperator::LessThan => compare(cell, &filter.value, field)
            .is_some_and(|o| o == std::cmp::Ordering::Less),
    }
}

fn labels(cell: &Value, field: &FieldConfig) -> Vec<String> {
    match expand_option_refs(cell, field) {
        Value::Array(items) => items.iter().map(|v| stringify(v).to_lowercase()).collect(),
        other => vec![stringify(&other).to_lowercase()],
    }
}

fn raw_ids(cell: &Value) -> Vec<&str> {
    match cell {
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        Value::String(s) => vec![s.as_str()],
        _ => Vec::new(),
    }
}

fn cell_equals(cell: &Value, target: &Value, field: &FieldConfig) -> bool {
    match field.field_type {
        FieldType::Number | FieldType::Rating | FieldType::Progress | FieldType::AutoNumber => {
            let (a, b) = (strict_number(cell), strict_number(target));
            !is_blank(cell) && a.is_finite() && a == b
        }
        FieldType::Checkbox => is_truthy(cell) == is_truthy(target),
        FieldType::Date | FieldType::CreatedTime | FieldType::UpdatedTime => {
            match (value_to_date(cell), value_to_date(target)) {
                (Some(a), Some(b)) => a.date_naive() == b.date_naive(),
                _ => false,
            }
        }
        _ => {
            let needle = stringify(target);
            if raw_ids(cell).contains(&needle.as_str()) {
                return true;
            }
            let needle = needle.to_lowercase();
            labels(cell, field).iter().any(|l| *l == needle)
        }
    }
}

fn cell_contains(cell: &Value, target: &Value, field: &FieldConfig) -> bool {
    let needle = stringify(target).to_lowercase();
    if needle.is_empty() {
        return true;
    }
    if field.field_type.has_options() && raw_ids(cell).iter().any(|id| id.to_lowercase() == needle) {
        return true;
    }
    labels(cell, field).iter().any(|l| l.contains(&needle))
}

fn compare(cell: &Value, target: &Value, field: &FieldConfig) -> Option<std::cmp::Ordering> {
    if is_blank(cell) {
        return None;
    }
    match field.field_type {
        FieldType::Date | FieldType::CreatedTime | FieldType::UpdatedTime => {
            Some(value_to_date(cell)?.cmp(&value_to_date(target)?))
        }
        _ => {
            let (a, b) = (strict_number(cell), strict_number(target));
            if a.is_finite() && b.is_finite() {
                a.partial_cmp(&b)
            } else {
                None
            }
        }
    }
}

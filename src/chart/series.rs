//! Categorical and pie series.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use super::config::{Aggregation, ChartConfig, SortOrder};
use super::palette::{scheme_color, OTHERS_COLOR};
use crate::processing::{category_label, group_by_field, reduce, ReduceOp};
use crate::types::{FieldConfig, RecordData};
use crate::value::{number_or_zero, round2};

/// Series key used when records are counted rather than summed.
pub const COUNT_KEY: &str = "count";

/// Name of the consolidated pie slice produced by Top-N truncation.
pub const OTHERS_LABEL: &str = "Others";

/// One x-axis category with a value per series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub category: String,
    #[serde(flatten)]
    pub values: IndexMap<String, f64>,
}

impl CategoryRow {
    /// Value of one series; missing series read as 0.
    pub fn value(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    /// Render-ready object with the category under `x_key`.
    pub fn to_json(&self, x_key: &str) -> Value {
        let mut map = Map::new();
        map.insert(x_key.to_string(), Value::String(self.category.clone()));
        for (k, v) in &self.values {
            map.insert(k.clone(), crate::value::number_value(*v));
        }
        Value::Object(map)
    }
}

/// One pie/donut slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
    pub fill: String,
}

fn find_field<'a>(fields: &'a [FieldConfig], id: &str) -> Option<&'a FieldConfig> {
    fields.iter().find(|f| f.id == id)
}

/// Key the categorical series is sorted and truncated by.
pub(crate) fn primary_key(config: &ChartConfig) -> Option<String> {
    if config.effective_aggregation() == Aggregation::Count {
        return Some(COUNT_KEY.to_string());
    }
    config.y_axis_fields.first().map(|y| y.field_id.clone())
}

/// Series keys present in every categorical row, in legend order.
pub(crate) fn series_keys(config: &ChartConfig) -> Vec<String> {
    if config.effective_aggregation() == Aggregation::Count {
        vec![COUNT_KEY.to_string()]
    } else {
        config.y_axis_fields.iter().map(|y| y.field_id.clone()).collect()
    }
}

fn sort_by_value<T>(items: &mut [T], order: SortOrder, value: impl Fn(&T) -> f64) {
    let cmp = |a: &T, b: &T| value(a).partial_cmp(&value(b)).unwrap_or(Ordering::Equal);
    match order {
        SortOrder::None => {}
        SortOrder::Asc => items.sort_by(cmp),
        SortOrder::Desc => items.sort_by(|a, b| cmp(b, a)),
    }
}

/// Series for bar/line/area and their stacked variants.
///
/// Grouped modes emit one row per distinct x-axis label in first-seen order, rounded to two
/// decimals; `none` emits one row per record. Rows are then sorted by the primary series and
/// truncated to `top_n`.
pub fn categorical_series(
    config: &ChartConfig,
    fields: &[FieldConfig],
    records: &[RecordData],
) -> Vec<CategoryRow> {
    let Some(x_id) = config.x_field() else {
        return Vec::new();
    };
    let aggregation = config.effective_aggregation();
    if config.y_axis_fields.is_empty() && aggregation != Aggregation::Count {
        return Vec::new();
    }
    let x_field = find_field(fields, x_id);

    let mut rows: Vec<CategoryRow> = match aggregation.reduce_op() {
        Some(ReduceOp::Count) => group_by_field(records, x_id, x_field)
            .into_iter()
            .map(|(category, members)| {
                let mut values = IndexMap::new();
                values.insert(COUNT_KEY.to_string(), members.len() as f64);
                CategoryRow { category, values }
            })
            .collect(),
        Some(op) => group_by_field(records, x_id, x_field)
            .into_iter()
            .map(|(category, members)| {
                let values = config
                    .y_axis_fields
                    .iter()
                    .map(|y| {
                        let nums: Vec<f64> = members
                            .iter()
                            .map(|r| number_or_zero(r.get(&y.field_id)))
                            .collect();
                        let reduced = reduce(&nums, op).unwrap_or(0.0);
                        (y.field_id.clone(), round2(reduced))
                    })
                    .collect();
                CategoryRow { category, values }
            })
            .collect(),
        None => records
            .iter()
            .map(|r| {
                let values = config
                    .y_axis_fields
                    .iter()
                    .map(|y| (y.field_id.clone(), number_or_zero(r.get(&y.field_id))))
                    .collect();
                CategoryRow {
                    category: category_label(r, x_id, x_field),
                    values,
                }
            })
            .collect(),
    };

    if let Some(key) = primary_key(config) {
        sort_by_value(&mut rows, config.sort_order, |row| row.value(&key));
    }
    if config.top_n > 0 {
        rows.truncate(config.top_n);
    }
    rows
}

/// Series for pie and donut charts.
///
/// Each x-axis label sums the first y-axis field (or counts records). When Top-N truncates,
/// the remainder is folded into a trailing [`OTHERS_LABEL`] slice.
pub fn pie_series(config: &ChartConfig, fields: &[FieldConfig], records: &[RecordData]) -> Vec<PieSlice> {
    let Some(x_id) = config.x_field() else {
        return Vec::new();
    };
    let x_field = find_field(fields, x_id);
    let summed_field = match config.effective_aggregation() {
        Aggregation::Count => None,
        _ => config.y_axis_fields.first().map(|y| y.field_id.as_str()),
    };

    let mut slices: Vec<(String, f64)> = group_by_field(records, x_id, x_field)
        .into_iter()
        .map(|(name, members)| {
            let value = match summed_field {
                Some(fid) => round2(members.iter().map(|r| number_or_zero(r.get(fid))).sum()),
                None => members.len() as f64,
            };
            (name, value)
        })
        .collect();

    sort_by_value(&mut slices, config.sort_order, |(_, v)| *v);

    let mut others = None;
    if config.top_n > 0 && slices.len() > config.top_n {
        let rest = slices.split_off(config.top_n);
        others = Some(round2(rest.iter().map(|(_, v)| v).sum()));
    }

    let mut out: Vec<PieSlice> = slices
        .into_iter()
        .enumerate()
        .map(|(i, (name, value))| PieSlice {
            name,
            value,
            fill: scheme_color(config.color_scheme, i).to_string(),
        })
        .collect();
    if let Some(value) = others {
        out.push(PieSlice {
            name: OTHERS_LABEL.to_string(),
            value,
            fill: OTHERS_COLOR.to_string(),
        });
    }
    out
}

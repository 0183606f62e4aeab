//! Summary statistics for chart badges.

use std::collections::HashSet;

use serde::Serialize;

use super::config::ChartConfig;
use crate::processing::{category_label, reduce, ReduceOp};
use crate::types::{FieldConfig, RecordData};
use crate::value::{is_blank, number_or_zero, round2};

/// Record count, distinct x-axis categories, and min/max/avg of the first y-axis field.
///
/// The numeric statistics read raw record values, not the aggregated series. Blank or missing
/// cells are skipped; other non-numeric cells read as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartStats {
    pub total: usize,
    pub categories: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

pub fn chart_stats(config: &ChartConfig, fields: &[FieldConfig], records: &[RecordData]) -> ChartStats {
    let categories = match config.x_field() {
        Some(x_id) => {
            let x_field = fields.iter().find(|f| f.id == x_id);
            records
                .iter()
                .map(|r| category_label(r, x_id, x_field))
                .collect::<HashSet<_>>()
                .len()
        }
        None => 0,
    };

    let values = config
        .y_axis_fields
        .first()
        .map(|y| {
            records
                .iter()
                .map(|r| r.get(&y.field_id))
                .filter(|v| !is_blank(v))
                .map(number_or_zero)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    ChartStats {
        total: records.len(),
        categories,
        min: reduce(&values, ReduceOp::Min).unwrap_or(0.0),
        max: reduce(&values, ReduceOp::Max).unwrap_or(0.0),
        avg: reduce(&values, ReduceOp::Avg).map(round2).unwrap_or(0.0),
    }
}

//! Radar, scatter and radial-bar reshapes.

use indexmap::IndexMap;
use serde::Serialize;

use super::config::ChartConfig;
use super::palette::{scheme_color, series_label};
use super::series::{primary_key, CategoryRow};
use crate::processing::category_label;
use crate::types::{FieldConfig, RecordData};
use crate::value::number_or_zero;

/// Bubble size used when no third y-axis field is configured.
pub const DEFAULT_BUBBLE_SIZE: f64 = 10.0;

/// Rows kept by the radial-bar reshape.
pub const RADIAL_LIMIT: usize = 8;

/// One radar axis, with values keyed by series title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarRow {
    pub subject: String,
    #[serde(flatten)]
    pub values: IndexMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadialEntry {
    pub name: String,
    pub value: f64,
    pub fill: String,
}

/// Reshape categorical rows for radar charts, keying values by series title.
pub fn radar_series(rows: &[CategoryRow], config: &ChartConfig, fields: &[FieldConfig]) -> Vec<RadarRow> {
    rows.iter()
        .map(|row| RadarRow {
            subject: row.category.clone(),
            values: row
                .values
                .iter()
                .map(|(key, v)| (series_label(config, fields, key), *v))
                .collect(),
        })
        .collect()
}

/// One point per record from the first two y-axis fields; the third, if any, sizes the bubble.
///
/// Needs at least two y-axis fields and an x-axis field (used for point names).
pub fn scatter_series(config: &ChartConfig, fields: &[FieldConfig], records: &[RecordData]) -> Vec<ScatterPoint> {
    let Some(x_id) = config.x_field() else {
        return Vec::new();
    };
    let [x_axis, y_axis, rest @ ..] = config.y_axis_fields.as_slice() else {
        return Vec::new();
    };
    let x_field = fields.iter().find(|f| f.id == x_id);
    let z_axis = rest.first();

    records
        .iter()
        .map(|r| ScatterPoint {
            x: number_or_zero(r.get(&x_axis.field_id)),
            y: number_or_zero(r.get(&y_axis.field_id)),
            z: z_axis
                .map(|z| number_or_zero(r.get(&z.field_id)))
                .unwrap_or(DEFAULT_BUBBLE_SIZE),
            name: category_label(r, x_id, x_field),
        })
        .collect()
}

/// The first [`RADIAL_LIMIT`] categorical rows as palette-colored bars.
pub fn radial_series(rows: &[CategoryRow], config: &ChartConfig) -> Vec<RadialEntry> {
    let Some(key) = primary_key(config) else {
        return Vec::new();
    };
    rows.iter()
        .take(RADIAL_LIMIT)
        .enumerate()
        .map(|(i, row)| RadialEntry {
            name: row.category.clone(),
            value: row.value(&key),
            fill: scheme_color(config.color_scheme, i).to_string(),
        })
        .collect()
}

//! Chart aggregation pipeline.
//!
//! [`build_chart`] turns a chart configuration, a field list and a record set into every
//! projection the chart families render from: categorical rows, pie slices, radar rows,
//! scatter points, radial bars, summary statistics and a legend map. Each projection is
//! also available on its own. Nothing here fails: missing axes produce empty series.

pub mod config;
pub mod format;
pub mod palette;
pub mod series;
pub mod shapes;
pub mod stats;

use indexmap::IndexMap;
use serde::Serialize;

pub use config::{
    Aggregation, AxisFormat, ChartConfig, ChartType, ColorScheme, SortOrder, YAxisConfig, YAxisField,
};
pub use format::format_axis_tick;
pub use palette::{category_legend, scheme_color, series_legend, LegendEntry, OTHERS_COLOR};
pub use series::{categorical_series, pie_series, CategoryRow, PieSlice, COUNT_KEY, OTHERS_LABEL};
pub use shapes::{radar_series, radial_series, scatter_series, RadarRow, RadialEntry, ScatterPoint};
pub use stats::{chart_stats, ChartStats};

use crate::types::{FieldConfig, RecordData, ViewConfig};

/// Every chart projection for one configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBundle {
    pub chart_data: Vec<CategoryRow>,
    pub pie_data: Vec<PieSlice>,
    pub radar_data: Vec<RadarRow>,
    pub scatter_data: Vec<ScatterPoint>,
    pub radial_data: Vec<RadialEntry>,
    pub stats: ChartStats,
    /// Legend keyed by series id, or by category name for pie, donut, radial and radar charts.
    pub series_config: IndexMap<String, LegendEntry>,
    pub y_axis_format: AxisFormat,
}

impl ChartBundle {
    /// Tick label for the value axis, using the configured format.
    pub fn format_tick(&self, value: f64) -> String {
        format_axis_tick(value, self.y_axis_format)
    }
}

pub fn build_chart(config: &ChartConfig, fields: &[FieldConfig], records: &[RecordData]) -> ChartBundle {
    let chart_data = categorical_series(config, fields, records);
    let pie_data = pie_series(config, fields, records);
    let radar_data = radar_series(&chart_data, config, fields);
    let scatter_data = scatter_series(config, fields, records);
    let radial_data = radial_series(&chart_data, config);

    let series_config = if config.chart_type.legend_by_category() {
        match config.chart_type {
            ChartType::Pie | ChartType::Donut => category_legend(
                config.color_scheme,
                pie_data.iter().map(|s| (s.name.as_str(), Some(s.fill.as_str()))),
            ),
            _ => category_legend(
                config.color_scheme,
                chart_data.iter().map(|r| (r.category.as_str(), None)),
            ),
        }
    } else {
        series_legend(config, fields, &series::series_keys(config))
    };

    ChartBundle {
        stats: chart_stats(config, fields, records),
        y_axis_format: config.y_axis_config.format,
        chart_data,
        pie_data,
        radar_data,
        scatter_data,
        radial_data,
        series_config,
    }
}

/// [`build_chart`] for a chart-typed view; `None` for any other view type.
pub fn build_view_chart(view: &ViewConfig, fields: &[FieldConfig], records: &[RecordData]) -> Option<ChartBundle> {
    view.chart_config().map(|config| build_chart(config, fields, records))
}

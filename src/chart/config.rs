//! Chart view configuration.

use serde::{Deserialize, Serialize};

use crate::processing::ReduceOp;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    #[default]
    Bar,
    HorizontalBar,
    StackedBar,
    Line,
    Area,
    StackedArea,
    Composed,
    Pie,
    Donut,
    Radar,
    Scatter,
    RadialBar,
}

impl ChartType {
    /// Chart families that fall back to counting records when no y-axis field is configured.
    pub fn counts_without_y(&self) -> bool {
        matches!(self, ChartType::Pie | ChartType::Donut | ChartType::Radar)
    }

    /// Chart families whose legend is keyed by category rather than by series.
    pub fn legend_by_category(&self) -> bool {
        matches!(
            self,
            ChartType::Pie | ChartType::Donut | ChartType::RadialBar | ChartType::Radar
        )
    }
}

/// How records sharing an x-axis value are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// One point per record.
    #[default]
    None,
    Sum,
    Avg,
    Min,
    Max,
    Count,
}

impl Aggregation {
    pub fn reduce_op(&self) -> Option<ReduceOp> {
        match self {
            Aggregation::None => None,
            Aggregation::Sum => Some(ReduceOp::Sum),
            Aggregation::Avg => Some(ReduceOp::Avg),
            Aggregation::Min => Some(ReduceOp::Min),
            Aggregation::Max => Some(ReduceOp::Max),
            Aggregation::Count => Some(ReduceOp::Count),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    None,
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    #[default]
    Default,
    Warm,
    Cool,
    Monochrome,
}

/// Tick label style for the value axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisFormat {
    #[default]
    Number,
    Percent,
    Currency,
    Compact,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxisConfig {
    #[serde(default)]
    pub format: AxisFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One plotted series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxisField {
    pub field_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl YAxisField {
    pub fn new(field_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            color: None,
            label: None,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(default)]
    pub chart_type: ChartType,
    #[serde(default)]
    pub x_axis_field: Option<String>,
    #[serde(default)]
    pub y_axis_fields: Vec<YAxisField>,
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub sort_order: SortOrder,
    /// Keep only the first N rows after sorting; 0 keeps everything.
    #[serde(default)]
    pub top_n: usize,
    #[serde(default)]
    pub color_scheme: ColorScheme,
    #[serde(default)]
    pub y_axis_config: YAxisConfig,
    #[serde(default = "default_true")]
    pub show_legend: bool,
    #[serde(default = "default_true")]
    pub show_grid: bool,
    #[serde(default)]
    pub show_labels: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            chart_type: ChartType::default(),
            x_axis_field: None,
            y_axis_fields: Vec::new(),
            aggregation: Aggregation::default(),
            sort_order: SortOrder::default(),
            top_n: 0,
            color_scheme: ColorScheme::default(),
            y_axis_config: YAxisConfig::default(),
            show_legend: true,
            show_grid: true,
            show_labels: false,
        }
    }
}

impl ChartConfig {
    /// Configured x-axis field id, treating an empty string as unset.
    pub fn x_field(&self) -> Option<&str> {
        self.x_axis_field.as_deref().filter(|s| !s.is_empty())
    }

    /// Aggregation actually applied: counting stands in when a count-capable chart has no
    /// y-axis field.
    pub fn effective_aggregation(&self) -> Aggregation {
        if self.y_axis_fields.is_empty() && self.chart_type.counts_without_y() {
            Aggregation::Count
        } else {
            self.aggregation
        }
    }
}

//! Series colors and legend configuration.

use indexmap::IndexMap;
use serde::Serialize;

use super::config::{ChartConfig, ColorScheme};
use super::series::COUNT_KEY;
use crate::types::FieldConfig;

/// Fill of the consolidated "Others" pie slice.
pub const OTHERS_COLOR: &str = "#9ca3af";

const DEFAULT: [&str; 8] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#06b6d4", "#84cc16",
];
const WARM: [&str; 8] = [
    "#ef4444", "#f97316", "#f59e0b", "#eab308", "#dc2626", "#ea580c", "#d97706", "#ca8a04",
];
const COOL: [&str; 8] = [
    "#3b82f6", "#06b6d4", "#14b8a6", "#6366f1", "#0ea5e9", "#8b5cf6", "#2563eb", "#0891b2",
];
const MONOCHROME: [&str; 8] = [
    "#111827", "#374151", "#4b5563", "#6b7280", "#9ca3af", "#d1d5db", "#1f2937", "#e5e7eb",
];

pub fn scheme_colors(scheme: ColorScheme) -> &'static [&'static str; 8] {
    match scheme {
        ColorScheme::Default => &DEFAULT,
        ColorScheme::Warm => &WARM,
        ColorScheme::Cool => &COOL,
        ColorScheme::Monochrome => &MONOCHROME,
    }
}

/// Color at `index`, cycling through the scheme.
pub fn scheme_color(scheme: ColorScheme, index: usize) -> &'static str {
    let colors = scheme_colors(scheme);
    colors[index % colors.len()]
}

/// Legend/tooltip entry for one series or category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// Human label of a y-axis series: explicit label, then field title, then id.
pub(crate) fn series_label(config: &ChartConfig, fields: &[FieldConfig], key: &str) -> String {
    if key == COUNT_KEY {
        return "Count".to_string();
    }
    let explicit = config
        .y_axis_fields
        .iter()
        .find(|y| y.field_id == key)
        .and_then(|y| y.label.clone())
        .filter(|l| !l.is_empty());
    explicit
        .or_else(|| fields.iter().find(|f| f.id == key).map(|f| f.title.clone()))
        .unwrap_or_else(|| key.to_string())
}

/// Legend entries keyed by y-axis field id (or `count`).
pub fn series_legend(config: &ChartConfig, fields: &[FieldConfig], keys: &[String]) -> IndexMap<String, LegendEntry> {
    keys.iter()
        .enumerate()
        .map(|(i, key)| {
            let color = config
                .y_axis_fields
                .iter()
                .find(|y| &y.field_id == key)
                .and_then(|y| y.color.clone())
                .unwrap_or_else(|| scheme_color(config.color_scheme, i).to_string());
            let entry = LegendEntry {
                label: series_label(config, fields, key),
                color,
            };
            (key.clone(), entry)
        })
        .collect()
}

/// Legend entries keyed by category name, with explicit fills where the series carries them.
pub fn category_legend<'a>(
    scheme: ColorScheme,
    categories: impl Iterator<Item = (&'a str, Option<&'a str>)>,
) -> IndexMap<String, LegendEntry> {
    categories
        .enumerate()
        .map(|(i, (name, fill))| {
            let color = fill
                .map(str::to_string)
                .unwrap_or_else(|| scheme_color(scheme, i).to_string());
            (
                name.to_string(),
                LegendEntry {
                    label: name.to_string(),
                    color,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::config::YAxisField;
    use crate::types::FieldType;

    #[test]
    fn colors_cycle_per_scheme() {
        assert_eq!(scheme_color(ColorScheme::Warm, 0), WARM[0]);
        assert_eq!(scheme_color(ColorScheme::Warm, 9), WARM[1]);
        assert_ne!(scheme_color(ColorScheme::Cool, 0), scheme_color(ColorScheme::Monochrome, 0));
    }

    #[test]
    fn series_legend_prefers_explicit_label_and_color() {
        let mut config = ChartConfig::default();
        config.y_axis_fields = vec![
            YAxisField {
                field_id: "rev".to_string(),
                color: Some("#123456".to_string()),
                label: Some("Revenue".to_string()),
            },
            YAxisField::new("cost"),
        ];
        let fields = vec![FieldConfig::new("cost", "Cost", FieldType::Number)];
        let legend = series_legend(&config, &fields, &["rev".to_string(), "cost".to_string()]);
        assert_eq!(legend["rev"].label, "Revenue");
        assert_eq!(legend["rev"].color, "#123456");
        assert_eq!(legend["cost"].label, "Cost");
        assert_eq!(legend["cost"].color, DEFAULT[1]);
    }
}

//! Value-axis tick labels.

use super::config::AxisFormat;
use crate::value::{format_number, to_grouped_string};

/// Format one tick value.
///
/// - `Percent`: `"{v}%"`
/// - `Currency`: `"¥"` followed by the grouped number
/// - `Compact`: `M` above a million, `K` above a thousand, one decimal
/// - `Number`: grouped number
pub fn format_axis_tick(value: f64, format: AxisFormat) -> String {
    match format {
        AxisFormat::Percent => format!("{}%", format_number(value)),
        AxisFormat::Currency => format!("¥{}", to_grouped_string(value)),
        AxisFormat::Compact => {
            let abs = value.abs();
            if abs >= 1_000_000.0 {
                format!("{:.1}M", value / 1_000_000.0)
            } else if abs >= 1_000.0 {
                format!("{:.1}K", value / 1_000.0)
            } else {
                to_grouped_string(value)
            }
        }
        AxisFormat::Number => to_grouped_string(value),
    }
}

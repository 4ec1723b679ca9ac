use serde::{Deserialize, Serialize};

use crate::core::{BarPoint, LineConfig, SeriesBinding};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

use super::formatters::{
    BarTooltipFormatterFn, CategoryFormatterFn, DateFormatterFn, SeriesTooltipFormatterFn,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipRow {
    pub series_name: String,
    pub formatted_value: String,
    pub color: Color,
}

/// Hover payload handed to the host for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub position: TooltipPosition,
    pub label: String,
    pub rows: Vec<TooltipRow>,
}

impl Tooltip {
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize tooltip json: {e}")))
    }
}

fn offset_position(anchor: (f64, f64), offset: (f64, f64)) -> TooltipPosition {
    TooltipPosition {
        x: anchor.0 + offset.0,
        y: anchor.1 + offset.1,
    }
}

/// Tooltip for one hovered bar: the category as label, one value row.
#[must_use]
pub fn present_bar_tooltip(
    point: &BarPoint,
    anchor: (f64, f64),
    offset: (f64, f64),
    color: Color,
    category_formatter: &CategoryFormatterFn,
    tooltip_formatter: &BarTooltipFormatterFn,
) -> Tooltip {
    Tooltip {
        position: offset_position(anchor, offset),
        label: category_formatter(&point.label),
        rows: vec![TooltipRow {
            series_name: point.label.clone(),
            formatted_value: tooltip_formatter(point),
            color,
        }],
    }
}

/// Tooltip for the row at `index`: the date as label and one row per
/// declared series that has a sample there. Series without a sample are
/// skipped, never shown as zero.
#[must_use]
pub fn present_line_tooltip(
    binding: &SeriesBinding,
    index: usize,
    lines: &[LineConfig],
    anchor: (f64, f64),
    offset: (f64, f64),
    date_formatter: &DateFormatterFn,
    tooltip_formatter: &SeriesTooltipFormatterFn,
) -> Option<Tooltip> {
    let point = binding.points.get(index)?;
    let rows = lines
        .iter()
        .enumerate()
        .filter_map(|(series, line)| {
            let value = binding.sample(index, series)?;
            let (formatted_value, series_name) = tooltip_formatter(value, line.display_name());
            Some(TooltipRow {
                series_name,
                formatted_value,
                color: line.stroke,
            })
        })
        .collect();

    Some(Tooltip {
        position: offset_position(anchor, offset),
        label: date_formatter(point.date),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{present_bar_tooltip, present_line_tooltip};
    use crate::api::formatters::{
        BarTooltipFormatterFn, default_bar_tooltip_formatter, default_category_formatter,
        default_date_formatter, default_series_tooltip_formatter,
    };
    use crate::core::{BarPoint, LineConfig, SeriesPoint, bind_series};
    use crate::render::Color;

    #[test]
    fn bar_tooltip_is_offset_from_anchor() {
        let percent: BarTooltipFormatterFn =
            Arc::new(|point: &BarPoint| format!("{}%", point.value));
        let tooltip = present_bar_tooltip(
            &BarPoint::new("Docker", 68.0),
            (100.0, 40.0),
            (10.0, 10.0),
            Color::rgb(0.0, 0.0, 0.0),
            &default_category_formatter(),
            &percent,
        );
        assert_eq!((tooltip.position.x, tooltip.position.y), (110.0, 50.0));
        assert_eq!(tooltip.label, "Docker");
        assert_eq!(tooltip.rows[0].formatted_value, "68%");

        let plain = present_bar_tooltip(
            &BarPoint::new("AWS", 55.0),
            (0.0, 0.0),
            (0.0, 0.0),
            Color::rgb(0.0, 0.0, 0.0),
            &default_category_formatter(),
            &default_bar_tooltip_formatter(),
        );
        assert_eq!(plain.rows[0].formatted_value, "55");
    }

    #[test]
    fn line_tooltip_skips_missing_series() {
        let lines = vec![
            LineConfig::new("a", Color::rgb(1.0, 0.0, 0.0)).with_name("Alpha"),
            LineConfig::new("b", Color::rgb(0.0, 0.0, 1.0)),
        ];
        let binding = bind_series(
            &[SeriesPoint::new("2024-05-01").with_value("a", 3.0).with_missing("b")],
            &lines,
        );

        let tooltip = present_line_tooltip(
            &binding,
            0,
            &lines,
            (5.0, 5.0),
            (10.0, 10.0),
            &default_date_formatter(),
            &default_series_tooltip_formatter(),
        )
        .expect("row exists");
        assert_eq!(tooltip.label, "May 01");
        assert_eq!(tooltip.rows.len(), 1);
        assert_eq!(tooltip.rows[0].series_name, "Alpha");
        assert!(
            present_line_tooltip(
                &binding,
                3,
                &lines,
                (0.0, 0.0),
                (0.0, 0.0),
                &default_date_formatter(),
                &default_series_tooltip_formatter(),
            )
            .is_none()
        );
    }
}

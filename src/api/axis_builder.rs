//! Axis, grid, reference-line and legend primitives.
//!
//! Every builder appends to an existing [`RenderFrame`]; tick sets come from
//! the scales, so grid density never depends on the number of data points.

use tracing::trace;

use crate::core::primitives::unix_millis_to_datetime;
use crate::core::{BandScale, LineConfig, LinearScale, PlotArea, ReferenceLine, TimeScale};
use crate::render::{
    LinePrimitive, LineStrokeStyle, Paint, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
};

use super::RenderStyle;
use super::formatters::{CategoryFormatterFn, DateFormatterFn, ValueFormatterFn};

/// Average glyph advance relative to the font size, used for legend layout.
const APPROX_GLYPH_WIDTH_RATIO: f64 = 0.6;

/// One labelled tick in container pixels along its axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

/// Edge of the plot an axis is drawn along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPlacement {
    Bottom,
    Left,
}

#[must_use]
pub fn linear_axis_ticks(
    scale: LinearScale,
    count: usize,
    formatter: &ValueFormatterFn,
) -> Vec<AxisTick> {
    scale
        .ticks(count)
        .into_iter()
        .map(|value| AxisTick {
            position: scale.project(value),
            label: formatter(value),
        })
        .collect()
}

#[must_use]
pub fn time_axis_ticks(
    scale: TimeScale,
    count: usize,
    formatter: &DateFormatterFn,
) -> Vec<AxisTick> {
    scale
        .ticks(count)
        .into_iter()
        .filter_map(|millis| {
            let date = unix_millis_to_datetime(millis)?;
            Some(AxisTick {
                position: scale.project_millis(millis),
                label: formatter(date),
            })
        })
        .collect()
}

/// One tick per category, centered on its band.
#[must_use]
pub fn band_axis_ticks(band: &BandScale, formatter: &CategoryFormatterFn) -> Vec<AxisTick> {
    let half = band.bandwidth() * 0.5;
    band.categories()
        .enumerate()
        .filter_map(|(index, category)| {
            Some(AxisTick {
                position: band.project_index(index)? + half,
                label: formatter(category),
            })
        })
        .collect()
}

/// Axis border, tick marks and tick labels.
pub fn push_axis(
    frame: &mut RenderFrame,
    plot: PlotArea,
    placement: AxisPlacement,
    ticks: &[AxisTick],
    style: &RenderStyle,
    font_size_px: f64,
) {
    let border = match placement {
        AxisPlacement::Bottom => (plot.left, plot.bottom(), plot.right(), plot.bottom()),
        AxisPlacement::Left => (plot.left, plot.top, plot.left, plot.bottom()),
    };
    frame.lines.push(LinePrimitive::new(
        border.0,
        border.1,
        border.2,
        border.3,
        style.axis_border_width,
        style.axis_border_color,
    ));

    let tick = style.tick_mark_length;
    let gap = style.axis_label_padding;
    for axis_tick in ticks.iter().filter(|t| t.position.is_finite()) {
        let p = axis_tick.position;
        let (mark, label_x, label_y, align) = match placement {
            AxisPlacement::Bottom => (
                (p, plot.bottom(), p, plot.bottom() + tick),
                p,
                plot.bottom() + tick + gap + font_size_px,
                TextHAlign::Center,
            ),
            AxisPlacement::Left => (
                (plot.left - tick, p, plot.left, p),
                plot.left - tick - gap,
                p + font_size_px * 0.35,
                TextHAlign::Right,
            ),
        };
        frame.lines.push(LinePrimitive::new(
            mark.0,
            mark.1,
            mark.2,
            mark.3,
            style.axis_border_width,
            style.axis_border_color,
        ));
        if !axis_tick.label.is_empty() {
            frame.texts.push(TextPrimitive::new(
                axis_tick.label.clone(),
                label_x,
                label_y,
                font_size_px,
                style.axis_label_color,
                align,
            ));
        }
    }
}

/// Grid lines across the plot, perpendicular to the axis the ticks belong to.
pub fn push_grid(
    frame: &mut RenderFrame,
    plot: PlotArea,
    placement: AxisPlacement,
    ticks: &[AxisTick],
    style: &RenderStyle,
) {
    for tick in ticks.iter().filter(|t| t.position.is_finite()) {
        let p = tick.position;
        let (x1, y1, x2, y2) = match placement {
            AxisPlacement::Bottom => (p, plot.top, p, plot.bottom()),
            AxisPlacement::Left => (plot.left, p, plot.right(), p),
        };
        frame.lines.push(LinePrimitive::new(
            x1,
            y1,
            x2,
            y2,
            style.grid_line_width,
            style.grid_line_color,
        ));
    }
}

/// Dashed horizontal lines at fixed values; lines outside the plot are skipped.
pub fn push_reference_lines(
    frame: &mut RenderFrame,
    plot: PlotArea,
    value_scale: LinearScale,
    lines: &[ReferenceLine],
    style: &RenderStyle,
    font_size_px: f64,
) {
    for line in lines {
        let y = value_scale.project(line.y);
        if !y.is_finite() || y < plot.top || y > plot.bottom() {
            trace!(value = line.y, y, "skipping reference line outside plot");
            continue;
        }
        frame.lines.push(
            LinePrimitive::new(
                plot.left,
                y,
                plot.right(),
                y,
                style.reference_line_width,
                line.stroke,
            )
            .with_stroke_style(LineStrokeStyle::Dashed),
        );
        if let Some(label) = line.label.as_deref().filter(|label| !label.is_empty()) {
            frame.texts.push(TextPrimitive::new(
                label,
                plot.right(),
                y - style.axis_label_padding,
                font_size_px,
                line.stroke,
                TextHAlign::Right,
            ));
        }
    }
}

/// One swatch and name per declared series, laid out left to right.
pub fn push_legend(
    frame: &mut RenderFrame,
    lines: &[LineConfig],
    plot: PlotArea,
    legend_top: f64,
    legend_height: f64,
    style: &RenderStyle,
    font_size_px: f64,
) {
    let size = style.legend_swatch_size;
    let center_y = legend_top + legend_height * 0.5;
    let mut x = plot.left;

    for line in lines {
        let name = line.display_name();
        frame.rects.push(RectPrimitive::filled(
            x,
            center_y - size * 0.5,
            size,
            size,
            Paint::Solid(line.stroke),
        ));
        let text_x = x + size + style.axis_label_padding;
        if !name.is_empty() {
            frame.texts.push(TextPrimitive::new(
                name,
                text_x,
                center_y + font_size_px * 0.35,
                font_size_px,
                style.axis_label_color,
                TextHAlign::Left,
            ));
        }
        let text_width = name.chars().count() as f64 * font_size_px * APPROX_GLYPH_WIDTH_RATIO;
        x = text_x + text_width + style.legend_item_spacing;
    }
}

use crate::render::Color;

/// Style contract shared by the bar and line scene builders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub grid_line_color: Color,
    pub grid_line_width: f64,
    pub axis_border_color: Color,
    pub axis_border_width: f64,
    pub tick_mark_length: f64,
    pub axis_label_color: Color,
    /// Gap between tick marks and their labels.
    pub axis_label_padding: f64,
    pub value_label_color: Color,
    pub hover_outline_color: Color,
    pub hover_outline_width: f64,
    pub cursor_line_color: Color,
    pub cursor_line_width: f64,
    pub active_dot_radius: f64,
    pub marker_radius: f64,
    pub legend_swatch_size: f64,
    pub legend_item_spacing: f64,
    pub reference_line_width: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            grid_line_color: Color::rgb(0.89, 0.92, 0.95),
            grid_line_width: 1.0,
            axis_border_color: Color::rgb(0.82, 0.84, 0.88),
            axis_border_width: 1.0,
            tick_mark_length: 5.0,
            axis_label_color: Color::rgb(0.10, 0.12, 0.16),
            axis_label_padding: 4.0,
            value_label_color: Color::rgb(0.10, 0.12, 0.16),
            hover_outline_color: Color::rgb(0.30, 0.35, 0.44),
            hover_outline_width: 2.0,
            cursor_line_color: Color::rgb(0.30, 0.35, 0.44),
            cursor_line_width: 1.0,
            active_dot_radius: 4.0,
            marker_radius: 3.0,
            legend_swatch_size: 10.0,
            legend_item_spacing: 16.0,
            reference_line_width: 1.0,
        }
    }
}

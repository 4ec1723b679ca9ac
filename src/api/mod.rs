mod axis_builder;
mod bar_chart;
mod config;
mod events;
pub mod formatters;
mod line_chart;
mod render_style;
mod tooltip;

pub use axis_builder::{
    AxisPlacement, AxisTick, band_axis_ticks, linear_axis_ticks, push_axis, push_grid,
    push_legend, push_reference_lines, time_axis_ticks,
};
pub use bar_chart::{BarChart, BarChartOptions, BarLayout, layout_bars, render_bar_scene};
pub use config::ChartLayoutConfig;
pub use events::{ChartEvent, ChartNotification, ChartObserver};
pub use formatters::{
    BarClickFn, BarTooltipFormatterFn, CategoryFormatterFn, DateFormatterFn,
    SeriesTooltipFormatterFn, ValueFormatterFn,
};
pub use line_chart::{LineChart, LineChartOptions, LineLayout, layout_lines, render_line_scene};
pub use render_style::RenderStyle;
pub use tooltip::{
    Tooltip, TooltipPosition, TooltipRow, present_bar_tooltip, present_line_tooltip,
};

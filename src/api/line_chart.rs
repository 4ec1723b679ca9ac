use std::collections::HashSet;
use std::fmt;

use tracing::{debug, trace, warn};

use crate::core::ticks::nice_domain;
use crate::core::{
    LineConfig, LinearScale, PlotArea, ReferenceLine, SeriesBinding, SeriesGeometry, SeriesPoint,
    TimeScale, Viewport, bind_series, project_all_series,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    HoverChange, HoverState, HoverTarget, InteractionTracker, ResizeCoordinator, ResizeSender,
    locate_nearest_time,
};
use crate::render::{CirclePrimitive, LinePrimitive, PathPrimitive, RenderFrame, Renderer, Stroke};

use super::axis_builder::{
    AxisPlacement, linear_axis_ticks, push_axis, push_grid, push_legend, push_reference_lines,
    time_axis_ticks,
};
use super::events::ObserverRegistry;
use super::formatters::{
    DateFormatterFn, SeriesTooltipFormatterFn, ValueFormatterFn, default_date_formatter,
    default_series_tooltip_formatter, default_value_formatter,
};
use super::tooltip::present_line_tooltip;
use super::{
    ChartEvent, ChartLayoutConfig, ChartNotification, ChartObserver, RenderStyle, Tooltip,
};

/// Caller inputs of a multi-series time-line chart.
#[derive(Clone)]
pub struct LineChartOptions {
    pub lines: Vec<LineConfig>,
    pub reference_lines: Vec<ReferenceLine>,
    pub date_formatter: DateFormatterFn,
    pub value_formatter: ValueFormatterFn,
    pub tooltip_formatter: SeriesTooltipFormatterFn,
    /// Fixed value domain; when absent the sampled extent (plus zero) is niced.
    pub y_domain: Option<(f64, f64)>,
    pub show_grid: bool,
    pub show_legend: bool,
}

impl Default for LineChartOptions {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            reference_lines: Vec::new(),
            date_formatter: default_date_formatter(),
            value_formatter: default_value_formatter(),
            tooltip_formatter: default_series_tooltip_formatter(),
            y_domain: None,
            show_grid: true,
            show_legend: true,
        }
    }
}

impl LineChartOptions {
    #[must_use]
    pub fn new(lines: Vec<LineConfig>) -> Self {
        Self {
            lines,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_reference_line(mut self, line: ReferenceLine) -> Self {
        self.reference_lines.push(line);
        self
    }

    #[must_use]
    pub fn with_date_formatter(mut self, formatter: DateFormatterFn) -> Self {
        self.date_formatter = formatter;
        self
    }

    #[must_use]
    pub fn with_value_formatter(mut self, formatter: ValueFormatterFn) -> Self {
        self.value_formatter = formatter;
        self
    }

    #[must_use]
    pub fn with_tooltip_formatter(mut self, formatter: SeriesTooltipFormatterFn) -> Self {
        self.tooltip_formatter = formatter;
        self
    }

    #[must_use]
    pub fn with_y_domain(mut self, min: f64, max: f64) -> Self {
        self.y_domain = Some((min, max));
        self
    }

    #[must_use]
    pub fn with_grid(mut self, show_grid: bool) -> Self {
        self.show_grid = show_grid;
        self
    }

    #[must_use]
    pub fn with_legend(mut self, show_legend: bool) -> Self {
        self.show_legend = show_legend;
        self
    }

    /// Rejects series declarations that could never draw.
    pub fn validate(&self) -> ChartResult<()> {
        let mut keys = HashSet::with_capacity(self.lines.len());
        for line in &self.lines {
            if line.data_key.is_empty() {
                return Err(ChartError::InvalidConfig(
                    "line data key must not be empty".to_owned(),
                ));
            }
            if !keys.insert(line.data_key.as_str()) {
                return Err(ChartError::InvalidConfig(format!(
                    "line data key `{}` is declared twice",
                    line.data_key
                )));
            }
            if !line.stroke_width.is_finite() || line.stroke_width <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "line `{}` stroke width must be finite and > 0",
                    line.data_key
                )));
            }
            line.stroke
                .validate()
                .map_err(|e| ChartError::InvalidConfig(format!("line `{}`: {e}", line.data_key)))?;
        }
        if let Some((min, max)) = self.y_domain {
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(ChartError::InvalidConfig(
                    "y domain must be finite with min <= max".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for LineChartOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineChartOptions")
            .field("lines", &self.lines)
            .field("reference_lines", &self.reference_lines)
            .field("y_domain", &self.y_domain)
            .field("show_grid", &self.show_grid)
            .field("show_legend", &self.show_legend)
            .finish_non_exhaustive()
    }
}

/// Scales and series geometry for one container size.
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub viewport: Viewport,
    pub plot: PlotArea,
    pub time_scale: TimeScale,
    pub value_scale: LinearScale,
    /// Ascending timestamps of the bound rows, searched on hover.
    pub times: Vec<f64>,
    pub series: Vec<SeriesGeometry>,
}

fn value_domain(
    binding: &SeriesBinding,
    options: &LineChartOptions,
    tick_count: usize,
) -> (f64, f64) {
    if let Some(domain) = options.y_domain {
        return domain;
    }
    match binding.value_extent {
        Some((min, max)) => nice_domain(min.min(0.0), max.max(0.0), tick_count),
        None => (0.0, 1.0),
    }
}

/// Builds the shared time axis and the value scale, then projects every series.
#[must_use]
pub fn layout_lines(
    binding: &SeriesBinding,
    options: &LineChartOptions,
    config: &ChartLayoutConfig,
) -> LineLayout {
    let plot = config.plot_area(options.show_legend);
    let (start, end) = binding.time_domain.unwrap_or((0.0, 0.0));
    let time_scale = TimeScale::from_millis(start, end, (plot.left, plot.right()));
    let value_scale = LinearScale::new(
        value_domain(binding, options, config.tick_count),
        (plot.bottom(), plot.top),
    );
    let series = project_all_series(binding, time_scale, value_scale);

    LineLayout {
        viewport: config.viewport(),
        plot,
        time_scale,
        value_scale,
        times: binding.times(),
        series,
    }
}

/// Pure scene builder: the same inputs always produce the same frame.
///
/// An empty binding or an undrawable plot yields an empty frame.
#[must_use]
pub fn render_line_scene(
    layout: &LineLayout,
    binding: &SeriesBinding,
    options: &LineChartOptions,
    config: &ChartLayoutConfig,
    style: &RenderStyle,
    hover: Option<&HoverState>,
) -> RenderFrame {
    let mut frame = RenderFrame::new(layout.viewport);
    if binding.is_empty() || !layout.plot.is_drawable() {
        return frame;
    }
    let plot = layout.plot;
    let font = config.font_size_px;

    let time_ticks = time_axis_ticks(
        layout.time_scale,
        config.tick_count,
        &options.date_formatter,
    );
    let value_ticks = linear_axis_ticks(
        layout.value_scale,
        config.tick_count,
        &options.value_formatter,
    );
    if options.show_grid {
        push_grid(&mut frame, plot, AxisPlacement::Bottom, &time_ticks, style);
        push_grid(&mut frame, plot, AxisPlacement::Left, &value_ticks, style);
    }
    push_reference_lines(
        &mut frame,
        plot,
        layout.value_scale,
        &options.reference_lines,
        style,
        font,
    );

    for geometry in &layout.series {
        let Some(line) = options.lines.get(geometry.series_index) else {
            continue;
        };
        let stroke = Stroke::new(line.stroke, line.stroke_width);
        for run in &geometry.runs {
            frame
                .paths
                .push(PathPrimitive::new(run.commands.clone(), stroke));
        }
        for marker in &geometry.markers {
            frame.circles.push(CirclePrimitive::new(
                marker.x,
                marker.y,
                style.marker_radius,
                line.stroke,
            ));
        }
    }

    if let Some(index) = hover.map(|state| state.nearest_index) {
        if let Some(&time) = layout.times.get(index) {
            let x = layout.time_scale.project_millis(time);
            frame.lines.push(LinePrimitive::new(
                x,
                plot.top,
                x,
                plot.bottom(),
                style.cursor_line_width,
                style.cursor_line_color,
            ));
            for (series, line) in options.lines.iter().enumerate() {
                if let Some(value) = binding.sample(index, series) {
                    frame.circles.push(CirclePrimitive::new(
                        x,
                        layout.value_scale.project(value),
                        style.active_dot_radius,
                        line.stroke,
                    ));
                }
            }
        }
    }

    push_axis(&mut frame, plot, AxisPlacement::Bottom, &time_ticks, style, font);
    push_axis(&mut frame, plot, AxisPlacement::Left, &value_ticks, style, font);

    if options.show_legend {
        let legend_top = f64::from(layout.viewport.height) - config.legend_height;
        push_legend(
            &mut frame,
            &options.lines,
            plot,
            legend_top,
            config.legend_height,
            style,
            font,
        );
    }

    frame
}

/// Multi-series time-line chart bound to one renderer.
pub struct LineChart<R: Renderer> {
    renderer: R,
    config: ChartLayoutConfig,
    options: LineChartOptions,
    style: RenderStyle,
    data: Vec<SeriesPoint>,
    binding: SeriesBinding,
    layout: LineLayout,
    interaction: InteractionTracker,
    resize: ResizeCoordinator,
    observers: ObserverRegistry,
}

impl<R: Renderer> LineChart<R> {
    pub fn new(
        renderer: R,
        config: ChartLayoutConfig,
        options: LineChartOptions,
    ) -> ChartResult<Self> {
        config.validate()?;
        options.validate()?;
        let binding = SeriesBinding::default();
        let layout = layout_lines(&binding, &options, &config);
        debug!(
            width = config.width,
            height = config.height,
            series_count = options.lines.len(),
            "created line chart"
        );
        Ok(Self {
            renderer,
            resize: ResizeCoordinator::new(config.width, config.resize_min_delta_px),
            config,
            options,
            style: RenderStyle::default(),
            data: Vec::new(),
            binding,
            layout,
            interaction: InteractionTracker::default(),
            observers: ObserverRegistry::default(),
        })
    }

    /// Replaces the dated rows and clears any hover into the old data.
    pub fn set_data(&mut self, data: Vec<SeriesPoint>) {
        self.data = data;
        self.rebind();
        debug!(
            original_count = self.data.len(),
            bound_count = self.binding.len(),
            "set series data"
        );
    }

    pub fn set_options(&mut self, options: LineChartOptions) -> ChartResult<()> {
        options.validate()?;
        self.options = options;
        self.rebind();
        Ok(())
    }

    pub fn set_render_style(&mut self, style: RenderStyle) {
        self.style = style;
    }

    fn rebind(&mut self) {
        self.binding = bind_series(&self.data, &self.options.lines);
        self.relayout();
        if self.interaction.clear() {
            self.observers.emit(&ChartNotification::HoverCleared);
        }
    }

    fn relayout(&mut self) {
        self.layout = layout_lines(&self.binding, &self.options, &self.config);
    }

    #[must_use]
    pub fn data(&self) -> &[SeriesPoint] {
        &self.data
    }

    #[must_use]
    pub fn binding(&self) -> &SeriesBinding {
        &self.binding
    }

    #[must_use]
    pub fn layout(&self) -> &LineLayout {
        &self.layout
    }

    #[must_use]
    pub fn series(&self) -> &[SeriesGeometry] {
        &self.layout.series
    }

    #[must_use]
    pub fn config(&self) -> &ChartLayoutConfig {
        &self.config
    }

    #[must_use]
    pub fn options(&self) -> &LineChartOptions {
        &self.options
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.layout.viewport
    }

    #[must_use]
    pub fn hover(&self) -> Option<&HoverState> {
        self.interaction.hover()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn resize_sender(&self) -> ResizeSender {
        self.resize.sender()
    }

    #[must_use]
    pub fn scene(&self) -> RenderFrame {
        render_line_scene(
            &self.layout,
            &self.binding,
            &self.options,
            &self.config,
            &self.style,
            self.interaction.hover(),
        )
    }

    /// Draws the current scene. Skipped while the container has no area.
    pub fn render(&mut self) -> ChartResult<()> {
        if !self.layout.viewport.is_valid() {
            trace!(width = self.layout.viewport.width, "skipping render of empty viewport");
            return Ok(());
        }
        let frame = self.scene();
        self.renderer.render(&frame)
    }

    /// Resolves the row nearest to the pointer's date and returns its tooltip.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<Tooltip> {
        self.hover_at(x, y);
        self.tooltip()
    }

    pub fn pointer_leave(&mut self) -> bool {
        let cleared = self.interaction.clear();
        if cleared {
            self.observers.emit(&ChartNotification::HoverCleared);
        }
        cleared
    }

    /// Tooltip for the current hover, anchored on the topmost active sample.
    #[must_use]
    pub fn tooltip(&self) -> Option<Tooltip> {
        let state = self.interaction.hover()?;
        let index = state.nearest_index;
        let x = self
            .layout
            .time_scale
            .project_millis(*self.layout.times.get(index)?);
        let y = (0..self.options.lines.len())
            .filter_map(|series| self.binding.sample(index, series))
            .map(|value| self.layout.value_scale.project(value))
            .reduce(f64::min)
            .unwrap_or(state.pointer_y);

        present_line_tooltip(
            &self.binding,
            index,
            &self.options.lines,
            (x, y),
            self.config.tooltip_offset,
            &self.options.date_formatter,
            &self.options.tooltip_formatter,
        )
    }

    /// Queues a container width and applies it immediately.
    pub fn resize(&mut self, width: f64) -> bool {
        self.resize.notify(width);
        self.process_pending_resize()
    }

    /// Applies the latest queued width. Hover survives only while its row
    /// still exists at the same index with the same date.
    pub fn process_pending_resize(&mut self) -> bool {
        let Some(width) = self.resize.poll() else {
            return false;
        };
        if width == 0 {
            warn!("container width collapsed to zero");
        }
        let previous_tooltip = self.tooltip();
        self.config.width = width;
        self.relayout();

        let had_hover = self.interaction.hover().is_some();
        let points = &self.binding.points;
        let kept = self.interaction.retain_if(|state| match &state.target {
            HoverTarget::Date(date) => points
                .get(state.nearest_index)
                .is_some_and(|point| &point.date == date),
            HoverTarget::Label(_) => false,
        });
        if had_hover && !kept {
            self.observers.emit(&ChartNotification::HoverCleared);
        } else if kept {
            self.emit_moved_tooltip(previous_tooltip);
        }

        debug!(width, height = self.config.height, "line chart relayout");
        self.observers.emit(&ChartNotification::Relayout {
            width,
            height: self.config.height,
        });
        true
    }

    /// Dispatches a host event. Returns whether visible state changed.
    ///
    /// Clicks are accepted but have no effect on line charts.
    pub fn handle_event(&mut self, event: ChartEvent) -> bool {
        match event {
            ChartEvent::PointerMove { x, y } => self.hover_at(x, y) != HoverChange::Unchanged,
            ChartEvent::PointerLeave => self.pointer_leave(),
            ChartEvent::Click { .. } => false,
            ChartEvent::Resize { width } => self.resize(width),
        }
    }

    pub fn register_observer(&mut self, observer: Box<dyn ChartObserver>) -> ChartResult<()> {
        self.observers.register(observer)
    }

    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        self.observers.unregister(observer_id)
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn nearest_at(&self, x: f64, y: f64) -> Option<HoverState> {
        if self.binding.is_empty() || !self.layout.plot.contains(x, y) {
            return None;
        }
        let target = self.layout.time_scale.invert(x);
        let index = locate_nearest_time(&self.layout.times, target)?;
        let point = self.binding.points.get(index)?;
        Some(HoverState {
            pointer_x: x,
            pointer_y: y,
            nearest_index: index,
            target: HoverTarget::Date(point.date),
        })
    }

    fn emit_moved_tooltip(&mut self, previous: Option<Tooltip>) {
        let (Some(index), Some(tooltip)) = (
            self.interaction.hover().map(|state| state.nearest_index),
            self.tooltip(),
        ) else {
            return;
        };
        if previous.as_ref() != Some(&tooltip) {
            self.observers
                .emit(&ChartNotification::HoverChanged { index, tooltip });
        }
    }

    fn hover_at(&mut self, x: f64, y: f64) -> HoverChange {
        let next = self.nearest_at(x, y);
        let change = self.interaction.update(next);
        trace!(x, y, change = ?change, "line hover resolved");

        match change {
            HoverChange::Changed => {
                if let (Some(index), Some(tooltip)) = (
                    self.interaction.hover().map(|state| state.nearest_index),
                    self.tooltip(),
                ) {
                    self.observers
                        .emit(&ChartNotification::HoverChanged { index, tooltip });
                }
            }
            HoverChange::Cleared => self.observers.emit(&ChartNotification::HoverCleared),
            HoverChange::Unchanged => {}
        }
        change
    }
}

impl<R: Renderer + fmt::Debug> fmt::Debug for LineChart<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineChart")
            .field("renderer", &self.renderer)
            .field("config", &self.config)
            .field("options", &self.options)
            .field("row_count", &self.binding.len())
            .field("hover", &self.interaction.hover())
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}

use std::fmt;

use tracing::{debug, trace, warn};

use crate::core::{
    BandScale, BarBinding, BarGeometry, BarPoint, LinearScale, Orientation, PlotArea, Viewport,
    bind_bars, project_bars, resolve_bar_paint,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    HoverChange, HoverState, HoverTarget, InteractionTracker, ResizeCoordinator, ResizeSender,
    locate_bar,
};
use crate::render::{
    Color, Paint, RectPrimitive, RenderFrame, Renderer, Stroke, TextHAlign, TextPrimitive,
};

use super::axis_builder::{AxisPlacement, band_axis_ticks, linear_axis_ticks, push_axis, push_grid};
use super::events::ObserverRegistry;
use super::formatters::{
    BarClickFn, BarTooltipFormatterFn, CategoryFormatterFn, ValueFormatterFn,
    default_bar_tooltip_formatter, default_category_formatter, default_value_formatter,
};
use super::tooltip::present_bar_tooltip;
use super::{
    ChartEvent, ChartLayoutConfig, ChartNotification, ChartObserver, RenderStyle, Tooltip,
};

/// Caller inputs of a categorical bar chart.
///
/// `value_formatter` labels the value axis and `category_formatter` the band
/// axis, whichever screen direction they end up on.
#[derive(Clone)]
pub struct BarChartOptions {
    pub orientation: Orientation,
    pub value_formatter: ValueFormatterFn,
    pub category_formatter: CategoryFormatterFn,
    pub tooltip_formatter: BarTooltipFormatterFn,
    pub show_grid: bool,
    pub show_values: bool,
    pub bar_color: Color,
    /// Fill bars with their tier gradient instead of `bar_color`.
    pub color_by_tier: bool,
    /// Fixed upper end of the value domain; also disables nice rounding.
    pub max_value: Option<f64>,
    pub on_click: Option<BarClickFn>,
}

impl Default for BarChartOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            value_formatter: default_value_formatter(),
            category_formatter: default_category_formatter(),
            tooltip_formatter: default_bar_tooltip_formatter(),
            show_grid: true,
            show_values: false,
            bar_color: Color::rgb(0.16, 0.38, 1.0),
            color_by_tier: true,
            max_value: None,
            on_click: None,
        }
    }
}

impl BarChartOptions {
    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_value_formatter(mut self, formatter: ValueFormatterFn) -> Self {
        self.value_formatter = formatter;
        self
    }

    #[must_use]
    pub fn with_category_formatter(mut self, formatter: CategoryFormatterFn) -> Self {
        self.category_formatter = formatter;
        self
    }

    #[must_use]
    pub fn with_tooltip_formatter(mut self, formatter: BarTooltipFormatterFn) -> Self {
        self.tooltip_formatter = formatter;
        self
    }

    #[must_use]
    pub fn with_grid(mut self, show_grid: bool) -> Self {
        self.show_grid = show_grid;
        self
    }

    #[must_use]
    pub fn with_values(mut self, show_values: bool) -> Self {
        self.show_values = show_values;
        self
    }

    #[must_use]
    pub fn with_bar_color(mut self, bar_color: Color) -> Self {
        self.bar_color = bar_color;
        self
    }

    #[must_use]
    pub fn with_color_by_tier(mut self, color_by_tier: bool) -> Self {
        self.color_by_tier = color_by_tier;
        self
    }

    #[must_use]
    pub fn with_max_value(mut self, max_value: f64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    #[must_use]
    pub fn with_on_click(mut self, on_click: BarClickFn) -> Self {
        self.on_click = Some(on_click);
        self
    }

    /// Rejects options that would only fail once a frame is rendered.
    pub fn validate(&self) -> ChartResult<()> {
        self.bar_color
            .validate()
            .map_err(|e| ChartError::InvalidConfig(format!("bar color: {e}")))?;
        if self.max_value.is_some_and(|max_value| !max_value.is_finite()) {
            return Err(ChartError::InvalidConfig(
                "max value must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for BarChartOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BarChartOptions")
            .field("orientation", &self.orientation)
            .field("show_grid", &self.show_grid)
            .field("show_values", &self.show_values)
            .field("bar_color", &self.bar_color)
            .field("color_by_tier", &self.color_by_tier)
            .field("max_value", &self.max_value)
            .field("on_click", &self.on_click.is_some())
            .finish_non_exhaustive()
    }
}

/// Scales and rectangles for one container size.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub viewport: Viewport,
    pub plot: PlotArea,
    pub orientation: Orientation,
    pub band: BandScale,
    pub value_scale: LinearScale,
    pub bars: Vec<BarGeometry>,
}

/// Builds the band and value scales for the plot and projects every bar.
///
/// Without an explicit `max_value` the value domain is rounded outward to
/// nice ticks; with one it is used as-is so bar lengths read as percentages.
#[must_use]
pub fn layout_bars(
    binding: &BarBinding,
    config: &ChartLayoutConfig,
    orientation: Orientation,
) -> BarLayout {
    let plot = config.plot_area(false);
    let (band_range, value_range) = match orientation {
        Orientation::Horizontal => ((plot.top, plot.bottom()), (plot.left, plot.right())),
        Orientation::Vertical => ((plot.left, plot.right()), (plot.bottom(), plot.top)),
    };

    let band = BandScale::new(
        binding.bars.iter().map(|bar| bar.label.as_str()),
        band_range,
        config.band_padding,
    );
    let mut value_scale = LinearScale::new(binding.value_domain(), value_range);
    if !binding.max_value_overridden {
        value_scale = value_scale.nice(config.tick_count);
    }

    let bars = project_bars(&binding.bars, &band, value_scale, orientation);
    BarLayout {
        viewport: config.viewport(),
        plot,
        orientation,
        band,
        value_scale,
        bars,
    }
}

fn bar_paint(binding: &BarBinding, bar: &BarGeometry, options: &BarChartOptions) -> Paint {
    let color_override = binding
        .bars
        .get(bar.index)
        .and_then(|bound| bound.color_override);
    resolve_bar_paint(
        bar.tier,
        color_override,
        options.color_by_tier,
        options.bar_color,
    )
}

/// Pure scene builder: the same inputs always produce the same frame.
///
/// An empty binding or an undrawable plot yields an empty frame.
#[must_use]
pub fn render_bar_scene(
    layout: &BarLayout,
    binding: &BarBinding,
    options: &BarChartOptions,
    config: &ChartLayoutConfig,
    style: &RenderStyle,
    hover: Option<&HoverState>,
) -> RenderFrame {
    let mut frame = RenderFrame::new(layout.viewport);
    if layout.bars.is_empty() || !layout.plot.is_drawable() {
        return frame;
    }

    let (value_placement, band_placement) = match layout.orientation {
        Orientation::Horizontal => (AxisPlacement::Bottom, AxisPlacement::Left),
        Orientation::Vertical => (AxisPlacement::Left, AxisPlacement::Bottom),
    };
    let value_ticks = linear_axis_ticks(
        layout.value_scale,
        config.tick_count,
        &options.value_formatter,
    );
    if options.show_grid {
        push_grid(&mut frame, layout.plot, value_placement, &value_ticks, style);
    }

    for bar in &layout.bars {
        frame.rects.push(RectPrimitive::filled(
            bar.x,
            bar.y,
            bar.width,
            bar.height,
            bar_paint(binding, bar, options),
        ));
    }

    if let Some(bar) = hover.and_then(|state| layout.bars.get(state.nearest_index)) {
        frame.rects.push(RectPrimitive::outlined(
            bar.x,
            bar.y,
            bar.width,
            bar.height,
            Stroke::new(style.hover_outline_color, style.hover_outline_width),
        ));
    }

    if options.show_values {
        let font = config.font_size_px;
        let gap = style.axis_label_padding;
        for bar in &layout.bars {
            let (end_x, end_y) = bar.value_anchor(layout.orientation, layout.value_scale);
            let (x, y, align) = match layout.orientation {
                Orientation::Horizontal => (end_x + gap, end_y + font * 0.35, TextHAlign::Left),
                Orientation::Vertical => (end_x, end_y - gap, TextHAlign::Center),
            };
            let text = (options.value_formatter)(bar.value);
            if !text.is_empty() {
                frame.texts.push(TextPrimitive::new(
                    text,
                    x,
                    y,
                    font,
                    style.value_label_color,
                    align,
                ));
            }
        }
    }

    push_axis(
        &mut frame,
        layout.plot,
        value_placement,
        &value_ticks,
        style,
        config.font_size_px,
    );
    let band_ticks = band_axis_ticks(&layout.band, &options.category_formatter);
    push_axis(
        &mut frame,
        layout.plot,
        band_placement,
        &band_ticks,
        style,
        config.font_size_px,
    );

    frame
}

/// Categorical bar chart bound to one renderer.
///
/// All work happens synchronously inside the calling event handler; the only
/// cross-thread input is the resize channel.
pub struct BarChart<R: Renderer> {
    renderer: R,
    config: ChartLayoutConfig,
    options: BarChartOptions,
    style: RenderStyle,
    data: Vec<BarPoint>,
    binding: BarBinding,
    layout: BarLayout,
    interaction: InteractionTracker,
    resize: ResizeCoordinator,
    observers: ObserverRegistry,
}

impl<R: Renderer> BarChart<R> {
    pub fn new(
        renderer: R,
        config: ChartLayoutConfig,
        options: BarChartOptions,
    ) -> ChartResult<Self> {
        config.validate()?;
        options.validate()?;
        let binding = bind_bars(&[], options.max_value);
        let layout = layout_bars(&binding, &config, options.orientation);
        debug!(
            width = config.width,
            height = config.height,
            orientation = ?options.orientation,
            "created bar chart"
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

    /// Replaces the bar records and clears any hover into the old data.
    pub fn set_data(&mut self, data: Vec<BarPoint>) {
        self.data = data;
        self.rebind();
        debug!(
            original_count = self.data.len(),
            bar_count = self.layout.bars.len(),
            "set bar data"
        );
    }

    pub fn set_options(&mut self, options: BarChartOptions) -> ChartResult<()> {
        options.validate()?;
        self.options = options;
        self.rebind();
        Ok(())
    }

    pub fn set_render_style(&mut self, style: RenderStyle) {
        self.style = style;
    }

    fn rebind(&mut self) {
        self.binding = bind_bars(&self.data, self.options.max_value);
        self.relayout();
        if self.interaction.clear() {
            self.observers.emit(&ChartNotification::HoverCleared);
        }
    }

    fn relayout(&mut self) {
        self.layout = layout_bars(&self.binding, &self.config, self.options.orientation);
    }

    #[must_use]
    pub fn data(&self) -> &[BarPoint] {
        &self.data
    }

    #[must_use]
    pub fn binding(&self) -> &BarBinding {
        &self.binding
    }

    #[must_use]
    pub fn layout(&self) -> &BarLayout {
        &self.layout
    }

    #[must_use]
    pub fn bars(&self) -> &[BarGeometry] {
        &self.layout.bars
    }

    #[must_use]
    pub fn config(&self) -> &ChartLayoutConfig {
        &self.config
    }

    #[must_use]
    pub fn options(&self) -> &BarChartOptions {
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

    /// Handle for hosts that observe the container on another thread.
    #[must_use]
    pub fn resize_sender(&self) -> ResizeSender {
        self.resize.sender()
    }

    /// Current scene including the hover overlay.
    #[must_use]
    pub fn scene(&self) -> RenderFrame {
        render_bar_scene(
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

    /// Resolves the bar under the pointer and returns its tooltip.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<Tooltip> {
        self.hover_at(x, y);
        self.tooltip()
    }

    /// Clears hover. Returns whether anything was hovered.
    pub fn pointer_leave(&mut self) -> bool {
        let cleared = self.interaction.clear();
        if cleared {
            self.observers.emit(&ChartNotification::HoverCleared);
        }
        cleared
    }

    /// Invokes `on_click` for the bar under the pointer; returns whether a bar was hit.
    pub fn click(&mut self, x: f64, y: f64) -> bool {
        let Some(bar) = self.bar_at(x, y) else {
            return false;
        };
        let (index, source_index, label) = (bar.index, bar.source_index, bar.label.clone());
        if let (Some(on_click), Some(point)) =
            (&self.options.on_click, self.data.get(source_index))
        {
            on_click(point);
        }
        debug!(index, label = %label, "bar clicked");
        self.observers
            .emit(&ChartNotification::Clicked { index, label });
        true
    }

    /// Tooltip for the current hover, if any.
    #[must_use]
    pub fn tooltip(&self) -> Option<Tooltip> {
        let state = self.interaction.hover()?;
        let bar = self.layout.bars.get(state.nearest_index)?;
        let point = self.data.get(bar.source_index)?;
        let color = bar_paint(&self.binding, bar, &self.options).base_color();
        Some(present_bar_tooltip(
            point,
            bar.value_anchor(self.layout.orientation, self.layout.value_scale),
            self.config.tooltip_offset,
            color,
            &self.options.category_formatter,
            &self.options.tooltip_formatter,
        ))
    }

    /// Queues a container width and applies it immediately.
    pub fn resize(&mut self, width: f64) -> bool {
        self.resize.notify(width);
        self.process_pending_resize()
    }

    /// Applies the latest queued width, if it differs enough from the current one.
    ///
    /// Hover survives a relayout only while its bar still exists under the
    /// same label.
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
        let bars = &self.layout.bars;
        let kept = self.interaction.retain_if(|state| match &state.target {
            HoverTarget::Label(label) => bars
                .get(state.nearest_index)
                .is_some_and(|bar| &bar.label == label),
            HoverTarget::Date(_) => false,
        });
        if had_hover && !kept {
            self.observers.emit(&ChartNotification::HoverCleared);
        } else if kept {
            self.emit_moved_tooltip(previous_tooltip);
        }

        debug!(width, height = self.config.height, "bar chart relayout");
        self.observers.emit(&ChartNotification::Relayout {
            width,
            height: self.config.height,
        });
        true
    }

    /// Dispatches a host event. Returns whether visible state changed.
    pub fn handle_event(&mut self, event: ChartEvent) -> bool {
        match event {
            ChartEvent::PointerMove { x, y } => self.hover_at(x, y) != HoverChange::Unchanged,
            ChartEvent::PointerLeave => self.pointer_leave(),
            ChartEvent::Click { x, y } => self.click(x, y),
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

    fn bar_at(&self, x: f64, y: f64) -> Option<&BarGeometry> {
        if !self.layout.plot.contains(x, y) {
            return None;
        }
        locate_bar(&self.layout.bars, x, y).and_then(|position| self.layout.bars.get(position))
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
        let next = self.bar_at(x, y).map(|bar| HoverState {
            pointer_x: x,
            pointer_y: y,
            nearest_index: bar.index,
            target: HoverTarget::Label(bar.label.clone()),
        });
        let change = self.interaction.update(next);
        trace!(x, y, change = ?change, "bar hover resolved");

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

impl<R: Renderer + fmt::Debug> fmt::Debug for BarChart<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BarChart")
            .field("renderer", &self.renderer)
            .field("config", &self.config)
            .field("options", &self.options)
            .field("bar_count", &self.layout.bars.len())
            .field("hover", &self.interaction.hover())
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}

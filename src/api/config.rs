use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_BAND_PADDING, Margins, PlotArea, Viewport};
use crate::error::{ChartError, ChartResult};

/// Layout shared by bar and line charts.
///
/// This type is serializable so host applications can persist chart layout
/// alongside their dashboards. Every field has a serde default, so partial
/// JSON documents are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayoutConfig {
    /// Initial container width; later widths arrive through resize events.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Fixed container height. Never observed, only configured.
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default = "default_tick_count")]
    pub tick_count: usize,
    #[serde(default = "default_band_padding")]
    pub band_padding: f64,
    /// Offset added to the hovered point so the tooltip clears the pointer.
    #[serde(default = "default_tooltip_offset")]
    pub tooltip_offset: (f64, f64),
    #[serde(default = "default_resize_min_delta_px")]
    pub resize_min_delta_px: f64,
    /// Strip reserved below the plot for the legend when it is shown.
    #[serde(default = "default_legend_height")]
    pub legend_height: f64,
    #[serde(default = "default_font_size_px")]
    pub font_size_px: f64,
}

impl Default for ChartLayoutConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margins: Margins::default(),
            tick_count: default_tick_count(),
            band_padding: default_band_padding(),
            tooltip_offset: default_tooltip_offset(),
            resize_min_delta_px: default_resize_min_delta_px(),
            legend_height: default_legend_height(),
            font_size_px: default_font_size_px(),
        }
    }
}

impl ChartLayoutConfig {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    #[must_use]
    pub fn with_band_padding(mut self, band_padding: f64) -> Self {
        self.band_padding = band_padding;
        self
    }

    #[must_use]
    pub fn with_tooltip_offset(mut self, dx: f64, dy: f64) -> Self {
        self.tooltip_offset = (dx, dy);
        self
    }

    #[must_use]
    pub fn with_resize_min_delta_px(mut self, delta: f64) -> Self {
        self.resize_min_delta_px = delta;
        self
    }

    #[must_use]
    pub fn viewport(self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Plot rectangle for the current width, optionally reserving the legend strip.
    #[must_use]
    pub fn plot_area(self, reserve_legend: bool) -> PlotArea {
        let mut margins = self.margins;
        if reserve_legend {
            margins.bottom += self.legend_height;
        }
        PlotArea::from_viewport(self.viewport(), margins)
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.viewport().is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        self.margins.validate()?;
        if self.tick_count == 0 {
            return Err(ChartError::InvalidConfig(
                "tick count must be > 0".to_owned(),
            ));
        }
        if !self.band_padding.is_finite() || !(0.0..1.0).contains(&self.band_padding) {
            return Err(ChartError::InvalidConfig(
                "band padding must be finite and in [0, 1)".to_owned(),
            ));
        }
        if !self.tooltip_offset.0.is_finite() || !self.tooltip_offset.1.is_finite() {
            return Err(ChartError::InvalidConfig(
                "tooltip offset must be finite".to_owned(),
            ));
        }
        if !self.resize_min_delta_px.is_finite() || self.resize_min_delta_px < 0.0 {
            return Err(ChartError::InvalidConfig(
                "resize min delta must be finite and >= 0".to_owned(),
            ));
        }
        if !self.legend_height.is_finite() || self.legend_height < 0.0 {
            return Err(ChartError::InvalidConfig(
                "legend height must be finite and >= 0".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a JSON layout document.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to parse layout config json: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to serialize layout config json: {e}"))
        })
    }
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    300
}

fn default_tick_count() -> usize {
    5
}

fn default_band_padding() -> f64 {
    DEFAULT_BAND_PADDING
}

fn default_tooltip_offset() -> (f64, f64) {
    (10.0, 10.0)
}

fn default_resize_min_delta_px() -> f64 {
    0.5
}

fn default_legend_height() -> f64 {
    24.0
}

fn default_font_size_px() -> f64 {
    12.0
}

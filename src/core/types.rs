use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::Tier;
use crate::core::primitives::decimal_to_f64;
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, deserialize_color};

/// Container size in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Space reserved around the plot for axes and labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 30.0,
            bottom: 30.0,
            left: 60.0,
        }
    }
}

impl Margins {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        for (side, value) in [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "margin `{side}` must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

/// Inner plotting rectangle in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    /// Shrinks the viewport by its margins. Sizes never go negative.
    #[must_use]
    pub fn from_viewport(viewport: Viewport, margins: Margins) -> Self {
        let width = f64::from(viewport.width) - margins.left - margins.right;
        let height = f64::from(viewport.height) - margins.top - margins.bottom;
        Self {
            left: margins.left,
            top: margins.top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn is_drawable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Inclusive containment test in container pixels. A plot without area
    /// contains nothing.
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        self.is_drawable()
            && x.is_finite()
            && y.is_finite()
            && x >= self.left
            && x <= self.right()
            && y >= self.top
            && y <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Bars grow rightwards from the left plot edge, one band per row.
    #[default]
    Horizontal,
    /// Bars grow upwards from the plot baseline, one band per column.
    Vertical,
}

/// One categorical sample of a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarPoint {
    pub label: String,
    pub value: f64,
    #[serde(default, rename = "colorOverride", alias = "color_override")]
    pub color_override: Option<String>,
    #[serde(default)]
    pub priority: Option<Tier>,
    #[serde(default)]
    pub metadata: IndexMap<String, Value>,
}

impl BarPoint {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            color_override: None,
            priority: None,
            metadata: IndexMap::new(),
        }
    }

    pub fn from_decimal(label: impl Into<String>, value: Decimal) -> ChartResult<Self> {
        Ok(Self::new(label, decimal_to_f64(value, "bar value")?))
    }

    #[must_use]
    pub fn with_color_override(mut self, color: impl Into<String>) -> Self {
        self.color_override = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Tier) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Date as supplied by the caller; strings are coerced during binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl From<DateTime<Utc>> for DateInput {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One dated row of a multi-series line chart.
///
/// A key that is absent, or present with `None`, means "no sample at this
/// date" for that series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: DateInput,
    #[serde(flatten)]
    pub values: IndexMap<String, Option<f64>>,
}

impl SeriesPoint {
    #[must_use]
    pub fn new(date: impl Into<DateInput>) -> Self {
        Self {
            date: date.into(),
            values: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), Some(value));
        self
    }

    #[must_use]
    pub fn with_missing(mut self, key: impl Into<String>) -> Self {
        self.values.insert(key.into(), None);
        self
    }
}

fn default_stroke_width() -> f64 {
    2.0
}

/// Declares one rendered series of a line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineConfig {
    #[serde(rename = "dataKey", alias = "data_key")]
    pub data_key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(deserialize_with = "deserialize_color")]
    pub stroke: Color,
    #[serde(default = "default_stroke_width", rename = "strokeWidth", alias = "stroke_width")]
    pub stroke_width: f64,
}

impl LineConfig {
    #[must_use]
    pub fn new(data_key: impl Into<String>, stroke: Color) -> Self {
        Self {
            data_key: data_key.into(),
            name: None,
            stroke,
            stroke_width: default_stroke_width(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    /// Name shown in legends and tooltips.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.data_key)
    }
}

/// Horizontal marker drawn across the plot at a fixed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub y: f64,
    #[serde(deserialize_with = "deserialize_color")]
    pub stroke: Color,
    #[serde(default)]
    pub label: Option<String>,
}

impl ReferenceLine {
    #[must_use]
    pub fn new(y: f64, stroke: Color) -> Self {
        Self {
            y,
            stroke,
            label: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Builds a color from 8-bit channels.
    #[must_use]
    pub fn rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    /// Parses `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn from_hex(input: &str) -> ChartResult<Self> {
        let hex = input.trim().trim_start_matches('#');
        if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
            return Err(ChartError::InvalidData(format!(
                "color `{input}` must be #rrggbb or #rrggbbaa"
            )));
        }

        let channel = |offset: usize| -> ChartResult<f64> {
            u8::from_str_radix(&hex[offset..offset + 2], 16)
                .map(|value| f64::from(value) / 255.0)
                .map_err(|_| ChartError::InvalidData(format!("color `{input}` is not valid hex")))
        };

        let alpha = if hex.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        let to_u8 = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.alpha >= 1.0 {
            format!(
                "#{:02x}{:02x}{:02x}",
                to_u8(self.red),
                to_u8(self.green),
                to_u8(self.blue)
            )
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                to_u8(self.red),
                to_u8(self.green),
                to_u8(self.blue),
                to_u8(self.alpha)
            )
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Accepts a color either as a `#rrggbb[aa]` string or as channel fields.
///
/// Host payloads use hex strings; scene JSON writes channels.
pub fn deserialize_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ColorInput {
        Hex(String),
        Channels(Color),
    }

    match ColorInput::deserialize(deserializer)? {
        ColorInput::Hex(raw) => Color::from_hex(&raw).map_err(serde::de::Error::custom),
        ColorInput::Channels(color) => Ok(color),
    }
}

/// Fill source for area primitives.
///
/// Gradients are referenced by id; backends that cannot resolve the id draw
/// `fallback` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Solid(Color),
    Gradient { id: String, fallback: Color },
}

impl Paint {
    #[must_use]
    pub fn base_color(&self) -> Color {
        match self {
            Self::Solid(color) => *color,
            Self::Gradient { fallback, .. } => *fallback,
        }
    }

    fn validate(&self) -> ChartResult<()> {
        if let Self::Gradient { id, .. } = self {
            if id.is_empty() {
                return Err(ChartError::InvalidData(
                    "gradient id must not be empty".to_owned(),
                ));
            }
        }
        self.base_color().validate()
    }
}

/// Outline settings shared by rects and paths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

impl Stroke {
    #[must_use]
    pub const fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }

    fn validate(self) -> ChartResult<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ChartError::InvalidData(
                "stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LineStrokeStyle {
    #[default]
    Solid,
    Dashed,
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
    #[serde(default)]
    pub stroke_style: LineStrokeStyle,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
            stroke_style: LineStrokeStyle::Solid,
        }
    }

    #[must_use]
    pub const fn with_stroke_style(mut self, stroke_style: LineStrokeStyle) -> Self {
        self.stroke_style = stroke_style;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.x1.is_finite()
            || !self.y1.is_finite()
            || !self.x2.is_finite()
            || !self.y2.is_finite()
        {
            return Err(ChartError::InvalidData(
                "line coordinates must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Draw command for one axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Option<Paint>,
    pub stroke: Option<Stroke>,
}

impl RectPrimitive {
    #[must_use]
    pub fn filled(x: f64, y: f64, width: f64, height: f64, fill: Paint) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill: Some(fill),
            stroke: None,
        }
    }

    #[must_use]
    pub fn outlined(x: f64, y: f64, width: f64, height: f64, stroke: Stroke) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill: None,
            stroke: Some(stroke),
        }
    }

    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.x.is_finite()
            || !self.y.is_finite()
            || !self.width.is_finite()
            || !self.height.is_finite()
        {
            return Err(ChartError::InvalidData(
                "rect geometry must be finite".to_owned(),
            ));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ChartError::InvalidData(
                "rect size must be >= 0".to_owned(),
            ));
        }
        if self.fill.is_none() && self.stroke.is_none() {
            return Err(ChartError::InvalidData(
                "rect needs a fill or a stroke".to_owned(),
            ));
        }
        if let Some(fill) = &self.fill {
            fill.validate()?;
        }
        if let Some(stroke) = self.stroke {
            stroke.validate()?;
        }
        Ok(())
    }
}

/// One step of a path in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    CubicTo {
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        x: f64,
        y: f64,
    },
}

impl PathCommand {
    /// End point of the command.
    #[must_use]
    pub fn end(self) -> (f64, f64) {
        match self {
            Self::MoveTo { x, y } | Self::LineTo { x, y } | Self::CubicTo { x, y, .. } => (x, y),
        }
    }

    fn is_finite(self) -> bool {
        match self {
            Self::MoveTo { x, y } | Self::LineTo { x, y } => x.is_finite() && y.is_finite(),
            Self::CubicTo {
                c1x,
                c1y,
                c2x,
                c2y,
                x,
                y,
            } => [c1x, c1y, c2x, c2y, x, y].iter().all(|v| v.is_finite()),
        }
    }
}

/// Stroked open path. Each path starts with exactly one `MoveTo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPrimitive {
    pub commands: Vec<PathCommand>,
    pub stroke: Stroke,
}

impl PathPrimitive {
    #[must_use]
    pub fn new(commands: Vec<PathCommand>, stroke: Stroke) -> Self {
        Self { commands, stroke }
    }

    pub fn validate(&self) -> ChartResult<()> {
        match self.commands.first() {
            Some(PathCommand::MoveTo { .. }) => {}
            _ => {
                return Err(ChartError::InvalidData(
                    "path must start with a move command".to_owned(),
                ));
            }
        }
        if self
            .commands
            .iter()
            .skip(1)
            .any(|command| matches!(command, PathCommand::MoveTo { .. }))
        {
            return Err(ChartError::InvalidData(
                "path must be one contiguous run".to_owned(),
            ));
        }
        if !self.commands.iter().all(|command| command.is_finite()) {
            return Err(ChartError::InvalidData(
                "path coordinates must be finite".to_owned(),
            ));
        }
        self.stroke.validate()
    }
}

/// Filled dot, used for isolated samples and hover markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CirclePrimitive {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub fill: Color,
}

impl CirclePrimitive {
    #[must_use]
    pub const fn new(cx: f64, cy: f64, radius: f64, fill: Color) -> Self {
        Self {
            cx,
            cy,
            radius,
            fill,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.cx.is_finite() || !self.cy.is_finite() {
            return Err(ChartError::InvalidData(
                "circle center must be finite".to_owned(),
            ));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ChartError::InvalidData(
                "circle radius must be finite and > 0".to_owned(),
            ));
        }
        self.fill.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ChartError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

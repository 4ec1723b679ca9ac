use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{CirclePrimitive, LinePrimitive, PathPrimitive, RectPrimitive, TextPrimitive};

pub const RENDER_FRAME_JSON_SCHEMA_V1: u32 = 1;

/// Backend-agnostic scene for one chart draw pass.
///
/// Primitive lists are drawn in declaration order: rects, paths, lines,
/// circles, then texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub rects: Vec<RectPrimitive>,
    pub paths: Vec<PathPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrameJsonContractV1 {
    pub schema_version: u32,
    pub frame: RenderFrame,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            rects: Vec::new(),
            paths: Vec::new(),
            lines: Vec::new(),
            circles: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: PathPrimitive) -> Self {
        self.paths.push(path);
        self
    }

    #[must_use]
    pub fn with_circle(mut self, circle: CirclePrimitive) -> Self {
        self.circles.push(circle);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for rect in &self.rects {
            rect.validate()?;
        }
        for path in &self.paths {
            path.validate()?;
        }
        for line in &self.lines {
            line.validate()?;
        }
        for circle in &self.circles {
            circle.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
            && self.paths.is_empty()
            && self.lines.is_empty()
            && self.circles.is_empty()
            && self.texts.is_empty()
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = RenderFrameJsonContractV1 {
            schema_version: RENDER_FRAME_JSON_SCHEMA_V1,
            frame: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize frame contract v1: {e}"))
        })
    }

    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(frame) = serde_json::from_str::<RenderFrame>(input) {
            return Ok(frame);
        }
        let payload: RenderFrameJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse frame json payload: {e}"))
        })?;
        if payload.schema_version != RENDER_FRAME_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported frame schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.frame)
    }
}

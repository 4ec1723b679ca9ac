mod frame;
mod null_renderer;
mod primitives;

pub use frame::{RENDER_FRAME_JSON_SCHEMA_V1, RenderFrame, RenderFrameJsonContractV1};
pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, LineStrokeStyle, Paint, PathCommand, PathPrimitive,
    RectPrimitive, Stroke, TextHAlign, TextPrimitive, deserialize_color,
};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code stays isolated from scales, binding and hover logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

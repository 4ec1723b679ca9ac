pub mod band_scale;
pub mod bar_series;
pub mod binding;
pub mod line_series;
pub mod primitives;
pub mod scale;
pub mod ticks;
pub mod tier;
pub mod time_scale;
pub mod types;

pub use band_scale::{BandScale, DEFAULT_BAND_PADDING};
pub use bar_series::{BarGeometry, project_bars};
pub use binding::{
    BarBinding, BoundBar, BoundSeriesPoint, SeriesBinding, bind_bars, bind_series,
};
pub use line_series::{
    SeriesGeometry, SeriesMarker, SeriesRun, monotone_path, project_all_series, project_series,
};
pub use scale::LinearScale;
pub use tier::{Tier, classify, classify_with_priority, resolve_bar_paint};
pub use time_scale::TimeScale;
pub use types::{
    BarPoint, DateInput, LineConfig, Margins, Orientation, PlotArea, ReferenceLine, SeriesPoint,
    Viewport,
};

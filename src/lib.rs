//! dash-chart: interactive bar and time-line chart engine.
//!
//! Caller records are bound, scaled and turned into a backend-agnostic
//! `RenderFrame`; pointer and resize events are fed back in as plain values.
//! Nothing here depends on a UI runtime.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{
    BarChart, BarChartOptions, ChartEvent, ChartLayoutConfig, ChartNotification, ChartObserver,
    LineChart, LineChartOptions, Tooltip,
};
pub use error::{ChartError, ChartResult};

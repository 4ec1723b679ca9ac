use serde::{Deserialize, Serialize};

use crate::core::binding::BoundBar;
use crate::core::tier::classify_with_priority;
use crate::core::{BandScale, LinearScale, Orientation, Tier};

/// Deterministic bar rectangle in container pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    /// Position of the bar in the bound (render) order.
    pub index: usize,
    pub source_index: usize,
    pub label: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub tier: Tier,
}

impl BarGeometry {
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Point at the free end of the bar, centered across its band.
    #[must_use]
    pub fn value_anchor(&self, orientation: Orientation, value_scale: LinearScale) -> (f64, f64) {
        let end = value_scale.project(self.value);
        match orientation {
            Orientation::Horizontal => (end, self.y + self.height * 0.5),
            Orientation::Vertical => (self.x + self.width * 0.5, end),
        }
    }
}

/// Projects bound bars into rectangles.
///
/// Horizontal: the band scale runs along y and the value scale along x;
/// each bar starts at the value baseline (`value_scale.project(0)`).
/// Vertical swaps the axes, the value scale range runs bottom-to-top so bars
/// grow upwards. Negative values extend the other way from the baseline.
#[must_use]
pub fn project_bars(
    bars: &[BoundBar],
    band: &BandScale,
    value_scale: LinearScale,
    orientation: Orientation,
) -> Vec<BarGeometry> {
    let baseline = value_scale.project(0.0);
    let bandwidth = band.bandwidth();

    bars.iter()
        .enumerate()
        .filter_map(|(index, bar)| {
            let slot = band.project(&bar.label)?;
            let end = value_scale.project(bar.value);
            let (low, extent) = (baseline.min(end), (end - baseline).abs());
            let (x, y, width, height) = match orientation {
                Orientation::Horizontal => (low, slot, extent, bandwidth),
                Orientation::Vertical => (slot, low, bandwidth, extent),
            };
            Some(BarGeometry {
                index,
                source_index: bar.source_index,
                label: bar.label.clone(),
                value: bar.value,
                x,
                y,
                width,
                height,
                tier: classify_with_priority(bar.value, bar.priority),
            })
        })
        .collect()
}

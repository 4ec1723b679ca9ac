//! Pointer-to-data resolution and hover state.

mod resize;

pub use resize::{ResizeCoordinator, ResizeSender};

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::BarGeometry;

/// What the hovered index refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HoverTarget {
    Label(String),
    Date(DateTime<Utc>),
}

/// Ephemeral hover snapshot. Cleared on pointer leave and whenever the data
/// it points into is replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverState {
    pub pointer_x: f64,
    pub pointer_y: f64,
    pub nearest_index: usize,
    pub target: HoverTarget,
}

/// Outcome of feeding a pointer sample into the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoverChange {
    /// Same index and target as before (pointer coordinates may have moved).
    Unchanged,
    Changed,
    Cleared,
}

/// Direct hit-test over bar rectangles; returns the position in `bars`.
#[must_use]
pub fn locate_bar(bars: &[BarGeometry], x: f64, y: f64) -> Option<usize> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    bars.iter().position(|bar| bar.contains(x, y))
}

/// Index of the timestamp nearest to `target` in ascending `times`.
///
/// Runs in O(log n). Ties resolve to the lowest index, which keeps the result
/// identical to [`nearest_time_linear_scan`].
#[must_use]
pub fn locate_nearest_time(times: &[f64], target: f64) -> Option<usize> {
    if times.is_empty() || target.is_nan() {
        return None;
    }

    let distance = |index: usize| (times[index] - target).abs();
    let insertion = times.partition_point(|time| *time < target);

    // Left of the insertion point distances shrink monotonically, so the
    // lowest index sharing the closest left distance is found by bisection.
    let left = (insertion > 0).then(|| {
        let closest = distance(insertion - 1);
        times[..insertion].partition_point(|time| (*time - target).abs() > closest)
    });
    let right = (insertion < times.len()).then_some(insertion);

    match (left, right) {
        (Some(left), Some(right)) => Some(if distance(left) <= distance(right) {
            left
        } else {
            right
        }),
        (left, right) => left.or(right),
    }
}

/// Reference nearest-neighbour scan with the same tie policy as
/// [`locate_nearest_time`].
#[must_use]
pub fn nearest_time_linear_scan(times: &[f64], target: f64) -> Option<usize> {
    if target.is_nan() {
        return None;
    }
    times
        .iter()
        .enumerate()
        .min_by_key(|(index, time)| (OrderedFloat((*time - target).abs()), *index))
        .map(|(index, _)| index)
}

/// Owns the hover state of one chart instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionTracker {
    hover: Option<HoverState>,
}

impl InteractionTracker {
    #[must_use]
    pub fn hover(&self) -> Option<&HoverState> {
        self.hover.as_ref()
    }

    /// Replaces the hover state with the latest resolution.
    pub fn update(&mut self, next: Option<HoverState>) -> HoverChange {
        let change = match (&self.hover, &next) {
            (None, None) => HoverChange::Unchanged,
            (Some(_), None) => HoverChange::Cleared,
            (Some(previous), Some(next))
                if previous.nearest_index == next.nearest_index
                    && previous.target == next.target =>
            {
                HoverChange::Unchanged
            }
            _ => HoverChange::Changed,
        };
        self.hover = next;
        change
    }

    /// Drops the hover state; returns whether anything was hovered.
    pub fn clear(&mut self) -> bool {
        self.hover.take().is_some()
    }

    /// Keeps the hover only while `is_valid` accepts its index and target.
    pub fn retain_if(&mut self, is_valid: impl FnOnce(&HoverState) -> bool) -> bool {
        match &self.hover {
            Some(state) if is_valid(state) => true,
            Some(_) => {
                self.hover = None;
                false
            }
            None => false,
        }
    }
}

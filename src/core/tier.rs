//! Value-to-tier classification and the static tier palette.

use serde::{Deserialize, Serialize};

use crate::render::{Color, Paint};

pub const CRITICAL_THRESHOLD: f64 = 75.0;
pub const HIGH_THRESHOLD: f64 = 50.0;
pub const MEDIUM_THRESHOLD: f64 = 25.0;

/// Coarse demand/priority class derived from a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Critical,
    High,
    Medium,
    Low,
}

impl Tier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    #[must_use]
    pub const fn gradient_id(self) -> &'static str {
        match self {
            Self::Critical => "tier-critical-gradient",
            Self::High => "tier-high-gradient",
            Self::Medium => "tier-medium-gradient",
            Self::Low => "tier-low-gradient",
        }
    }

    /// Solid color used when a backend cannot resolve the gradient.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Critical => Color::rgb(0.937, 0.267, 0.267),
            Self::High => Color::rgb(0.976, 0.451, 0.086),
            Self::Medium => Color::rgb(0.918, 0.702, 0.031),
            Self::Low => Color::rgb(0.133, 0.773, 0.369),
        }
    }

    #[must_use]
    pub fn paint(self) -> Paint {
        Paint::Gradient {
            id: self.gradient_id().to_owned(),
            fallback: self.color(),
        }
    }
}

/// Classifies a percentage. Lower bounds are inclusive; NaN falls to `Low`.
#[must_use]
pub fn classify(value: f64) -> Tier {
    if value >= CRITICAL_THRESHOLD {
        Tier::Critical
    } else if value >= HIGH_THRESHOLD {
        Tier::High
    } else if value >= MEDIUM_THRESHOLD {
        Tier::Medium
    } else {
        Tier::Low
    }
}

/// An explicit priority wins outright; otherwise thresholds apply.
#[must_use]
pub fn classify_with_priority(value: f64, explicit: Option<Tier>) -> Tier {
    explicit.unwrap_or_else(|| classify(value))
}

/// Resolves the fill of one bar.
///
/// Order: explicit color override, then the tier gradient when tier coloring
/// is on, then the chart's bar color.
#[must_use]
pub fn resolve_bar_paint(
    tier: Tier,
    color_override: Option<Color>,
    color_by_tier: bool,
    bar_color: Color,
) -> Paint {
    match color_override {
        Some(color) => Paint::Solid(color),
        None if color_by_tier => tier.paint(),
        None => Paint::Solid(bar_color),
    }
}

use serde::{Deserialize, Serialize};

use crate::core::ticks::{linear_ticks, nice_domain};
use crate::error::{ChartError, ChartResult};

/// Continuous mapping from a numeric domain to a pixel range.
///
/// The range may be descending (e.g. `(bottom, top)` for value axes that grow
/// upwards). Values outside the domain project outside the range unless
/// clamping is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_start: f64,
    range_end: f64,
    #[serde(default)]
    clamp: bool,
}

impl LinearScale {
    /// Builds a scale, ordering the domain so `domain_min <= domain_max`.
    ///
    /// Non-finite domain bounds collapse to a `(0, 0)` domain, which maps every
    /// value to the start of the range.
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (min, max) = if domain.0.is_finite() && domain.1.is_finite() {
            (domain.0.min(domain.1), domain.0.max(domain.1))
        } else {
            (0.0, 0.0)
        };
        Self {
            domain_min: min,
            domain_max: max,
            range_start: range.0,
            range_end: range.1,
            clamp: false,
        }
    }

    /// Strict constructor for callers that want invalid domains reported.
    pub fn checked(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        if domain.0 > domain.1 {
            return Err(ChartError::InvalidData(
                "scale domain min must be <= max".to_owned(),
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }
        Ok(Self::new(domain, range))
    }

    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    #[must_use]
    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range_start = range.0;
        self.range_end = range.1;
        self
    }

    /// Expands the domain outward so its ends land on nice tick steps.
    #[must_use]
    pub fn nice(mut self, tick_count: usize) -> Self {
        let (min, max) = nice_domain(self.domain_min, self.domain_max, tick_count);
        self.domain_min = min;
        self.domain_max = max;
        self
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.domain_max == self.domain_min
    }

    #[must_use]
    pub fn project(self, value: f64) -> f64 {
        if self.is_degenerate() {
            return self.range_start;
        }
        let value = if self.clamp {
            value.clamp(self.domain_min, self.domain_max)
        } else {
            value
        };
        let normalized = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range_end - self.range_start;
        if span == 0.0 || self.is_degenerate() {
            return self.domain_min;
        }
        let normalized = (pixel - self.range_start) / span;
        let value = self.domain_min + normalized * (self.domain_max - self.domain_min);
        if self.clamp {
            value.clamp(self.domain_min, self.domain_max)
        } else {
            value
        }
    }

    /// Nice tick values inside the domain.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        linear_ticks(self.domain_min, self.domain_max, count)
    }
}

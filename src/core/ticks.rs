//! Tick generation for linear and time domains.
//!
//! Linear steps come from the `{1, 2, 5, 10} x 10^k` ladder. Time steps come
//! from a fixed ladder of calendar-friendly durations in milliseconds.

const MAX_TICKS: usize = 10_000;

const SECOND_MS: f64 = 1_000.0;
const MINUTE_MS: f64 = 60.0 * SECOND_MS;
const HOUR_MS: f64 = 60.0 * MINUTE_MS;
const DAY_MS: f64 = 24.0 * HOUR_MS;

const TIME_STEPS_MS: &[f64] = &[
    SECOND_MS,
    5.0 * SECOND_MS,
    15.0 * SECOND_MS,
    30.0 * SECOND_MS,
    MINUTE_MS,
    5.0 * MINUTE_MS,
    15.0 * MINUTE_MS,
    30.0 * MINUTE_MS,
    HOUR_MS,
    3.0 * HOUR_MS,
    6.0 * HOUR_MS,
    12.0 * HOUR_MS,
    DAY_MS,
    2.0 * DAY_MS,
    7.0 * DAY_MS,
    14.0 * DAY_MS,
    30.0 * DAY_MS,
    90.0 * DAY_MS,
    180.0 * DAY_MS,
    365.0 * DAY_MS,
];

/// Smallest step from the `{1, 2, 5, 10} x 10^k` ladder that is `>= raw_step`.
///
/// Returns `0.0` for non-finite or non-positive input.
#[must_use]
pub fn nice_step(raw_step: f64) -> f64 {
    if !raw_step.is_finite() || raw_step <= 0.0 {
        return 0.0;
    }

    let base = 10_f64.powf(raw_step.log10().floor());
    for multiplier in [1.0, 2.0, 5.0, 10.0] {
        let candidate = base * multiplier;
        // Guard against `log10` rounding just below an exact power of ten.
        if candidate >= raw_step * (1.0 - 1e-12) {
            return candidate;
        }
    }
    base * 10.0
}

/// Expands `[min, max]` outward to multiples of the nice step for `count` ticks.
///
/// Degenerate or non-finite domains are returned unchanged.
#[must_use]
pub fn nice_domain(min: f64, max: f64, count: usize) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() || min >= max || count == 0 {
        return (min, max);
    }
    let step = nice_step((max - min) / count as f64);
    if step == 0.0 {
        return (min, max);
    }
    ((min / step).floor() * step, (max / step).ceil() * step)
}

/// Tick values at multiples of the nice step that fall inside `[min, max]`.
#[must_use]
pub fn linear_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }
    let (min, max) = (min.min(max), min.max(max));
    let step = nice_step((max - min) / count as f64);
    stepped_ticks(min, max, step)
}

/// Tick values for a millisecond domain using the duration ladder.
#[must_use]
pub fn time_ticks(min_ms: f64, max_ms: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min_ms.is_finite() || !max_ms.is_finite() {
        return Vec::new();
    }
    if min_ms == max_ms {
        return vec![min_ms];
    }
    let (min_ms, max_ms) = (min_ms.min(max_ms), min_ms.max(max_ms));
    let raw = (max_ms - min_ms) / count as f64;
    let step = TIME_STEPS_MS
        .iter()
        .copied()
        .find(|step| *step >= raw)
        .unwrap_or_else(|| (raw / (365.0 * DAY_MS)).ceil() * 365.0 * DAY_MS);
    stepped_ticks(min_ms, max_ms, step)
}

fn stepped_ticks(min: f64, max: f64, step: f64) -> Vec<f64> {
    if !step.is_finite() || step <= 0.0 {
        return vec![min, max];
    }

    let first = (min / step).ceil();
    let last = (max / step).floor();
    if !first.is_finite() || !last.is_finite() || last < first {
        return Vec::new();
    }

    let count = ((last - first) as usize).saturating_add(1).min(MAX_TICKS);
    // Each tick is computed as an exact multiple of `step`, never accumulated.
    (0..count).map(|i| (first + i as f64) * step).collect()
}

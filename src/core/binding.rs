//! Normalization of caller records into render-ready points.
//!
//! Binding is a pure function of its input: the same records always produce
//! the same bound points and domains.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::core::primitives::{datetime_to_unix_millis, parse_date_text};
use crate::core::{BarPoint, DateInput, LineConfig, SeriesPoint, Tier};
use crate::render::Color;

/// A bar record that survived binding.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundBar {
    /// Position of the record in the caller's slice.
    pub source_index: usize,
    pub label: String,
    pub value: f64,
    pub color_override: Option<Color>,
    pub priority: Option<Tier>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarBinding {
    pub bars: Vec<BoundBar>,
    /// Upper end of the value domain: the caller override or the largest value.
    pub max_value: f64,
    pub max_value_overridden: bool,
    /// Smallest bound value (zero for empty input).
    pub min_value: f64,
}

impl BarBinding {
    /// Value domain for the linear scale, always containing zero and every
    /// negative bar.
    #[must_use]
    pub fn value_domain(&self) -> (f64, f64) {
        (self.min_value.min(0.0), self.max_value.max(0.0))
    }
}

/// Binds bar records.
///
/// Records with non-finite values or repeated labels are dropped. The value
/// domain is `max_value_override` when it is finite, else the largest bound
/// value (zero for empty input).
#[must_use]
pub fn bind_bars(records: &[BarPoint], max_value_override: Option<f64>) -> BarBinding {
    let mut seen = HashSet::with_capacity(records.len());
    let mut bars = Vec::with_capacity(records.len());

    for (source_index, record) in records.iter().enumerate() {
        if !record.value.is_finite() {
            warn!(label = %record.label, value = record.value, "dropping bar with non-finite value");
            continue;
        }
        if !seen.insert(record.label.as_str()) {
            warn!(label = %record.label, "dropping bar with duplicate label");
            continue;
        }

        let color_override = record.color_override.as_deref().and_then(|raw| {
            Color::from_hex(raw)
                .map_err(|err| {
                    warn!(label = %record.label, error = %err, "ignoring bar color override");
                })
                .ok()
        });

        bars.push(BoundBar {
            source_index,
            label: record.label.clone(),
            value: record.value,
            color_override,
            priority: record.priority,
        });
    }

    let override_value = max_value_override.filter(|value| value.is_finite());
    let extent = bars
        .iter()
        .map(|bar| bar.value)
        .fold(None, |acc: Option<(f64, f64)>, value| {
            Some(acc.map_or((value, value), |(min, max)| (min.min(value), max.max(value))))
        });
    let (min_value, largest) = extent.unwrap_or((0.0, 0.0));
    let max_value = override_value.unwrap_or(largest);

    debug!(
        original_count = records.len(),
        bound_count = bars.len(),
        min_value,
        max_value,
        "bound bar records"
    );

    BarBinding {
        bars,
        max_value,
        max_value_overridden: override_value.is_some(),
        min_value,
    }
}

/// A dated row that survived binding. `values` is aligned with the declared
/// line configs; `None` means no sample for that series at this date.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundSeriesPoint {
    pub source_index: usize,
    pub date: DateTime<Utc>,
    pub time_ms: f64,
    pub values: SmallVec<[Option<f64>; 4]>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesBinding {
    pub keys: Vec<String>,
    /// Rows in ascending date order (stable for equal dates).
    pub points: Vec<BoundSeriesPoint>,
    /// Min/max timestamp across every row, sampled or not.
    pub time_domain: Option<(f64, f64)>,
    /// Min/max across all defined samples.
    pub value_extent: Option<(f64, f64)>,
}

impl SeriesBinding {
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.time_ms).collect()
    }

    #[must_use]
    pub fn sample(&self, index: usize, series: usize) -> Option<f64> {
        self.points
            .get(index)
            .and_then(|point| point.values.get(series).copied().flatten())
    }
}

/// Binds dated multi-series rows for the declared `lines`.
///
/// String dates are coerced; rows whose date cannot be parsed are dropped.
/// A sample counts only when it is present and finite.
#[must_use]
pub fn bind_series(records: &[SeriesPoint], lines: &[LineConfig]) -> SeriesBinding {
    let keys: Vec<String> = lines.iter().map(|line| line.data_key.clone()).collect();
    let mut points = Vec::with_capacity(records.len());
    let mut dropped_samples = 0usize;

    for (source_index, record) in records.iter().enumerate() {
        let date = match &record.date {
            DateInput::Timestamp(date) => *date,
            DateInput::Text(text) => match parse_date_text(text) {
                Some(date) => date,
                None => {
                    warn!(date = %text, source_index, "dropping series row with unparseable date");
                    continue;
                }
            },
        };

        let values = keys
            .iter()
            .map(|key| {
                let value = record.values.get(key).copied().flatten();
                match value {
                    Some(value) if value.is_finite() => Some(value),
                    Some(_) => {
                        dropped_samples += 1;
                        None
                    }
                    None => None,
                }
            })
            .collect();

        points.push(BoundSeriesPoint {
            source_index,
            date,
            time_ms: datetime_to_unix_millis(date),
            values,
        });
    }

    if dropped_samples > 0 {
        warn!(dropped_samples, "ignored non-finite series samples");
    }

    points.sort_by(|left, right| left.time_ms.total_cmp(&right.time_ms));

    let time_domain = points
        .first()
        .zip(points.last())
        .map(|(first, last)| (first.time_ms, last.time_ms));

    let value_extent = points
        .iter()
        .flat_map(|point| point.values.iter().flatten().copied())
        .fold(None, |acc: Option<(f64, f64)>, value| {
            Some(acc.map_or((value, value), |(min, max)| (min.min(value), max.max(value))))
        });

    debug!(
        original_count = records.len(),
        bound_count = points.len(),
        series_count = keys.len(),
        "bound series records"
    );

    SeriesBinding {
        keys,
        points,
        time_domain,
        value_extent,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{bind_bars, bind_series};
    use crate::core::{BarPoint, LineConfig, SeriesPoint};
    use crate::render::Color;

    #[test]
    fn bars_drop_non_finite_and_duplicate_labels() {
        let records = vec![
            BarPoint::new("Rust", 40.0),
            BarPoint::new("Go", f64::NAN),
            BarPoint::new("Rust", 90.0),
            BarPoint::new("Zig", 12.0),
        ];
        let binding = bind_bars(&records, None);
        let labels: Vec<_> = binding.bars.iter().map(|bar| bar.label.as_str()).collect();
        assert_eq!(labels, ["Rust", "Zig"]);
        assert_eq!(binding.bars[1].source_index, 3);
        assert_eq!(binding.max_value, 40.0);
        assert!(!binding.max_value_overridden);
    }

    #[test]
    fn bar_max_override_wins_when_finite() {
        let records = vec![BarPoint::new("a", 10.0)];
        assert_eq!(bind_bars(&records, Some(100.0)).max_value, 100.0);
        assert_eq!(bind_bars(&records, Some(f64::INFINITY)).max_value, 10.0);
        assert_eq!(bind_bars(&[], None).max_value, 0.0);
    }

    #[test]
    fn invalid_color_override_is_ignored() {
        let records = vec![
            BarPoint::new("a", 10.0).with_color_override("#00ff00"),
            BarPoint::new("b", 10.0).with_color_override("green"),
        ];
        let binding = bind_bars(&records, None);
        assert_eq!(binding.bars[0].color_override, Some(Color::rgb(0.0, 1.0, 0.0)));
        assert_eq!(binding.bars[1].color_override, None);
    }

    #[test]
    fn series_rows_are_sorted_and_share_one_time_domain() {
        let lines = vec![
            LineConfig::new("a", Color::rgb(1.0, 0.0, 0.0)),
            LineConfig::new("b", Color::rgb(0.0, 0.0, 1.0)),
        ];
        let records = vec![
            SeriesPoint::new("2024-01-03").with_value("a", 3.0),
            SeriesPoint::new("2024-01-01").with_value("a", 1.0).with_value("b", 5.0),
            SeriesPoint::new("not a date").with_value("a", 9.0),
            SeriesPoint::new(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
                .with_value("a", f64::NAN)
                .with_missing("b"),
        ];

        let binding = bind_series(&records, &lines);
        assert_eq!(binding.len(), 3);
        assert_eq!(
            binding.points.iter().map(|p| p.source_index).collect::<Vec<_>>(),
            [1, 3, 0]
        );
        assert_eq!(binding.sample(0, 1), Some(5.0));
        assert_eq!(binding.sample(1, 0), None);
        assert_eq!(binding.sample(1, 1), None);
        assert_eq!(binding.value_extent, Some((1.0, 5.0)));

        let (start, end) = binding.time_domain.expect("domain");
        assert_eq!(end - start, 2.0 * 86_400_000.0);
    }
}

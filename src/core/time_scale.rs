use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::LinearScale;
use crate::core::primitives::{datetime_to_unix_millis, unix_millis_to_datetime};
use crate::core::ticks::time_ticks;
use crate::error::{ChartError, ChartResult};

/// Linear scale over millisecond timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    linear: LinearScale,
}

impl TimeScale {
    #[must_use]
    pub fn from_millis(start_ms: f64, end_ms: f64, range: (f64, f64)) -> Self {
        Self {
            linear: LinearScale::new((start_ms, end_ms), range),
        }
    }

    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, range: (f64, f64)) -> Self {
        Self::from_millis(
            datetime_to_unix_millis(start),
            datetime_to_unix_millis(end),
            range,
        )
    }

    /// Fits the domain to `[min(date), max(date)]`.
    pub fn from_dates<I>(dates: I, range: (f64, f64)) -> ChartResult<Self>
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for date in dates {
            let millis = datetime_to_unix_millis(date);
            min = min.min(millis);
            max = max.max(millis);
        }
        if min > max {
            return Err(ChartError::InvalidData(
                "time scale cannot be built from empty data".to_owned(),
            ));
        }
        Ok(Self::from_millis(min, max, range))
    }

    #[must_use]
    pub fn with_range(self, range: (f64, f64)) -> Self {
        Self {
            linear: self.linear.with_range(range),
        }
    }

    #[must_use]
    pub fn domain_millis(self) -> (f64, f64) {
        self.linear.domain()
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.linear.range()
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.linear.is_degenerate()
    }

    #[must_use]
    pub fn project(self, date: DateTime<Utc>) -> f64 {
        self.linear.project(datetime_to_unix_millis(date))
    }

    #[must_use]
    pub fn project_millis(self, millis: f64) -> f64 {
        self.linear.project(millis)
    }

    /// Pixel to millisecond timestamp.
    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        self.linear.invert(pixel)
    }

    #[must_use]
    pub fn invert_date(self, pixel: f64) -> Option<DateTime<Utc>> {
        unix_millis_to_datetime(self.invert(pixel))
    }

    /// Tick timestamps (milliseconds) inside the domain.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        let (start, end) = self.linear.domain();
        time_ticks(start, end, count)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::TimeScale;

    #[test]
    fn dates_map_across_range() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mid = Utc.with_ymd_and_hms(2024, 1, 6, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap();

        let scale = TimeScale::from_dates([end, start], (40.0, 540.0)).expect("time scale");
        assert_eq!(scale.project(start), 40.0);
        assert_eq!(scale.project(end), 540.0);
        assert_eq!(scale.project(mid), 290.0);
        assert_eq!(scale.invert_date(290.0), Some(mid));
    }

    #[test]
    fn empty_dates_are_rejected() {
        assert!(TimeScale::from_dates(Vec::new(), (0.0, 100.0)).is_err());
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64
}

/// Converts a millisecond timestamp back to a date, rounding to the nearest millisecond.
#[must_use]
pub fn unix_millis_to_datetime(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis.round() as i64)
}

/// Parses RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
#[must_use]
pub fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::{datetime_to_unix_millis, parse_date_text, unix_millis_to_datetime};

    #[test]
    fn plain_and_rfc3339_dates_parse() {
        let plain = parse_date_text("2024-03-01").expect("plain date");
        let full = parse_date_text("2024-03-01T00:00:00Z").expect("rfc3339");
        assert_eq!(plain, full);
        assert!(parse_date_text("March first").is_none());
    }

    #[test]
    fn millis_round_trip() {
        let date = parse_date_text("2024-06-15T12:30:00+02:00").expect("date");
        let millis = datetime_to_unix_millis(date);
        assert_eq!(unix_millis_to_datetime(millis), Some(date));
        assert!(unix_millis_to_datetime(f64::NAN).is_none());
    }
}

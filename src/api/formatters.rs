//! Caller-supplied formatting and callback strategies.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::BarPoint;

pub type ValueFormatterFn = Arc<dyn Fn(f64) -> String + Send + Sync + 'static>;
pub type CategoryFormatterFn = Arc<dyn Fn(&str) -> String + Send + Sync + 'static>;
pub type DateFormatterFn = Arc<dyn Fn(DateTime<Utc>) -> String + Send + Sync + 'static>;
pub type BarTooltipFormatterFn = Arc<dyn Fn(&BarPoint) -> String + Send + Sync + 'static>;
/// Maps `(value, series name)` to `(formatted value, displayed name)`.
pub type SeriesTooltipFormatterFn =
    Arc<dyn Fn(f64, &str) -> (String, String) + Send + Sync + 'static>;
pub type BarClickFn = Arc<dyn Fn(&BarPoint) + Send + Sync + 'static>;

/// Integers print without decimals, everything else with up to two.
#[must_use]
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    // Anything that rounds to zero prints as "0", never "-0".
    if (value * 100.0).round() == 0.0 {
        return "0".to_owned();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{value:.0}");
    }
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_owned()
}

#[must_use]
pub fn default_value_formatter() -> ValueFormatterFn {
    Arc::new(format_number)
}

#[must_use]
pub fn default_category_formatter() -> CategoryFormatterFn {
    Arc::new(|label: &str| label.to_owned())
}

#[must_use]
pub fn default_date_formatter() -> DateFormatterFn {
    Arc::new(|date: DateTime<Utc>| date.format("%b %d").to_string())
}

#[must_use]
pub fn default_bar_tooltip_formatter() -> BarTooltipFormatterFn {
    Arc::new(|point: &BarPoint| format_number(point.value))
}

#[must_use]
pub fn default_series_tooltip_formatter() -> SeriesTooltipFormatterFn {
    Arc::new(|value: f64, name: &str| (format_number(value), name.to_owned()))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{default_date_formatter, format_number};

    #[test]
    fn numbers_drop_trailing_zeros() {
        assert_eq!(format_number(68.0), "68");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(0.126), "0.13");
        assert_eq!(format_number(-3.10), "-3.1");
    }

    #[test]
    fn values_rounding_to_zero_have_no_sign() {
        assert_eq!(format_number(-0.001), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.004), "0");
        assert_eq!(format_number(-0.006), "-0.01");
    }

    #[test]
    fn dates_use_short_month_day() {
        let date = Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
        assert_eq!(default_date_formatter()(date), "Mar 07");
    }
}

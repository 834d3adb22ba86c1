//! Bucketing of 3-hour forecast entries into calendar days.

use chrono::NaiveDate;

use crate::model::{DailyForecast, ForecastEntry};

/// Number of days kept from the 5-day / 3-hour forecast.
pub const MAX_FORECAST_DAYS: usize = 5;

/// Group `entries` by the date part of their timestamp.
///
/// Days come out in the order their date is first seen in `entries`, entries
/// keep their relative order inside a day, and only the first
/// [`MAX_FORECAST_DAYS`] days are returned.
pub fn aggregate(entries: &[ForecastEntry]) -> Vec<DailyForecast> {
    let mut groups: Vec<(NaiveDate, Vec<ForecastEntry>)> = Vec::new();

    for entry in entries {
        let date = entry.timestamp.date();
        match groups.iter_mut().find(|(d, _)| *d == date) {
            Some((_, bucket)) => bucket.push(entry.clone()),
            None => groups.push((date, vec![entry.clone()])),
        }
    }

    groups
        .into_iter()
        .take(MAX_FORECAST_DAYS)
        .filter_map(|(date, bucket)| DailyForecast::from_entries(date, bucket))
        .collect()
}

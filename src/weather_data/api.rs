//! Wire model for the Open-Meteo historical archive endpoint.
//!
//! Requests ask for the daily variables in a fixed order and for a
//! unix-timestamp time axis, so the decoded response can be turned into a
//! [`RawDailySeries`] with explicit start/end/interval metadata.

use crate::weather_data::error::WeatherDataError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Daily variables requested for every city, in fixed order.
pub const DAILY_VARIABLES: [&str; 3] = [
    "precipitation_sum",
    "temperature_2m_mean",
    "wind_speed_10m_max",
];

pub const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Deserialize)]
pub struct ArchiveResponse {
    pub daily: DailyBlock,
}

/// The `daily` block of an archive response: one unix timestamp per day
/// plus one value array per requested variable, all the same length.
#[derive(Debug, Deserialize)]
pub struct DailyBlock {
    pub time: Vec<i64>,
    pub precipitation_sum: Vec<f64>,
    pub temperature_2m_mean: Vec<f64>,
    pub wind_speed_10m_max: Vec<f64>,
}

/// One fetched daily series: time metadata plus the raw value arrays.
///
/// `end` is exclusive; the series covers `(end - start) / interval_seconds`
/// whole intervals starting at `start`.
#[derive(Debug, Clone)]
pub struct RawDailySeries {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub interval_seconds: i64,
    pub precipitation_sum: Vec<f64>,
    pub temperature_2m_mean: Vec<f64>,
    pub wind_speed_10m_max: Vec<f64>,
}

impl ArchiveResponse {
    /// Converts the decoded response into a [`RawDailySeries`].
    ///
    /// The time axis carries one timestamp per day rather than explicit
    /// interval metadata; the interval is the gap between the first two
    /// entries (a single-entry axis assumes one day) and `end` is the last
    /// timestamp plus one interval.
    pub fn into_daily_series(self) -> Result<RawDailySeries, WeatherDataError> {
        let DailyBlock {
            time,
            precipitation_sum,
            temperature_2m_mean,
            wind_speed_10m_max,
        } = self.daily;

        let (first, last) = match (time.first(), time.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return Err(WeatherDataError::EmptySeries),
        };
        let interval_seconds = match time.get(1) {
            Some(&second) => second - first,
            None => SECONDS_PER_DAY,
        };

        let start = DateTime::from_timestamp(first, 0)
            .ok_or(WeatherDataError::InvalidTimestamp(first))?;
        let end_secs = last + interval_seconds;
        let end = DateTime::from_timestamp(end_secs, 0)
            .ok_or(WeatherDataError::InvalidTimestamp(end_secs))?;

        Ok(RawDailySeries {
            start,
            end,
            interval_seconds,
            precipitation_sum,
            temperature_2m_mean,
            wind_speed_10m_max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(time: Vec<i64>) -> ArchiveResponse {
        let len = time.len();
        ArchiveResponse {
            daily: DailyBlock {
                time,
                precipitation_sum: vec![0.0; len],
                temperature_2m_mean: vec![0.0; len],
                wind_speed_10m_max: vec![0.0; len],
            },
        }
    }

    #[test]
    fn derives_interval_and_end_from_time_axis() {
        // 2010-01-01, 2010-01-02, 2010-01-03 (UTC)
        let series = response(vec![1_262_304_000, 1_262_390_400, 1_262_476_800])
            .into_daily_series()
            .unwrap();
        assert_eq!(series.interval_seconds, SECONDS_PER_DAY);
        assert_eq!(series.start.timestamp(), 1_262_304_000);
        assert_eq!(series.end.timestamp(), 1_262_476_800 + SECONDS_PER_DAY);
    }

    #[test]
    fn single_entry_axis_assumes_one_day() {
        let series = response(vec![1_262_304_000]).into_daily_series().unwrap();
        assert_eq!(series.interval_seconds, SECONDS_PER_DAY);
        assert_eq!(series.end.timestamp(), 1_262_304_000 + SECONDS_PER_DAY);
    }

    #[test]
    fn empty_axis_is_an_error() {
        let err = response(vec![]).into_daily_series().unwrap_err();
        assert!(matches!(err, WeatherDataError::EmptySeries));
    }
}

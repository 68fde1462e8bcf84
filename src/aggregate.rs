//! Reshapes a fetched daily series into a date-indexed table and resamples
//! it to monthly buckets: precipitation is summed, temperature and wind are
//! averaged. Both steps are pure and independent of the network layer.

use crate::weather_data::api::RawDailySeries;
use chrono::NaiveDate;
use polars::error::PolarsError;
use polars::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("Series interval must be a positive number of seconds, got {seconds}")]
    BadInterval { seconds: i64 },

    #[error("Daily array '{variable}' has {found} values but the date index has {expected}")]
    LengthMismatch {
        variable: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("No calendar month for year {year}, month {month}")]
    BadMonth { year: i32, month: u32 },

    #[error("Unexpected null in aggregated column '{column}'")]
    NullValue { column: &'static str },

    #[error("Failed processing DataFrame: {0}")]
    DataFrame(#[from] PolarsError),
}

/// One aggregated month, stamped with the month's last calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRow {
    pub date: NaiveDate,
    pub precipitation_sum: f64,
    pub temperature_2m_mean: f64,
    pub wind_speed_10m_max: f64,
}

pub type MonthlyTable = Vec<MonthlyRow>;

/// Builds the date-indexed daily table from a raw series.
///
/// The calendar-day index starts at the series start instant (UTC) and
/// steps by the reported interval, left-inclusive, one entry per whole
/// interval in `[start, end)`. Every value array must match the index
/// length exactly; a mismatch fails rather than truncating or padding.
pub fn daily_frame(series: &RawDailySeries) -> Result<DataFrame, AggregateError> {
    if series.interval_seconds <= 0 {
        return Err(AggregateError::BadInterval {
            seconds: series.interval_seconds,
        });
    }

    let span = (series.end - series.start).num_seconds();
    let rows = span.div_euclid(series.interval_seconds).max(0) as usize;

    let mut dates = Vec::with_capacity(rows);
    for i in 0..rows as i64 {
        let instant = series.start + chrono::Duration::seconds(i * series.interval_seconds);
        dates.push(instant.date_naive());
    }

    for (variable, values) in [
        ("precipitation_sum", &series.precipitation_sum),
        ("temperature_2m_mean", &series.temperature_2m_mean),
        ("wind_speed_10m_max", &series.wind_speed_10m_max),
    ] {
        if values.len() != rows {
            return Err(AggregateError::LengthMismatch {
                variable,
                expected: rows,
                found: values.len(),
            });
        }
    }

    let df = df!(
        "date" => dates,
        "precipitation_sum" => &series.precipitation_sum,
        "temperature_2m_mean" => &series.temperature_2m_mean,
        "wind_speed_10m_max" => &series.wind_speed_10m_max,
    )?;
    Ok(df)
}

/// Resamples a daily table to one row per calendar month, month-ascending.
///
/// Sum for precipitation, arithmetic mean for temperature and wind; each
/// output row is dated with its month's last calendar day.
pub fn monthly_table(daily: DataFrame) -> Result<MonthlyTable, AggregateError> {
    let grouped = daily
        .lazy()
        .group_by([
            col("date").dt().year().cast(DataType::Int32).alias("year"),
            col("date").dt().month().cast(DataType::UInt32).alias("month"),
        ])
        .agg([
            col("precipitation_sum").sum(),
            col("temperature_2m_mean").mean(),
            col("wind_speed_10m_max").mean(),
        ])
        .sort(["year", "month"], SortMultipleOptions::default())
        .collect()?;

    let years = grouped.column("year")?.i32()?;
    let months = grouped.column("month")?.u32()?;
    let precipitation = grouped.column("precipitation_sum")?.f64()?;
    let temperature = grouped.column("temperature_2m_mean")?.f64()?;
    let wind = grouped.column("wind_speed_10m_max")?.f64()?;

    let mut rows = Vec::with_capacity(grouped.height());
    for idx in 0..grouped.height() {
        let year = years
            .get(idx)
            .ok_or(AggregateError::NullValue { column: "year" })?;
        let month = months
            .get(idx)
            .ok_or(AggregateError::NullValue { column: "month" })?;
        rows.push(MonthlyRow {
            date: month_end(year, month).ok_or(AggregateError::BadMonth { year, month })?,
            precipitation_sum: precipitation
                .get(idx)
                .ok_or(AggregateError::NullValue {
                    column: "precipitation_sum",
                })?,
            temperature_2m_mean: temperature
                .get(idx)
                .ok_or(AggregateError::NullValue {
                    column: "temperature_2m_mean",
                })?,
            wind_speed_10m_max: wind
                .get(idx)
                .ok_or(AggregateError::NullValue {
                    column: "wind_speed_10m_max",
                })?,
        });
    }
    Ok(rows)
}

/// Last calendar day of the given month.
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|d| d.pred_opt())
}

//! The pipeline driver: fetch and aggregate each configured city in turn,
//! then render one comparison chart from the collected monthly tables.
//! Any per-city failure aborts the whole run; there is no partial chart.

use crate::aggregate::{daily_frame, monthly_table, MonthlyTable};
use crate::chart;
use crate::error::CompareError;
use crate::registry;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use crate::weather_data::fetcher::ArchiveFetcher;
use chrono::NaiveDate;
use log::info;
use std::path::PathBuf;

pub const OUTPUT_FILE: &str = "weather_comparison.png";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub cities: Vec<String>,
    /// First day of the historical window (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the historical window (inclusive).
    pub end_date: NaiveDate,
    pub output_path: PathBuf,
    pub show_chart: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cities: registry::DEFAULT_CITIES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            start_date: NaiveDate::from_ymd_opt(2010, 1, 1).expect("valid calendar date"),
            end_date: NaiveDate::from_ymd_opt(2019, 12, 31).expect("valid calendar date"),
            output_path: PathBuf::from(OUTPUT_FILE),
            show_chart: true,
        }
    }
}

/// Client owning the fetcher and its response cache.
pub struct WeatherCompare {
    fetcher: ArchiveFetcher,
}

impl WeatherCompare {
    /// Creates a client using the default per-user cache directory.
    pub async fn new() -> Result<Self, CompareError> {
        let cache_folder = get_cache_dir().map_err(CompareError::CacheDirResolution)?;
        Self::with_cache_folder(cache_folder).await
    }

    /// Creates a client caching responses under `cache_folder`, creating
    /// the directory if needed.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, CompareError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| CompareError::CacheDirCreation(cache_folder.clone(), e))?;
        Ok(Self {
            fetcher: ArchiveFetcher::new(&cache_folder),
        })
    }

    /// Runs the full pipeline and returns the path of the rendered chart.
    pub async fn run(&self, config: &PipelineConfig) -> Result<PathBuf, CompareError> {
        let mut tables: Vec<MonthlyTable> = Vec::with_capacity(config.cities.len());

        for city in &config.cities {
            let location = registry::coordinates(city)?;
            info!(
                "Fetching daily weather for {} ({}, {})",
                city, location.0, location.1
            );
            let series = self
                .fetcher
                .daily_series()
                .location(location)
                .start_date(config.start_date)
                .end_date(config.end_date)
                .call()
                .await?;
            let daily = daily_frame(&series)?;
            let monthly = monthly_table(daily)?;
            info!("{}: aggregated {} monthly rows", city, monthly.len());
            tables.push(monthly);
        }

        let cities: Vec<&str> = config.cities.iter().map(String::as_str).collect();
        chart::render_comparison(&tables, &cities, &config.output_path)?;
        if config.show_chart {
            chart::show(&config.output_path);
        }
        Ok(config.output_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_the_fixed_three_city_decade() {
        let config = PipelineConfig::default();
        assert_eq!(config.cities, ["Madrid", "London", "Rio"]);
        assert_eq!(
            config.start_date,
            NaiveDate::from_ymd_opt(2010, 1, 1).unwrap()
        );
        assert_eq!(
            config.end_date,
            NaiveDate::from_ymd_opt(2019, 12, 31).unwrap()
        );
        assert_eq!(config.output_path, PathBuf::from("weather_comparison.png"));
    }

    #[tokio::test]
    async fn unknown_city_aborts_before_any_fetch() {
        let cache = tempfile::tempdir().unwrap();
        let client = WeatherCompare::with_cache_folder(cache.path().to_path_buf())
            .await
            .unwrap();
        let config = PipelineConfig {
            cities: vec!["Atlantis".to_string()],
            ..PipelineConfig::default()
        };

        let err = client.run(&config).await.unwrap_err();
        assert!(matches!(err, CompareError::UnknownCity(name) if name == "Atlantis"));
    }
}

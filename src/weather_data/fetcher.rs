//! Fetches daily archive series through a directory-backed response cache.
//!
//! The first request for a given coordinates/date-range pair hits the
//! network (with retry on transient failure) and persists the raw JSON
//! body; later requests are served from the cache indefinitely.

use crate::registry::LatLon;
use crate::weather_data::api::{ArchiveResponse, RawDailySeries, ARCHIVE_URL, DAILY_VARIABLES};
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::retry::{with_retry, RetryConfig};
use bon::bon;
use chrono::NaiveDate;
use log::{error, info, warn};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct ArchiveFetcher {
    cache_dir: PathBuf,
    client: Client,
    endpoint: String,
    retry: RetryConfig,
}

#[bon]
impl ArchiveFetcher {
    pub fn new(cache_dir: &Path) -> Self {
        Self::with_endpoint(cache_dir, ARCHIVE_URL)
    }

    /// Points the fetcher at a non-default archive endpoint.
    pub fn with_endpoint(cache_dir: &Path, endpoint: impl Into<String>) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
            client: Client::new(),
            endpoint: endpoint.into(),
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Fetches the daily series for one location and date range (inclusive).
    ///
    /// Builder-style:
    /// `fetcher.daily_series().location(..).start_date(..).end_date(..).call().await`.
    #[builder]
    pub async fn daily_series(
        &self,
        location: LatLon,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RawDailySeries, WeatherDataError> {
        let cache_path = self
            .cache_dir
            .join(cache_file_name(location, start_date, end_date));

        let body = if fs::metadata(&cache_path).await.is_ok() {
            info!(
                "Cache hit for ({}, {}) {}..{} at {:?}",
                location.0, location.1, start_date, end_date, cache_path
            );
            fs::read_to_string(&cache_path)
                .await
                .map_err(|e| WeatherDataError::CacheRead(cache_path.clone(), e))?
        } else {
            warn!(
                "Cache miss for ({}, {}) {}..{}. Downloading.",
                location.0, location.1, start_date, end_date
            );
            let body = self.download(location, start_date, end_date).await?;

            fs::create_dir_all(&self.cache_dir)
                .await
                .map_err(|e| WeatherDataError::CacheDirCreation(self.cache_dir.clone(), e))?;
            fs::write(&cache_path, &body)
                .await
                .map_err(|e| WeatherDataError::CacheWrite(cache_path.clone(), e))?;
            info!("Cached archive response to {:?}", cache_path);
            body
        };

        let response: ArchiveResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                "Malformed archive response for ({}, {}): {}",
                location.0, location.1, e
            );
            WeatherDataError::Decode(self.endpoint.clone(), e)
        })?;
        response.into_daily_series()
    }

    async fn download(
        &self,
        location: LatLon,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<String, WeatherDataError> {
        let params = [
            ("latitude", location.0.to_string()),
            ("longitude", location.1.to_string()),
            ("start_date", start_date.to_string()),
            ("end_date", end_date.to_string()),
            ("daily", DAILY_VARIABLES.join(",")),
            ("timeformat", "unixtime".to_string()),
            ("timezone", "UTC".to_string()),
        ];
        info!("Downloading daily archive from {}", self.endpoint);

        let response = with_retry(&self.retry, || async {
            self.client.get(&self.endpoint).query(&params).send().await
        })
        .await
        .map_err(|e| {
            error!("Archive request failed for {}: {}", self.endpoint, e);
            WeatherDataError::NetworkRequest(self.endpoint.clone(), e)
        })?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                error!("HTTP error for {}: {}", self.endpoint, e);
                return Err(if let Some(status) = e.status() {
                    WeatherDataError::HttpStatus {
                        url: self.endpoint.clone(),
                        status,
                        source: e,
                    }
                } else {
                    WeatherDataError::NetworkRequest(self.endpoint.clone(), e)
                });
            }
        };

        response
            .text()
            .await
            .map_err(|e| WeatherDataError::BodyRead(self.endpoint.clone(), e))
    }
}

fn cache_file_name(location: LatLon, start_date: NaiveDate, end_date: NaiveDate) -> String {
    format!(
        "archive-{:.6}_{:.6}-{}-{}.json",
        location.0, location.1, start_date, end_date
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_body() -> serde_json::Value {
        serde_json::json!({
            "daily": {
                "time": [1_262_304_000i64, 1_262_390_400i64, 1_262_476_800i64],
                "precipitation_sum": [1.0, 2.0, 3.0],
                "temperature_2m_mean": [10.0, 11.0, 12.0],
                "wind_speed_10m_max": [20.0, 21.0, 22.0]
            }
        })
    }

    fn window() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2010, 1, 3).unwrap(),
        )
    }

    #[tokio::test]
    async fn fetches_and_decodes_daily_series() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("timeformat", "unixtime"))
            .and(query_param(
                "daily",
                "precipitation_sum,temperature_2m_mean,wind_speed_10m_max",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .expect(1)
            .mount(&server)
            .await;

        let cache = tempfile::tempdir().unwrap();
        let fetcher = ArchiveFetcher::with_endpoint(cache.path(), server.uri());
        let (start, end) = window();

        let series = fetcher
            .daily_series()
            .location(LatLon(40.0, -3.0))
            .start_date(start)
            .end_date(end)
            .call()
            .await
            .unwrap();

        assert_eq!(series.interval_seconds, 86_400);
        assert_eq!(series.precipitation_sum, vec![1.0, 2.0, 3.0]);
        assert_eq!(series.temperature_2m_mean, vec![10.0, 11.0, 12.0]);
        assert_eq!(series.wind_speed_10m_max, vec![20.0, 21.0, 22.0]);
        assert_eq!(series.start.timestamp(), 1_262_304_000);
        assert_eq!(series.end.timestamp(), 1_262_304_000 + 3 * 86_400);
    }

    #[tokio::test]
    async fn second_call_is_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .expect(1)
            .mount(&server)
            .await;

        let cache = tempfile::tempdir().unwrap();
        let fetcher = ArchiveFetcher::with_endpoint(cache.path(), server.uri());
        let (start, end) = window();

        for _ in 0..2 {
            let series = fetcher
                .daily_series()
                .location(LatLon(40.0, -3.0))
                .start_date(start)
                .end_date(end)
                .call()
                .await
                .unwrap();
            assert_eq!(series.precipitation_sum, vec![1.0, 2.0, 3.0]);
        }
        // expect(1) is verified when the server drops
    }

    #[tokio::test]
    async fn exhausted_retries_surface_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(5)
            .mount(&server)
            .await;

        let cache = tempfile::tempdir().unwrap();
        let fetcher = ArchiveFetcher::with_endpoint(cache.path(), server.uri())
            .with_retry_config(RetryConfig::new(5, 1, 10));
        let (start, end) = window();

        let err = fetcher
            .daily_series()
            .location(LatLon(40.0, -3.0))
            .start_date(start)
            .end_date(end)
            .call()
            .await
            .unwrap_err();

        match err {
            WeatherDataError::HttpStatus { status, .. } => assert_eq!(status.as_u16(), 500),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"daily\": 12}"))
            .mount(&server)
            .await;

        let cache = tempfile::tempdir().unwrap();
        let fetcher = ArchiveFetcher::with_endpoint(cache.path(), server.uri());
        let (start, end) = window();

        let err = fetcher
            .daily_series()
            .location(LatLon(40.0, -3.0))
            .start_date(start)
            .end_date(end)
            .call()
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherDataError::Decode(_, _)));
    }
}

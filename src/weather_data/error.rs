use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherDataError {
    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read cached response '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cached response '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body for {0}")]
    BodyRead(String, #[source] reqwest::Error),

    #[error("Failed to decode archive response from {0}")]
    Decode(String, #[source] serde_json::Error),

    #[error("Archive response contains an empty daily time axis")]
    EmptySeries,

    #[error("Archive response contains an out-of-range timestamp: {0}")]
    InvalidTimestamp(i64),
}

//! Fetches historical daily weather for a fixed set of cities from the
//! Open-Meteo archive, aggregates the daily series into monthly summaries,
//! and renders a three-panel comparison chart.
//!
//! The pipeline is strictly linear: registry lookup, fetch (through a
//! directory-backed response cache with retry on transient failure),
//! monthly aggregation, chart rendering.

mod aggregate;
mod chart;
mod error;
mod pipeline;
mod registry;
mod utils;
mod weather_data;

pub use error::CompareError;
pub use pipeline::{PipelineConfig, WeatherCompare, OUTPUT_FILE};

pub use aggregate::{daily_frame, month_end, monthly_table, AggregateError, MonthlyRow, MonthlyTable};
pub use chart::{render_comparison, show, ChartError};
pub use registry::{coordinates, LatLon, DEFAULT_CITIES};

pub use weather_data::api::{ArchiveResponse, DailyBlock, RawDailySeries, DAILY_VARIABLES};
pub use weather_data::error::WeatherDataError;
pub use weather_data::fetcher::ArchiveFetcher;
pub use weather_data::retry::RetryConfig;

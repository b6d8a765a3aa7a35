pub mod http;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use http::HttpHistoryProvider;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("history endpoint returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to decode history response: {0}")]
    Decode(String),
}

/// One query against the historical-data service.
#[derive(Debug, Clone)]
pub struct HistoryQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// Sub-sampling resolution in seconds.
    pub resolution_seconds: u32,
    /// Data path to fetch, e.g. `navigation.position`.
    pub path: String,
    pub aggregate: String,
}

/// One time-ordered row from the historical-data service. `position`
/// is `[longitude, latitude]`, or None where the service had no value.
#[derive(Debug, Clone, Copy)]
pub struct PositionRow {
    pub timestamp: DateTime<Utc>,
    pub position: Option<[f64; 2]>,
}

/// Boundary to the historical-data service. Trait object so the
/// pipeline can run against a test double.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn query(&self, query: &HistoryQuery) -> Result<Vec<PositionRow>, HistoryError>;
}

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::archive::{ArchiveBuilder, ArchiveError, ArchiveResult};
use crate::convert::TileConverter;
use crate::history::HistoryProvider;
use crate::track::{assemble, segment_range, QuerySpec, Resolution};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("unknown resolution '{0}'")]
    UnknownResolution(String),

    #[error("start date must be before end date")]
    EmptyRange,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("history service is not available")]
    HistoryUnavailable,

    #[error("archive build failed: {0}")]
    Archive(#[from] ArchiveError),
}

/// Inbound track-generation request, exactly as received. All fields
/// optional so validation can report which one is missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrackRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub resolution: Option<String>,
}

/// A validated track-generation request.
#[derive(Debug, Clone, Copy)]
pub struct TrackRequest {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub resolution: Resolution,
}

impl TrackRequest {
    /// Validate an inbound request: all fields present, parseable
    /// RFC3339 dates, known resolution, start before end.
    pub fn parse(raw: &RawTrackRequest) -> Result<Self, ValidationError> {
        let start_str = raw
            .start_date
            .as_deref()
            .ok_or(ValidationError::MissingField("startDate"))?;
        let end_str = raw
            .end_date
            .as_deref()
            .ok_or(ValidationError::MissingField("endDate"))?;
        let resolution_str = raw
            .resolution
            .as_deref()
            .ok_or(ValidationError::MissingField("resolution"))?;

        let start = parse_date(start_str)?;
        let end = parse_date(end_str)?;
        let resolution = Resolution::parse(resolution_str)
            .ok_or_else(|| ValidationError::UnknownResolution(resolution_str.to_string()))?;

        if start >= end {
            return Err(ValidationError::EmptyRange);
        }

        Ok(Self {
            start,
            end,
            resolution,
        })
    }
}

fn parse_date(s: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

/// Everything a track-generation run needs besides the request itself.
pub struct TrackPipeline<'a> {
    pub provider: Option<&'a dyn HistoryProvider>,
    pub converter: &'a dyn TileConverter,
    pub chart_dir: &'a Path,
    pub query_spec: &'a QuerySpec,
    pub max_zoom: u8,
}

impl TrackPipeline<'_> {
    /// Run segmentation, per-window sampling, and the archive build
    /// for one validated request. Fails fast when the history service
    /// is absent; per-window query failures and conversion failures
    /// are recovered downstream and still yield a result.
    pub async fn run(&self, request: &TrackRequest) -> Result<ArchiveResult, PipelineError> {
        let provider = self.provider.ok_or(PipelineError::HistoryUnavailable)?;

        let windows = segment_range(request.start, request.end, request.resolution);
        debug!(windows = windows.len(), "Segmented request range");

        let collection = assemble(provider, &windows, request.resolution, self.query_spec).await;

        let builder = ArchiveBuilder::new(self.chart_dir, self.converter, self.max_zoom);
        let result = builder
            .build(
                &collection,
                &request.start.to_rfc3339(),
                &request.end.to_rfc3339(),
            )
            .await?;

        info!(
            filename = %result.filename,
            features = result.feature_count,
            "Track generation complete"
        );

        Ok(result)
    }
}

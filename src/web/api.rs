use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::convert::TileConverter;
use crate::history::HistoryProvider;
use crate::pipeline::{PipelineError, RawTrackRequest, TrackPipeline, TrackRequest};
use crate::registry::ChartRegistry;
use crate::track::QuerySpec;

/// Shared state for the web API.
pub struct AppState {
    pub chart_dir: PathBuf,
    pub registry: Arc<ChartRegistry>,
    pub provider: Option<Arc<dyn HistoryProvider>>,
    pub converter: Arc<dyn TileConverter>,
    pub query_spec: QuerySpec,
    pub max_zoom: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackResponse {
    pub success: bool,
    pub filename: String,
    pub features: usize,
    pub start_date: String,
    pub end_date: String,
    pub resolution: String,
}

#[derive(Debug, Serialize)]
pub struct RescanResponse {
    pub count: usize,
}

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// GET /charts
pub async fn list_charts(State(state): State<Arc<AppState>>) -> Json<Vec<crate::registry::ChartEntry>> {
    let snapshot = state.registry.snapshot().await;
    Json(snapshot.as_ref().clone())
}

/// POST /charts/rescan
pub async fn rescan_charts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RescanResponse>, ApiError> {
    let count = state
        .registry
        .rescan()
        .await
        .map_err(|e| ApiError::InternalError(e.to_string()))?;
    Ok(Json(RescanResponse { count }))
}

/// POST /tracks
pub async fn generate_track(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<RawTrackRequest>,
) -> Result<Json<TrackResponse>, ApiError> {
    let request = TrackRequest::parse(&raw).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let pipeline = TrackPipeline {
        provider: state.provider.as_deref(),
        converter: state.converter.as_ref(),
        chart_dir: &state.chart_dir,
        query_spec: &state.query_spec,
        max_zoom: state.max_zoom,
    };

    let result = pipeline.run(&request).await.map_err(|e| match e {
        PipelineError::Validation(e) => ApiError::BadRequest(e.to_string()),
        PipelineError::HistoryUnavailable => {
            ApiError::ServiceUnavailable("history service is not available".to_string())
        }
        PipelineError::Archive(e) => {
            error!(error = %e, "Track generation failed");
            ApiError::InternalError(e.to_string())
        }
    })?;

    // Make the new archive discoverable without waiting for the next
    // scheduled scan.
    if let Err(e) = state.registry.rescan().await {
        warn!(error = %e, "Chart rescan after track generation failed");
    }

    Ok(Json(TrackResponse {
        success: true,
        filename: result.filename,
        features: result.feature_count,
        start_date: request.start.to_rfc3339(),
        end_date: request.end.to_rfc3339(),
        resolution: request.resolution.label().to_string(),
    }))
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    ServiceUnavailable(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

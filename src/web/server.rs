use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::api::{generate_track, health_check, list_charts, rescan_charts, AppState};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/charts", get(list_charts))
        .route("/charts/rescan", post(rescan_charts))
        .route("/tracks", post(generate_track))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listen address and serve until the process exits.
pub async fn run_server(state: Arc<AppState>, listen: &str) -> Result<(), std::io::Error> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(listen).await?;
    info!(listen, "Web server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

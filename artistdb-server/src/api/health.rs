//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    /// Artists currently served
    pub artists: i64,
    /// End of the last successful parse pass
    pub last_reload: Option<DateTime<Utc>>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let artists = state.store.count_artists().await?;
    let last_reload = state.reloader.last_status().await.map(|s| s.finished_at);

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        module: "artistdb-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        artists,
        last_reload,
    }))
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

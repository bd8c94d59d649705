//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub backend: BackendHealthResponse,
}

#[derive(Debug, Serialize)]
pub struct BackendHealthResponse {
    pub kind: String,
    pub base_url: String,
    pub templates_cached: usize,
}

/// GET /health
///
/// Liveness only: the backend is not called, the cache size shows whether
/// the last refresh succeeded.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        backend: BackendHealthResponse {
            kind: state.backend.kind().to_string(),
            base_url: state.settings.backend.base_url.clone(),
            templates_cached: state.template_store.count(),
        },
    })
}

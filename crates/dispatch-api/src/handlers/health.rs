//! Health check handler.

use axum::Json;
use axum::extract::State;

use dispatch_core::traits::CacheProvider;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let cache = match &state.cache {
        None => "disabled",
        Some(cache) => match cache.health_check().await {
            Ok(true) => "connected",
            Ok(false) | Err(_) => "unreachable",
        },
    };

    let status = if cache == "unreachable" { "degraded" } else { "ok" };

    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: cache.to_string(),
        realtime_connections: state.gateway.registry().len(),
    }))
}

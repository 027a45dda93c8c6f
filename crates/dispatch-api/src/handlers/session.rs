//! Session handlers for the authenticated caller.

use axum::Json;
use axum::extract::State;
use tracing::info;

use dispatch_realtime::gateway::REASON_REVOKED;

use crate::dto::response::{ApiResponse, RevokeResponse, SessionResponse};
use crate::error::ApiError;
use crate::extractors::BearerClaims;
use crate::state::AppState;

/// GET /api/session
pub async fn current_session(claims: BearerClaims) -> Json<ApiResponse<SessionResponse>> {
    Json(ApiResponse::ok(SessionResponse::from(claims.0)))
}

/// POST /api/session/revoke
///
/// Rotates the caller's signing secret, which invalidates every token they
/// hold, and closes their realtime connection.
pub async fn revoke_session(
    State(state): State<AppState>,
    claims: BearerClaims,
) -> Result<Json<ApiResponse<RevokeResponse>>, ApiError> {
    let actor = claims.actor_key();
    state.authority.revoke_all(actor.id()).await?;

    let realtime_closed = state.gateway.evict(&actor, REASON_REVOKED);

    info!(actor = %actor, realtime_closed, "Sessions revoked");

    Ok(Json(ApiResponse::ok(RevokeResponse { realtime_closed })))
}

//! Route definitions for the Dispatch HTTP API.
//!
//! Session routes are mounted under `/api`; the realtime upgrade lives at
//! `/socket`.

use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

/// Build the router with all routes, threading `AppState` through them.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/session", get(handlers::session::current_session))
        .route("/session/revoke", post(handlers::session::revoke_session));

    Router::new()
        .nest("/api", api_routes)
        .route("/socket", get(handlers::ws::ws_upgrade))
        .with_state(state)
}

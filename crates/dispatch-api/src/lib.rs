//! # dispatch-api
//!
//! HTTP API layer for Dispatch built on Axum.
//!
//! Provides the session endpoints, the `BearerClaims` extractor, the
//! realtime WebSocket upgrade, and error mapping to HTTP statuses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;

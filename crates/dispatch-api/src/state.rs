//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Duration;

use dispatch_auth::TokenAuthority;
use dispatch_cache::CacheManager;
use dispatch_core::config::AppConfig;
use dispatch_realtime::RealtimeGateway;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// TTL cache, absent when caching is disabled
    pub cache: Option<Arc<CacheManager>>,
    /// Token issuance and verification
    pub authority: Arc<TokenAuthority>,
    /// Realtime connection gateway
    pub gateway: Arc<RealtimeGateway>,
}

impl AppState {
    /// Upper bound on token verification, including secret resolution.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.server.request_timeout_seconds)
    }
}

//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dispatch_auth::Claims;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: `ok` or `degraded`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Cache status: `connected`, `unreachable` or `disabled`.
    pub cache: String,
    /// Number of actors with a live realtime connection.
    pub realtime_connections: usize,
}

/// The caller's verified session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Actor id (token subject).
    pub actor_id: String,
    /// Role the token was issued for.
    pub role: String,
    /// Token id.
    pub token_id: String,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// Full claim set.
    pub claims: Claims,
}

impl From<Claims> for SessionResponse {
    fn from(claims: Claims) -> Self {
        Self {
            actor_id: claims.sub.clone(),
            role: claims.role.to_string(),
            token_id: claims.jti.to_string(),
            issued_at: DateTime::from_timestamp(claims.iat, 0).unwrap_or(DateTime::<Utc>::MIN_UTC),
            expires_at: claims.expires_at(),
            claims,
        }
    }
}

/// Result of revoking the caller's sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeResponse {
    /// Whether a live realtime connection was closed.
    pub realtime_closed: bool,
}

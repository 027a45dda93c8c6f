//! WebSocket authentication: validates the role and access token presented
//! in the connect query.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use dispatch_auth::error::{AuthError, TokenErrorKind};
use dispatch_auth::jwt::{Claims, TokenAuthority};
use dispatch_core::error::AppError;
use dispatch_core::types::{ActorKey, ActorRole};

use crate::message::types::{CODE_INTERNAL, CODE_UNAUTHORIZED, SocketResponse};

/// Actor identity extracted from a verified connect request.
#[derive(Debug, Clone)]
pub struct AuthenticatedActor {
    /// Registry key for the connection.
    pub key: ActorKey,
    /// Verified token claims.
    pub claims: Claims,
}

/// Why a connect request was refused.
#[derive(Debug, Error)]
pub enum ConnectRejection {
    /// The `role` parameter is not a known actor role, or is not the role
    /// the token was issued for.
    #[error("invalid role")]
    InvalidRole,
    /// The access token was rejected.
    #[error(transparent)]
    Token(TokenErrorKind),
    /// The signing secret could not be resolved.
    #[error("{0}")]
    Unavailable(AppError),
    /// Verification did not complete in time.
    #[error("token verification timed out")]
    Timeout,
}

impl ConnectRejection {
    /// The reply sent to the client for this rejection.
    pub fn response(&self) -> SocketResponse {
        let code = match self {
            Self::InvalidRole | Self::Token(_) => CODE_UNAUTHORIZED,
            Self::Unavailable(_) | Self::Timeout => CODE_INTERNAL,
        };
        SocketResponse::error_with_code(code, self.to_string())
    }
}

impl From<AuthError> for ConnectRejection {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Token(kind) => Self::Token(kind),
            AuthError::Secret(e) => Self::Unavailable(e),
        }
    }
}

/// Authenticates realtime connections against the token authority.
#[derive(Debug, Clone)]
pub struct WsAuthenticator {
    authority: Arc<TokenAuthority>,
    timeout: Duration,
}

impl WsAuthenticator {
    /// Creates a new WebSocket authenticator.
    pub fn new(authority: Arc<TokenAuthority>, timeout: Duration) -> Self {
        Self { authority, timeout }
    }

    /// Parses the role and verifies the token.
    ///
    /// The requested role must be the one bound into the token, so a token
    /// only ever admits the actor it was issued to.
    pub async fn authenticate(
        &self,
        access_token: &str,
        role: &str,
    ) -> Result<AuthenticatedActor, ConnectRejection> {
        let role: ActorRole = role.parse().map_err(|_| ConnectRejection::InvalidRole)?;

        let claims = tokio::time::timeout(self.timeout, self.authority.verify(access_token))
            .await
            .map_err(|_| ConnectRejection::Timeout)??;

        if claims.role != role {
            return Err(ConnectRejection::InvalidRole);
        }

        Ok(AuthenticatedActor {
            key: claims.actor_key(),
            claims,
        })
    }
}

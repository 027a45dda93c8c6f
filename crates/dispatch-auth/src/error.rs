//! Verification failures: the closed token taxonomy plus secret-resolution errors.

use thiserror::Error;

use dispatch_core::error::AppError;

/// Why a presented token was rejected.
///
/// Every kind is terminal for the token: the caller must re-authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum TokenErrorKind {
    /// The token is not a well-formed `header.payload.signature` string.
    #[error("token format error")]
    MalformedToken,
    /// The token is past its expiry, or not valid yet.
    #[error("expired token")]
    ExpiredToken,
    /// The signature does not match the actor's current secret.
    #[error("token invalid signature error")]
    InvalidSignature,
    /// The payload decoded but does not have the expected claim shape.
    #[error("token claims error")]
    ClaimsTypeError,
    /// Any other rejection.
    #[error("unknown token error")]
    UnknownTokenError,
}

/// Error returned by token verification.
///
/// Secret-resolution failures are infrastructure errors and may be retried;
/// they are kept apart from the token taxonomy.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token itself is invalid.
    #[error(transparent)]
    Token(#[from] TokenErrorKind),
    /// The signing secret could not be resolved (cache or credential store).
    #[error(transparent)]
    Secret(#[from] AppError),
}

impl AuthError {
    /// The token rejection kind, if this is a token-validity failure.
    pub fn token_kind(&self) -> Option<TokenErrorKind> {
        match self {
            Self::Token(kind) => Some(*kind),
            Self::Secret(_) => None,
        }
    }
}

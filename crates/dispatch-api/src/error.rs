//! Maps domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use dispatch_auth::AuthError;
use dispatch_core::error::{AppError, ErrorKind};
use dispatch_core::types::ApiErrorResponse;

/// Error type returned by handlers and extractors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Infrastructure or request error.
    #[error(transparent)]
    App(#[from] AppError),
    /// Token verification failure.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    /// Shorthand for a 401 with a message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::App(AppError::authentication(message))
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Auth(AuthError::Token(_)) => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            Self::Auth(AuthError::Secret(e)) | Self::App(e) => match e.kind {
                ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
                ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                ErrorKind::CacheUnavailable | ErrorKind::ServiceUnavailable => {
                    (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
                }
                ErrorKind::Cache => (StatusCode::BAD_GATEWAY, "CACHE_ERROR"),
                ErrorKind::Internal
                | ErrorKind::Database
                | ErrorKind::Configuration
                | ErrorKind::Serialization => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                }
            },
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Auth(AuthError::Token(kind)) => kind.to_string(),
            Self::Auth(AuthError::Secret(e)) | Self::App(e) => e.message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message: self.message(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_auth::TokenErrorKind;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::Auth(AuthError::Token(TokenErrorKind::ExpiredToken)),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Auth(AuthError::Secret(AppError::cache_unavailable())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApiError::Auth(AuthError::Secret(AppError::cache("connection refused"))),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ApiError::App(AppError::database("pool timed out")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::unauthorized("missing header"), StatusCode::UNAUTHORIZED),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}

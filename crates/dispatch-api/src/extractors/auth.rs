//! `BearerClaims` extractor: pulls the token from the Authorization header
//! and verifies it against the actor's current signing secret.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use dispatch_auth::Claims;
use dispatch_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Verified token claims of the calling actor.
#[derive(Debug, Clone)]
pub struct BearerClaims(pub Claims);

impl std::ops::Deref for BearerClaims {
    type Target = Claims;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Returns the token from `Authorization: Bearer <token>`.
///
/// Exactly one header must be present.
pub fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let mut values = parts.headers.get_all(AUTHORIZATION).iter();
    let value = values
        .next()
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;
    if values.next().is_some() {
        return Err(ApiError::unauthorized("Multiple Authorization headers"));
    }

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Invalid Authorization header format"))
}

impl FromRequestParts<AppState> for BearerClaims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = tokio::time::timeout(state.request_timeout(), state.authority.verify(token))
            .await
            .map_err(|_| AppError::service_unavailable("Token verification timed out"))??;

        Ok(BearerClaims(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[&str]) -> Parts {
        let mut builder = Request::builder().uri("/api/session");
        for value in headers {
            builder = builder.header(AUTHORIZATION, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_extracts_bearer_token() {
        let parts = parts(&["Bearer abc.def.ghi"]);
        assert_eq!(bearer_token(&parts).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_rejects_bad_headers() {
        for headers in [
            &[][..],
            &["Basic dXNlcjpwYXNz"][..],
            &["bearer abc.def.ghi"][..],
            &["Bearer "][..],
            &["Bearer a.b.c", "Bearer d.e.f"][..],
        ] {
            assert!(bearer_token(&parts(headers)).is_err(), "{headers:?}");
        }
    }
}

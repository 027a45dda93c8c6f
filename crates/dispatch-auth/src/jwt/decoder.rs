//! Token parsing, signature checks, and mapping of library failures onto
//! [`TokenErrorKind`].

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::error::TokenErrorKind;
use crate::secret::SigningSecret;

use super::claims::Claims;

/// Parses and validates compact HS256 tokens.
///
/// Time checks are done here rather than by `jsonwebtoken` so they can run
/// against an explicit clock.
#[derive(Debug, Clone)]
pub struct JwtDecoder {
    /// Signature-only validation configuration.
    validation: Validation,
}

impl Default for JwtDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JwtDecoder {
    /// Creates a new decoder accepting HS256 only.
    pub fn new() -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self { validation }
    }

    /// Reads the claims without checking the signature.
    ///
    /// Only used to learn whose secret to verify against.
    pub fn peek_claims(&self, token: &str) -> Result<Claims, TokenErrorKind> {
        let mut parts = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenErrorKind::MalformedToken);
        };
        if header.is_empty() || payload.is_empty() || signature.is_empty() {
            return Err(TokenErrorKind::MalformedToken);
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|_| TokenErrorKind::MalformedToken)?;
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|_| TokenErrorKind::MalformedToken)?;

        serde_json::from_value(value).map_err(|_| TokenErrorKind::ClaimsTypeError)
    }

    /// Verifies the token's signature against `secret` and returns its claims.
    pub fn verify_signature(
        &self,
        token: &str,
        secret: &SigningSecret,
    ) -> Result<Claims, TokenErrorKind> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &self.validation,
        )
        .map(|data| data.claims)
        .map_err(|e| map_jwt_error(e.kind()))
    }

    /// Checks the `iat`/`nbf`/`exp` window at `now`.
    ///
    /// Not-yet-valid tokens are reported as expired.
    pub fn check_time_window(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenErrorKind> {
        if claims.is_expired_at(now) || claims.is_premature_at(now) {
            return Err(TokenErrorKind::ExpiredToken);
        }
        Ok(())
    }
}

fn map_jwt_error(kind: &JwtErrorKind) -> TokenErrorKind {
    match kind {
        JwtErrorKind::InvalidToken | JwtErrorKind::Base64(_) | JwtErrorKind::Utf8(_) => {
            TokenErrorKind::MalformedToken
        }
        JwtErrorKind::ExpiredSignature | JwtErrorKind::ImmatureSignature => {
            TokenErrorKind::ExpiredToken
        }
        JwtErrorKind::InvalidSignature => TokenErrorKind::InvalidSignature,
        JwtErrorKind::Json(_) => TokenErrorKind::ClaimsTypeError,
        _ => TokenErrorKind::UnknownTokenError,
    }
}

//! Token issuance and verification against per-actor secrets.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use dispatch_core::config::AuthConfig;
use dispatch_core::error::AppError;
use dispatch_core::result::AppResult;
use dispatch_core::types::{ActorKey, parse_actor_id};

use crate::error::{AuthError, TokenErrorKind};
use crate::secret::SecretStore;

use super::claims::{Claims, DeviceContext, IssuedToken};
use super::decoder::JwtDecoder;
use super::encoder::JwtEncoder;

/// Issues and verifies bearer tokens.
///
/// In single-login mode every issuance rotates the actor's secret, so a new
/// token supersedes all earlier ones. Otherwise the secret is stable and
/// any number of tokens stay valid until they expire.
#[derive(Debug, Clone)]
pub struct TokenAuthority {
    secrets: Arc<SecretStore>,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl TokenAuthority {
    /// Creates a token authority over the given secret store.
    pub fn new(config: &AuthConfig, secrets: Arc<SecretStore>) -> Self {
        Self {
            secrets,
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(),
        }
    }

    /// The secret store backing this authority.
    pub fn secrets(&self) -> &SecretStore {
        &self.secrets
    }

    /// Issues a token for `actor`. The role is bound into the claims.
    pub async fn issue(&self, actor: &ActorKey, device: &DeviceContext) -> AppResult<IssuedToken> {
        self.issue_at(actor, device, Utc::now()).await
    }

    /// Issues a token as if the current time were `now`.
    pub async fn issue_at(
        &self,
        actor: &ActorKey,
        device: &DeviceContext,
        now: DateTime<Utc>,
    ) -> AppResult<IssuedToken> {
        let actor_id = actor.id();
        if parse_actor_id(actor_id).is_none() {
            return Err(AppError::validation(format!("invalid actor id: {actor_id}")));
        }

        let claims = self.encoder.build_claims(actor, device, now);

        let secret = if self.secrets.single_login() {
            self.secrets.rotate_secret(actor_id).await?
        } else {
            self.secrets.get_secret(actor_id).await?
        };

        let access_token = self.encoder.sign(&claims, &secret)?;

        debug!(actor = %actor, jti = %claims.jti, "Issued token");

        Ok(IssuedToken {
            access_token,
            token_id: claims.jti,
            expires_at: claims.expires_at(),
        })
    }

    /// Verifies a presented token and returns its claims.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now()).await
    }

    /// Verifies a presented token as if the current time were `now`.
    ///
    /// An expired token reports [`TokenErrorKind::ExpiredToken`] even when
    /// its secret has since been rotated.
    pub async fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let unverified = self.decoder.peek_claims(token)?;

        // The subject is unauthenticated here. Only well-formed ids may reach
        // the cache, where a miss creates a secret.
        if parse_actor_id(unverified.actor_id()).is_none() {
            debug!(sub = unverified.actor_id(), "Token subject is not an actor id");
            return Err(TokenErrorKind::ClaimsTypeError.into());
        }

        let secret = self.secrets.get_secret(unverified.actor_id()).await?;

        JwtDecoder::check_time_window(&unverified, now)?;

        let claims = self
            .decoder
            .verify_signature(token, &secret)
            .inspect_err(|kind| {
                debug!(actor_id = unverified.actor_id(), error = %kind, "Token rejected");
            })?;

        Ok(claims)
    }

    /// Revokes every outstanding token for the actor by rotating its secret.
    ///
    /// Has no effect when single-login is disabled, since the secret of
    /// record is then the actor's stored credential.
    pub async fn revoke_all(&self, actor_id: &str) -> AppResult<()> {
        if !self.secrets.single_login() {
            warn!(actor_id, "Revocation requested while single-login is disabled");
        }
        self.secrets.rotate_secret(actor_id).await?;
        Ok(())
    }
}

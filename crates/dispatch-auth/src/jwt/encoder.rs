//! Claim construction and HS256 signing.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use dispatch_core::config::{AuthConfig, MAX_TOKEN_EXPIRE_HOURS};
use dispatch_core::error::AppError;
use dispatch_core::types::ActorKey;

use crate::secret::SigningSecret;

use super::claims::{Claims, DeviceContext};

/// Builds claims and signs them with a per-actor secret.
#[derive(Debug, Clone)]
pub struct JwtEncoder {
    /// Header carrying the HS256 algorithm.
    header: Header,
    /// Issuer claim value.
    issuer: String,
    /// Token lifetime.
    ttl: Duration,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            header: Header::new(Algorithm::HS256),
            issuer: config.issuer.clone(),
            ttl: Duration::hours(config.token_expire_hours.min(MAX_TOKEN_EXPIRE_HOURS) as i64),
        }
    }

    /// Builds the claim set for an issuance to `actor` at `now`.
    pub fn build_claims(&self, actor: &ActorKey, device: &DeviceContext, now: DateTime<Utc>) -> Claims {
        Claims {
            sub: actor.id().to_string(),
            role: actor.role(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            nbf: None,
            platform: device.platform.clone(),
            imei: device.imei.clone(),
            client_version: device.client_version.clone(),
            model: device.model.clone(),
            system_version: device.system_version.clone(),
        }
    }

    /// Signs the claims with the given secret.
    pub fn sign(&self, claims: &Claims, secret: &SigningSecret) -> Result<String, AppError> {
        encode(
            &self.header,
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_core::types::ActorRole;

    fn user(id: &str) -> ActorKey {
        ActorKey::new(ActorRole::User, id)
    }

    #[test]
    fn test_claims_carry_device_and_lifetime() {
        let encoder = JwtEncoder::new(&AuthConfig::default());
        let device = DeviceContext {
            platform: "ios".to_string(),
            model: "iPhone15,2".to_string(),
            ..DeviceContext::default()
        };
        let now = Utc::now();
        let claims = encoder.build_claims(&ActorKey::new(ActorRole::Driver, "42"), &device, now);

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, ActorRole::Driver);
        assert_eq!(claims.iss, "dispatch");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(claims.platform, "ios");
        assert_eq!(claims.model, "iPhone15,2");
    }

    #[test]
    fn test_token_ids_are_unique_per_issuance() {
        let encoder = JwtEncoder::new(&AuthConfig::default());
        let now = Utc::now();
        let a = encoder.build_claims(&user("42"), &DeviceContext::default(), now);
        let b = encoder.build_claims(&user("42"), &DeviceContext::default(), now);
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_signed_token_has_three_parts() {
        let encoder = JwtEncoder::new(&AuthConfig::default());
        let claims = encoder.build_claims(&user("42"), &DeviceContext::default(), Utc::now());
        let token = encoder
            .sign(&claims, &SigningSecret::from("secret".to_string()))
            .unwrap();
        assert_eq!(token.split('.').count(), 3);
    }
}

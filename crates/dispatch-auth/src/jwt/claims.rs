//! JWT claims structure carried by every bearer token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dispatch_core::types::{ActorKey, ActorRole};

/// Claims payload embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Subject: the actor id.
    pub sub: String,
    /// Role the token was issued for. Tokens without one belong to a user.
    #[serde(default)]
    pub role: ActorRole,
    /// Issuer.
    pub iss: String,
    /// Token id, unique per issuance. Opaque; never encodes the subject.
    pub jti: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Not-before timestamp, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Client platform (`ios`, `android`, ...).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub platform: String,
    /// Device identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub imei: String,
    /// Client application version.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_version: String,
    /// Device model.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
    /// Device operating system version.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub system_version: String,
}

impl Claims {
    /// Returns the actor id from the subject claim.
    pub fn actor_id(&self) -> &str {
        &self.sub
    }

    /// The `(role, id)` actor this token was issued to.
    pub fn actor_key(&self) -> ActorKey {
        ActorKey::new(self.role, self.sub.as_str())
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Whether the token is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Whether the token is not valid yet at `now` (issued or usable only in the future).
    pub fn is_premature_at(&self, now: DateTime<Utc>) -> bool {
        let now = now.timestamp();
        self.iat > now || self.nbf.is_some_and(|nbf| nbf > now)
    }
}

/// Client metadata recorded in the claims at issuance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceContext {
    /// Client platform.
    #[serde(default)]
    pub platform: String,
    /// Device identifier.
    #[serde(default)]
    pub imei: String,
    /// Client application version.
    #[serde(default)]
    pub client_version: String,
    /// Device model.
    #[serde(default)]
    pub model: String,
    /// Device operating system version.
    #[serde(default)]
    pub system_version: String,
}

/// A freshly signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Compact `header.payload.signature` token.
    pub access_token: String,
    /// Token id (`jti`).
    pub token_id: Uuid,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims_at(iat: DateTime<Utc>, hours: i64) -> Claims {
        Claims {
            sub: "42".to_string(),
            role: ActorRole::User,
            iss: "dispatch".to_string(),
            jti: Uuid::new_v4(),
            iat: iat.timestamp(),
            exp: (iat + Duration::hours(hours)).timestamp(),
            nbf: None,
            platform: String::new(),
            imei: String::new(),
            client_version: String::new(),
            model: String::new(),
            system_version: String::new(),
        }
    }

    #[test]
    fn test_expiry_window() {
        let t = Utc::now();
        let claims = claims_at(t, 24);
        assert!(!claims.is_expired_at(t + Duration::hours(1)));
        assert!(claims.is_expired_at(t + Duration::hours(25)));
    }

    #[test]
    fn test_premature_when_issued_in_future() {
        let t = Utc::now();
        let claims = claims_at(t + Duration::hours(1), 24);
        assert!(claims.is_premature_at(t));
        assert!(!claims.is_premature_at(t + Duration::hours(2)));
    }

    #[test]
    fn test_device_fields_use_client_names_on_wire() {
        let mut claims = claims_at(Utc::now(), 1);
        claims.client_version = "2.3.1".to_string();
        claims.system_version = "17.4".to_string();
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["clientVersion"], "2.3.1");
        assert_eq!(json["systemVersion"], "17.4");
        assert!(json.get("platform").is_none());
        assert!(json.get("nbf").is_none());
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn test_missing_role_reads_as_user() {
        let mut json = serde_json::to_value(claims_at(Utc::now(), 1)).unwrap();
        json.as_object_mut().unwrap().remove("role");
        let claims: Claims = serde_json::from_value(json).unwrap();
        assert_eq!(claims.actor_key(), ActorKey::new(ActorRole::User, "42"));
    }
}

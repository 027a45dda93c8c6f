//! Token and signing-secret configuration.

use serde::{Deserialize, Serialize};

/// Authentication configuration for token issuance and verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// When enabled, every issuance rotates the actor's secret so only the
    /// newest token stays valid.
    #[serde(default)]
    pub single_login: bool,
    /// Token lifetime and ephemeral secret TTL, in hours.
    #[serde(default = "default_expire_hours")]
    pub token_expire_hours: u64,
    /// Value of the `iss` claim.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Application prefix for ephemeral secret cache keys.
    #[serde(default = "default_key_prefix")]
    pub secret_key_prefix: String,
    /// Length of generated ephemeral secrets.
    #[serde(default = "default_secret_length")]
    pub secret_length: usize,
    /// Fixed signing key for actors without a stored credential when
    /// single-login is disabled.
    #[serde(default = "default_fallback_secret")]
    pub fallback_secret: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            single_login: false,
            token_expire_hours: default_expire_hours(),
            issuer: default_issuer(),
            secret_key_prefix: default_key_prefix(),
            secret_length: default_secret_length(),
            fallback_secret: default_fallback_secret(),
        }
    }
}

fn default_expire_hours() -> u64 {
    24
}

fn default_issuer() -> String {
    "dispatch".to_string()
}

fn default_key_prefix() -> String {
    "dispatch".to_string()
}

fn default_secret_length() -> usize {
    8
}

fn default_fallback_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

//! Resolution and rotation of the secret each actor's tokens are signed with.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use dispatch_cache::CacheManager;
use dispatch_cache::keys;
use dispatch_core::config::{AuthConfig, MAX_TOKEN_EXPIRE_HOURS};
use dispatch_core::error::AppError;
use dispatch_core::result::AppResult;
use dispatch_core::traits::{CacheProvider, CredentialStore};

use crate::clients::ClientSet;

use super::generator::random_secret;

/// Key material used to sign and verify one actor's tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(****)")
    }
}

impl From<Vec<u8>> for SigningSecret {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<String> for SigningSecret {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

/// Resolves and rotates per-actor signing secrets.
///
/// With single-login disabled the secret of record is the actor's stored
/// credential (or the fixed fallback key when there is none) and is never
/// rotated. With single-login enabled it is an ephemeral random value held
/// in the TTL cache; overwriting it revokes every token signed with the old
/// value.
#[derive(Debug, Clone)]
pub struct SecretStore {
    cache: Option<Arc<CacheManager>>,
    credentials: Arc<dyn CredentialStore>,
    single_login: bool,
    ttl: Duration,
    key_prefix: String,
    secret_length: usize,
    fallback: SigningSecret,
}

impl SecretStore {
    /// Creates a secret store over the shared clients.
    pub fn new(clients: &ClientSet, config: &AuthConfig) -> Self {
        Self {
            cache: clients.cache.clone(),
            credentials: Arc::clone(&clients.credentials),
            single_login: config.single_login,
            ttl: Duration::from_secs(config.token_expire_hours.min(MAX_TOKEN_EXPIRE_HOURS) * 3600),
            key_prefix: config.secret_key_prefix.clone(),
            secret_length: config.secret_length,
            fallback: SigningSecret::from(config.fallback_secret.clone()),
        }
    }

    /// Whether issuance rotates the secret (only the newest token stays valid).
    pub fn single_login(&self) -> bool {
        self.single_login
    }

    /// Returns the actor's current secret, creating one on a cache miss.
    pub async fn get_secret(&self, actor_id: &str) -> AppResult<SigningSecret> {
        if let Some(secret) = self.stable_secret(actor_id).await? {
            return Ok(secret);
        }

        let cache = self.cache()?;
        let key = keys::user_secret(&self.key_prefix, actor_id);
        match cache.get(&key).await? {
            Some(value) => Ok(SigningSecret::from(value)),
            None => {
                debug!(actor_id, "No cached signing secret, issuing a new one");
                self.write_fresh(cache, &key, actor_id).await
            }
        }
    }

    /// Replaces the actor's ephemeral secret, invalidating all tokens signed
    /// with the previous one. A no-op returning the stable secret when
    /// single-login is disabled.
    pub async fn rotate_secret(&self, actor_id: &str) -> AppResult<SigningSecret> {
        if let Some(secret) = self.stable_secret(actor_id).await? {
            return Ok(secret);
        }

        let cache = self.cache()?;
        let key = keys::user_secret(&self.key_prefix, actor_id);
        self.write_fresh(cache, &key, actor_id).await
    }

    /// The credential-derived secret, or `None` when single-login applies.
    async fn stable_secret(&self, actor_id: &str) -> AppResult<Option<SigningSecret>> {
        if self.single_login {
            return Ok(None);
        }

        let secret = match self.credentials.get_actor_credential(actor_id).await? {
            Some(credential) if !credential.is_empty() => SigningSecret::from(credential),
            _ => self.fallback.clone(),
        };
        Ok(Some(secret))
    }

    fn cache(&self) -> AppResult<&CacheManager> {
        self.cache
            .as_deref()
            .ok_or_else(AppError::cache_unavailable)
    }

    async fn write_fresh(
        &self,
        cache: &CacheManager,
        key: &str,
        actor_id: &str,
    ) -> AppResult<SigningSecret> {
        let secret = random_secret(self.secret_length);
        cache.set(key, &secret, self.ttl).await?;
        info!(actor_id, ttl_secs = self.ttl.as_secs(), "Rotated signing secret");
        Ok(SigningSecret::from(secret))
    }
}

//! Shared collaborator clients, built once at startup and passed by reference.

use std::sync::Arc;

use dispatch_cache::CacheManager;
use dispatch_core::traits::CredentialStore;

/// The external clients the session core depends on.
///
/// `cache` is optional: deployments without single-login can run with no
/// cache client at all.
#[derive(Debug, Clone)]
pub struct ClientSet {
    /// TTL cache holding ephemeral signing secrets.
    pub cache: Option<Arc<CacheManager>>,
    /// Durable store of actor credentials.
    pub credentials: Arc<dyn CredentialStore>,
}

impl ClientSet {
    /// Bundle the given clients.
    pub fn new(cache: Option<Arc<CacheManager>>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self { cache, credentials }
    }
}

//! In-memory credential store.

use async_trait::async_trait;
use dashmap::DashMap;

use dispatch_core::result::AppResult;
use dispatch_core::traits::CredentialStore;

/// Credential store kept in process memory, used when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credentials: DashMap<String, Vec<u8>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or replaces) the credential for an actor.
    pub fn insert(&self, actor_id: impl Into<String>, credential: impl Into<Vec<u8>>) {
        self.credentials.insert(actor_id.into(), credential.into());
    }

    /// Removes the credential for an actor.
    pub fn remove(&self, actor_id: &str) {
        self.credentials.remove(actor_id);
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get_actor_credential(&self, actor_id: &str) -> AppResult<Option<Vec<u8>>> {
        Ok(self
            .credentials
            .get(actor_id)
            .map(|entry| entry.value().clone()))
    }
}

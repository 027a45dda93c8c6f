//! Credential store trait consumed by the signing-secret resolver.

use async_trait::async_trait;

use crate::result::AppResult;

/// Read access to the durable record of an actor's stored credential.
///
/// The store is owned elsewhere (a shared database pool); this trait is the
/// only surface the session core sees of it.
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the stored credential bytes for the actor with the given id.
    ///
    /// `Ok(None)` covers both an unknown actor and an actor without a
    /// stored credential.
    async fn get_actor_credential(&self, actor_id: &str) -> AppResult<Option<Vec<u8>>>;
}

//! Credential lookups against the `users` table.

use async_trait::async_trait;
use sqlx::PgPool;

use dispatch_core::error::{AppError, ErrorKind};
use dispatch_core::result::AppResult;
use dispatch_core::traits::CredentialStore;
use dispatch_core::types::parse_actor_id;

/// Reads an actor's stored password credential.
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    pool: PgPool,
}

impl CredentialRepository {
    /// Create a new credential repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for CredentialRepository {
    async fn get_actor_credential(&self, actor_id: &str) -> AppResult<Option<Vec<u8>>> {
        let Some(id) = parse_actor_id(actor_id) else {
            return Ok(None);
        };

        let row: Option<Option<Vec<u8>>> =
            sqlx::query_scalar("SELECT password FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to load user credential", e)
                })?;

        Ok(row.flatten())
    }
}

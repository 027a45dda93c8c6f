//! Cache key builders for every Dispatch cache entry.
//!
//! Centralising key construction keeps the wire format of shared keys in
//! one place; other services read the same keys.

/// Cache key holding an actor's ephemeral signing secret: `"<prefix>-user-<id>"`.
pub fn user_secret(prefix: &str, actor_id: &str) -> String {
    format!("{prefix}-user-{actor_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_secret_key() {
        assert_eq!(user_secret("dispatch", "42"), "dispatch-user-42");
    }
}

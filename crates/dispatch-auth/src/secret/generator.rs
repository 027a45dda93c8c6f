//! Random ephemeral secret generation.

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Generates a random secret of `len` characters drawn uniformly from `[A-Za-z0-9]`.
pub fn random_secret(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_alphabet() {
        let secret = random_secret(8);
        assert_eq!(secret.len(), 8);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_successive_secrets_differ() {
        assert_ne!(random_secret(32), random_secret(32));
    }
}

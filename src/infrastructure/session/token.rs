//! Session token generation
//!
//! Tokens are random bytes encoded as URL-safe base64. Stores index sessions
//! by the SHA-256 digest of the token so a leaked store does not leak live
//! credentials.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::domain::session::SessionToken;

const DEFAULT_TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone)]
pub struct SessionTokenGenerator {
    token_bytes: usize,
}

impl SessionTokenGenerator {
    pub fn new() -> Self {
        Self {
            token_bytes: DEFAULT_TOKEN_BYTES,
        }
    }

    pub fn generate(&self) -> SessionToken {
        let mut random_bytes = vec![0u8; self.token_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        SessionToken::new(URL_SAFE_NO_PAD.encode(&random_bytes))
    }
}

impl Default for SessionTokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Storage key for a client token
pub fn token_digest(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("sha256${}", URL_SAFE_NO_PAD.encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_unique_and_url_safe() {
        let generator = SessionTokenGenerator::new();

        let first = generator.generate();
        let second = generator.generate();

        assert_ne!(first, second);
        // 32 bytes base64-encoded without padding = 43 chars
        assert_eq!(first.as_str().len(), 43);
        assert!(first
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_digest_is_stable_and_hides_token() {
        let digest = token_digest("abc");

        assert_eq!(digest, token_digest("abc"));
        assert_ne!(digest, token_digest("abd"));
        assert!(digest.starts_with("sha256$"));
        assert!(!digest.contains("abc"));
    }
}

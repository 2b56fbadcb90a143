//! Bearer token authentication for the analytics and maintenance API.

use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distr::Alphanumeric;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::repositories::TokenRepository;
use crate::error::AppError;
use serde_json::json;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Length of generated raw tokens.
const TOKEN_LEN: usize = 40;

/// Hashes a raw token with HMAC-SHA256 keyed by `secret`.
///
/// Returns a 64-character lowercase hex MAC. The server and the admin CLI
/// must hash with the same secret.
pub fn hash_token(secret: &str, token: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Generates a random alphanumeric raw token.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Service for authenticating API requests via Bearer tokens.
///
/// Only HMAC hashes are stored, so read access to the database is not enough
/// to forge or verify a token without the server-side secret.
pub struct AuthService<R: TokenRepository + ?Sized> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository + ?Sized> AuthService<R> {
    /// Creates a new authentication service.
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Authenticates a raw token and stamps its `last_used_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<(), AppError> {
        let token_hash = hash_token(&self.signing_secret, token);

        if !self.repository.validate_token(&token_hash).await? {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ));
        }

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            debug!("Failed to stamp token usage: {}", e);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockTokenRepository;

    const SECRET: &str = "test-signing-secret";

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut mock_repo = MockTokenRepository::new();
        let expected_hash = hash_token(SECRET, "valid-token");

        mock_repo
            .expect_validate_token()
            .withf(move |hash| hash == expected_hash)
            .times(1)
            .returning(|_| Ok(true));
        mock_repo
            .expect_update_last_used()
            .times(1)
            .returning(|_| Ok(()));

        let service = AuthService::new(Arc::new(mock_repo), SECRET.to_string());

        assert!(service.authenticate("valid-token").await.is_ok());
    }

    #[tokio::test]
    async fn test_authenticate_invalid_token() {
        let mut mock_repo = MockTokenRepository::new();
        mock_repo
            .expect_validate_token()
            .times(1)
            .returning(|_| Ok(false));
        mock_repo.expect_update_last_used().times(0);

        let service = AuthService::new(Arc::new(mock_repo), SECRET.to_string());

        let result = service.authenticate("invalid-token").await;
        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_last_used_failure_is_ignored() {
        let mut mock_repo = MockTokenRepository::new();
        mock_repo.expect_validate_token().returning(|_| Ok(true));
        mock_repo
            .expect_update_last_used()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = AuthService::new(Arc::new(mock_repo), SECRET.to_string());

        assert!(service.authenticate("t").await.is_ok());
    }

    #[test]
    fn test_hash_token_is_keyed() {
        let a = hash_token("secret-a", "token");
        let b = hash_token("secret-b", "token");

        assert_eq!(a.len(), 64);
        assert_eq!(a, hash_token("secret-a", "token"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_token() {
        let a = generate_token();
        let b = generate_token();

        assert_eq!(a.len(), TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}

//! Password hashing and access token issuing
//!
//! Passwords are hashed with Argon2id. Access tokens are HS256 JWTs carrying
//! the user id as the subject and the username as a custom claim.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;
use jwt_simple::prelude::*;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::RagChatError;
use crate::errors::Result;

/// Identity carried by a verified access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenData {
    pub user_id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    username: String,
}

/// Hash a password with Argon2id and a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| RagChatError::PasswordHash(e.to_string()))
}

/// Verify a password against a stored Argon2id hash
pub fn verify_password(password: &str, hashed: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(hashed).map_err(|e| RagChatError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Issues and verifies HS256 access tokens
pub struct TokenService {
    key: HS256Key,
    expiry_minutes: u64,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &str, expiry_minutes: u64) -> Self {
        Self {
            key: HS256Key::from_bytes(secret.as_bytes()),
            expiry_minutes,
        }
    }

    /// Issue a signed token for the given user
    pub fn issue(&self, user_id: Uuid, username: &str) -> Result<String> {
        let custom = SessionClaims {
            username: username.to_string(),
        };
        let claims = Claims::with_custom_claims(custom, Duration::from_mins(self.expiry_minutes))
            .with_subject(user_id.to_string());

        self.key
            .authenticate(claims)
            .map_err(|e| RagChatError::Jwt(e.to_string()))
    }

    /// Verify a token and extract the identity it carries
    ///
    /// Any failure (bad signature, expired, malformed subject) reads as an
    /// invalid token; callers map that to an authentication error.
    pub fn verify(&self, token: &str) -> Result<TokenData> {
        let claims = self
            .key
            .verify_token::<SessionClaims>(token, None)
            .map_err(|_| RagChatError::InvalidToken)?;

        let subject = claims.subject.ok_or(RagChatError::InvalidToken)?;
        let user_id = Uuid::parse_str(&subject).map_err(|_| RagChatError::InvalidToken)?;

        Ok(TokenData {
            user_id,
            username: claims.custom.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hashed = hash_password("hunter2").unwrap();
        assert_ne!(hashed, "hunter2");
        assert!(verify_password("hunter2", &hashed).unwrap());
        assert!(!verify_password("wrong-password", &hashed).unwrap());
    }

    #[test]
    fn test_each_hash_uses_a_fresh_salt() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_token_round_trip() {
        let service = TokenService::new("test-secret-test-secret", 30);
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id, "alice").unwrap();
        let data = service.verify(&token).unwrap();

        assert_eq!(data.user_id, user_id);
        assert_eq!(data.username, "alice");
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let service = TokenService::new("test-secret-test-secret", 30);
        let token = service.issue(Uuid::new_v4(), "alice").unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        assert!(service.verify(&tampered).is_err());
    }

    #[test]
    fn test_token_from_other_key_is_rejected() {
        let issuer = TokenService::new("first-secret", 30);
        let verifier = TokenService::new("second-secret", 30);

        let token = issuer.issue(Uuid::new_v4(), "alice").unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(RagChatError::InvalidToken)
        ));
    }
}

//! Session token verification
//!
//! Handles decoding and validation of staff session tokens. Token issuance
//! belongs to the external identity service; `encode_session_token` exists
//! for development tooling and tests that need to mint a valid token.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Claims carried by a staff session token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (staff user ID)
    pub sub: String,
    /// Role claim ("admin" or "staff")
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Verify a session token and return its claims
pub fn verify_session_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let validation = Validation::default();

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        _ => JwtError::InvalidToken(e.to_string()),
    })
}

/// Mint a session token for the given staff user
pub fn encode_session_token(
    user_id: Uuid,
    role: &str,
    secret: &str,
    ttl_seconds: i64,
) -> Result<String, JwtError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(ttl_seconds);

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::EncodingFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let user_id = Uuid::new_v4();
        let token = encode_session_token(user_id, "staff", "test-secret", 60).unwrap();

        let claims = verify_session_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "staff");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = encode_session_token(Uuid::new_v4(), "admin", "secret-a", 60).unwrap();
        assert!(verify_session_token(&token, "secret-b").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = encode_session_token(Uuid::new_v4(), "admin", "secret", -120).unwrap();
        match verify_session_token(&token, "secret") {
            Err(JwtError::TokenExpired) => {}
            other => panic!("expected TokenExpired, got {:?}", other),
        }
    }
}

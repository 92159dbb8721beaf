use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Represents the claims encoded within a session JWT.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's id in hex form.
    pub sub: String,
    /// Email of the authenticated user.
    pub email: String,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
}

/// Generates a signed session token for a user.
///
/// The token carries `{sub, email, exp}` and expires after `ttl`. The signing
/// secret comes from the configuration; this module never reads the
/// environment itself.
pub fn generate_token(
    user_id: &str,
    email: &str,
    secret: &str,
    ttl: Duration,
) -> Result<String, AppError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::seconds(ttl.as_secs() as i64))
        .map(|t| t.timestamp() as usize)
        .ok_or_else(|| AppError::Internal("token expiry out of range".into()))?;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

/// Verifies a session token's signature and expiry, returning its claims.
///
/// Any failure (malformed token, bad signature, expired) collapses into a
/// single `Unauthorized` so middleware replies uniformly.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("invalid or expired token".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_generation_and_verification() {
        let token =
            generate_token("64f1a2b3c4d5e6f7a8b9c0d1", "test@example.com", SECRET, Duration::from_secs(900))
                .unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "64f1a2b3c4d5e6f7a8b9c0d1");
        assert_eq!(claims.email, "test@example.com");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let expired = Claims {
            sub: "64f1a2b3c4d5e6f7a8b9c0d1".into(),
            email: "test@example.com".into(),
            exp: (chrono::Utc::now() - chrono::Duration::hours(2)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &expired,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        match verify_token(&token, SECRET) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "invalid or expired token"),
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token =
            generate_token("64f1a2b3c4d5e6f7a8b9c0d1", "test@example.com", SECRET, Duration::from_secs(900))
                .unwrap();
        assert!(verify_token(&token, "another-secret").is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(verify_token("not.a.jwt", SECRET).is_err());
        assert!(verify_token("", SECRET).is_err());
    }
}

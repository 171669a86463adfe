/// JWT token generation and validation
///
/// Tokens are signed with HS256 (HMAC-SHA256) and carry the minimal claim
/// set the system needs: the user id and an expiry. Expiry is configurable
/// in hours (`JWT_EXPIRATION_HOURS`, default 24).
///
/// # Example
///
/// ```
/// use crewdesk_shared::auth::jwt::{create_token, validate_token, Claims};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "a-test-secret-key-of-at-least-32-bytes";
///
/// let claims = Claims::new(user_id, Duration::hours(24));
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("token has expired")]
    Expired,

    /// Signature, format, or claim validation failed
    #[error("invalid token: {0}")]
    Invalid(String),
}

/// JWT claims
///
/// `sub` is the user id; `iat`/`exp` are Unix timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: Uuid,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims expiring `expires_in` from now
    pub fn new(user_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }
}

/// Signs claims into a token string
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key).map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Validates a token's signature and expiry and extracts its claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Invalid(e.to_string()),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "a-test-secret-key-of-at-least-32-bytes";

    #[test]
    fn test_round_trip() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, Duration::hours(1));
        let token = create_token(&claims, SECRET).unwrap();

        let validated = validate_token(&token, SECRET).unwrap();
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.exp, claims.exp);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims::new(Uuid::new_v4(), Duration::hours(1));
        let token = create_token(&claims, SECRET).unwrap();

        let err = validate_token(&token, "another-secret-key-of-32-bytes-min").unwrap_err();
        assert!(matches!(err, JwtError::Invalid(_)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = Claims::new(Uuid::new_v4(), Duration::hours(-2));
        let token = create_token(&claims, SECRET).unwrap();

        let err = validate_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, JwtError::Expired));
    }

    #[test]
    fn test_garbage_rejected() {
        let err = validate_token("not-a-token", SECRET).unwrap_err();
        assert!(matches!(err, JwtError::Invalid(_)));
    }
}

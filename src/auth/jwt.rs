//! JWT token validation
//!
//! Tokens are issued by the external auth provider; this module only verifies
//! them and extracts the caller's identity and role.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token decoding failed: {0}")]
    DecodingFailed(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// JWT claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// User role
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Verify and decode a JWT token
///
/// # Arguments
/// * `token` - The JWT token string
/// * `secret` - JWT signing secret
///
/// # Returns
/// * `Ok(Claims)` if token is valid
/// * `Err(JwtError)` if validation fails
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        if e.to_string().contains("ExpiredSignature") {
            JwtError::TokenExpired
        } else {
            JwtError::DecodingFailed(e.to_string())
        }
    })?;

    Ok(token_data.claims)
}

/// Extract user ID from claims
pub fn get_user_id_from_claims(claims: &Claims) -> Result<Uuid, JwtError> {
    Uuid::parse_str(&claims.sub).map_err(|e| JwtError::InvalidToken(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    /// Sign a token the way the auth provider would
    fn issue_token(user_id: Uuid, role: &str, secret: &str, ttl_seconds: i64) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: "test@example.com".to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_valid_token() {
        let user_id = Uuid::new_v4();
        let secret = "test-secret-key";

        let token = issue_token(user_id, "user", secret, 900);
        let claims = verify_token(&token, secret).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.role, "user");
        assert_eq!(get_user_id_from_claims(&claims).unwrap(), user_id);
    }

    #[test]
    fn test_admin_role_claim() {
        let token = issue_token(Uuid::new_v4(), "admin", "test-secret-key", 900);
        let claims = verify_token(&token, "test-secret-key").unwrap();
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token("invalid.token.here", "test-secret-key");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let token = issue_token(Uuid::new_v4(), "user", "secret1", 900);
        let result = verify_token(&token, "secret2");
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token() {
        // Past the default validation leeway
        let token = issue_token(Uuid::new_v4(), "user", "test-secret-key", -300);
        assert!(matches!(
            verify_token(&token, "test-secret-key"),
            Err(JwtError::TokenExpired)
        ));
    }
}

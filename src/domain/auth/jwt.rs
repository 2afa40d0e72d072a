use crate::domain::id::new_id;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::KeyType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    #[serde(rename = "type")]
    pub token_type: KeyType,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and checks HS256 tokens with a shared secret.
pub struct JwtManager {
    secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtManager {
    pub fn new(secret: String, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            secret,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Generate a token of the given type for a user
    pub fn generate_token(&self, user_id: &str, token_type: KeyType) -> AppResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now
            + match token_type {
                KeyType::Access => self.access_ttl,
                KeyType::Refresh => self.refresh_ttl,
            };

        let claims = Claims {
            sub: user_id.to_string(),
            token_type,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            jti: new_id(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Validate a token and extract claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
    }

    /// Validate a token and require it to be of `expected` type
    pub fn validate_typed(&self, token: &str, expected: KeyType) -> AppResult<Claims> {
        let claims = self.validate_token(token)?;
        if claims.token_type != expected {
            return Err(AppError::Unauthorized("Wrong token type".to_string()));
        }
        Ok(claims)
    }
}

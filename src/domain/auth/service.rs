use std::sync::Arc;

use chrono::Utc;

use super::{
    hash_password, verify_password, ApiKey, ApiKeyRepository, AuthServiceError,
    CredentialsRequest, JwtManager, KeyType, TokenResponse,
};
use crate::domain::id::new_id;
use crate::domain::shared::RepositoryError;
use crate::domain::user::{User, UserRepository, UserResponse};

const MAX_USERNAME_LENGTH: usize = 64;

pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    key_repo: Arc<dyn ApiKeyRepository>,
    jwt: Arc<JwtManager>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        key_repo: Arc<dyn ApiKeyRepository>,
        jwt: Arc<JwtManager>,
    ) -> Self {
        Self {
            user_repo,
            key_repo,
            jwt,
        }
    }

    /// Create an account
    pub async fn register(
        &self,
        request: CredentialsRequest,
    ) -> Result<UserResponse, AuthServiceError> {
        let username = Self::validate_username(&request.username)?;
        let password = request.password;
        let hashed = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AuthServiceError::Dependency(e.to_string()))??;

        let user = User {
            id: new_id(),
            username: username.to_string(),
            password_hash: hashed.hash,
            password_salt: hashed.salt,
            created_at: Utc::now(),
        };

        match self.user_repo.create(&user).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict(_)) => return Err(AuthServiceError::UsernameTaken),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(user_id = %user.id, "User registered");
        Ok(UserResponse::from(user))
    }

    /// Exchange credentials for a token pair
    pub async fn login(
        &self,
        request: CredentialsRequest,
    ) -> Result<TokenResponse, AuthServiceError> {
        let user = match self.user_repo.user_with_name(request.username.trim()).await {
            Ok(user) => user,
            Err(RepositoryError::ModelNotFound) => return Err(AuthServiceError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        let password = request.password;
        let hash = user.password_hash.clone();
        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AuthServiceError::Dependency(e.to_string()))??;

        tracing::debug!(user_id = %user.id, "User logged in");
        self.issue_tokens(&user.id).await
    }

    /// Rotate a refresh token. The presented token is revoked.
    pub async fn renew(&self, refresh_token: &str) -> Result<TokenResponse, AuthServiceError> {
        let claims = self.jwt.validate_typed(refresh_token, KeyType::Refresh)?;

        let key = match self.key_repo.key_with_value(&claims.sub, refresh_token).await {
            Ok(key) => key,
            Err(RepositoryError::ModelNotFound) => {
                return Err(AuthServiceError::Unauthorized(
                    "Refresh token revoked".to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        };
        if key.is_expired(Utc::now()) {
            self.key_repo.delete(&claims.sub, &key.id).await?;
            return Err(AuthServiceError::Unauthorized(
                "Refresh token expired".to_string(),
            ));
        }

        self.key_repo.delete(&claims.sub, &key.id).await?;
        self.issue_tokens(&claims.sub).await
    }

    /// Resolve an access token to the id of an existing user
    pub async fn authenticate(&self, access_token: &str) -> Result<String, AuthServiceError> {
        let claims = self.jwt.validate_typed(access_token, KeyType::Access)?;

        match self.user_repo.user_with_id(&claims.sub).await {
            Ok(user) => Ok(user.id),
            Err(RepositoryError::ModelNotFound) => {
                Err(AuthServiceError::Unauthorized("User not found".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn issue_tokens(&self, user_id: &str) -> Result<TokenResponse, AuthServiceError> {
        let access = self.jwt.generate_token(user_id, KeyType::Access)?;
        let refresh = self.jwt.generate_token(user_id, KeyType::Refresh)?;

        let key = ApiKey {
            id: new_id(),
            user_id: user_id.to_string(),
            key: refresh.token.clone(),
            key_type: KeyType::Refresh,
            expires_at: refresh.expires_at,
            created_at: Utc::now(),
        };
        self.key_repo.create(user_id, &key).await?;

        Ok(TokenResponse {
            access_token: access.token,
            refresh_token: refresh.token,
            expires_in: self.jwt.access_ttl().num_seconds(),
        })
    }

    fn validate_username(username: &str) -> Result<&str, AuthServiceError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthServiceError::Invalid(
                "Username must not be empty".to_string(),
            ));
        }
        if username.chars().count() > MAX_USERNAME_LENGTH {
            return Err(AuthServiceError::Invalid(format!(
                "Username must be at most {} characters",
                MAX_USERNAME_LENGTH
            )));
        }
        Ok(username)
    }
}

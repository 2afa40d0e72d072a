use crate::domain::shared::RepositoryError;
use crate::error::AppError;

use super::PasswordError;

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("username already taken")]
    UsernameTaken,
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl From<RepositoryError> for AuthServiceError {
    fn from(err: RepositoryError) -> Self {
        AuthServiceError::Dependency(err.to_string())
    }
}

impl From<PasswordError> for AuthServiceError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooShort | PasswordError::TooLong => {
                AuthServiceError::Invalid(err.to_string())
            }
            PasswordError::VerificationFailed | PasswordError::InvalidHash => {
                AuthServiceError::InvalidCredentials
            }
            PasswordError::HashError(msg) => AuthServiceError::Dependency(msg),
        }
    }
}

impl From<AppError> for AuthServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Unauthorized(msg) => AuthServiceError::Unauthorized(msg),
            other => AuthServiceError::Dependency(other.to_string()),
        }
    }
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::Invalid(msg) => AppError::BadRequest(msg),
            AuthServiceError::InvalidCredentials => {
                AppError::Unauthorized("Invalid username or password".to_string())
            }
            AuthServiceError::UsernameTaken => {
                AppError::Conflict("Username already taken".to_string())
            }
            AuthServiceError::Unauthorized(msg) => AppError::Unauthorized(msg),
            AuthServiceError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}

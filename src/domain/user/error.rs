use crate::domain::shared::RepositoryError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("user not found")]
    NotFound,
}

impl From<RepositoryError> for UserServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ModelNotFound => UserServiceError::NotFound,
            other => UserServiceError::Dependency(other.to_string()),
        }
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::NotFound => AppError::NotFound("User not found".to_string()),
            UserServiceError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}

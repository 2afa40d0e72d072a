use crate::domain::shared::RepositoryError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum FeedServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("feed not found")]
    NotFound,
    #[error("could not fetch feed: {0}")]
    Upstream(String),
}

impl From<RepositoryError> for FeedServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ModelNotFound => FeedServiceError::NotFound,
            other => FeedServiceError::Dependency(other.to_string()),
        }
    }
}

impl From<FeedServiceError> for AppError {
    fn from(err: FeedServiceError) -> Self {
        match err {
            FeedServiceError::Invalid(msg) => AppError::BadRequest(msg),
            FeedServiceError::NotFound => AppError::NotFound("Feed not found".to_string()),
            FeedServiceError::Upstream(msg) => {
                AppError::BadRequest(format!("Could not fetch feed: {}", msg))
            }
            FeedServiceError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}

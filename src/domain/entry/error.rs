use crate::domain::shared::RepositoryError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum EntryServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("entry not found")]
    NotFound,
}

impl From<RepositoryError> for EntryServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ModelNotFound => EntryServiceError::NotFound,
            other => EntryServiceError::Dependency(other.to_string()),
        }
    }
}

impl From<EntryServiceError> for AppError {
    fn from(err: EntryServiceError) -> Self {
        match err {
            EntryServiceError::Invalid(msg) => AppError::BadRequest(msg),
            EntryServiceError::NotFound => AppError::NotFound("Entry not found".to_string()),
            EntryServiceError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}

use crate::domain::shared::RepositoryError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TagServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("tag not found")]
    NotFound,
    #[error("tag already exists")]
    Conflict,
}

impl From<RepositoryError> for TagServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ModelNotFound => TagServiceError::NotFound,
            RepositoryError::Conflict(_) => TagServiceError::Conflict,
            other => TagServiceError::Dependency(other.to_string()),
        }
    }
}

impl From<TagServiceError> for AppError {
    fn from(err: TagServiceError) -> Self {
        match err {
            TagServiceError::Invalid(msg) => AppError::BadRequest(msg),
            TagServiceError::NotFound => AppError::NotFound("Tag not found".to_string()),
            TagServiceError::Conflict => AppError::Conflict("Tag name already exists".to_string()),
            TagServiceError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}

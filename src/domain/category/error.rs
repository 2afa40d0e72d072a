use crate::domain::shared::RepositoryError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("category not found")]
    NotFound,
    #[error("category already exists")]
    Conflict,
}

impl From<RepositoryError> for CategoryServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ModelNotFound => CategoryServiceError::NotFound,
            RepositoryError::Conflict(_) => CategoryServiceError::Conflict,
            other => CategoryServiceError::Dependency(other.to_string()),
        }
    }
}

impl From<CategoryServiceError> for AppError {
    fn from(err: CategoryServiceError) -> Self {
        match err {
            CategoryServiceError::Invalid(msg) => AppError::BadRequest(msg),
            CategoryServiceError::NotFound => AppError::NotFound("Category not found".to_string()),
            CategoryServiceError::Conflict => {
                AppError::Conflict("Category name already exists".to_string())
            }
            CategoryServiceError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}

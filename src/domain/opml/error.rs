use crate::domain::shared::RepositoryError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum OpmlServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid document: {0}")]
    Invalid(String),
}

impl From<RepositoryError> for OpmlServiceError {
    fn from(err: RepositoryError) -> Self {
        OpmlServiceError::Dependency(err.to_string())
    }
}

impl From<opml::Error> for OpmlServiceError {
    fn from(err: opml::Error) -> Self {
        OpmlServiceError::Invalid(err.to_string())
    }
}

impl From<OpmlServiceError> for AppError {
    fn from(err: OpmlServiceError) -> Self {
        match err {
            OpmlServiceError::Invalid(msg) => AppError::BadRequest(format!("Invalid OPML: {}", msg)),
            OpmlServiceError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}

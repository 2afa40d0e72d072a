/// Errors returned by every repository implementation.
///
/// A row that exists but belongs to another user is reported as
/// [`RepositoryError::ModelNotFound`], the same as a missing row.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("model not found")]
    ModelNotFound,

    #[error("model already exists: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::ModelNotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepositoryError::Conflict(db_err.message().to_string())
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                RepositoryError::ModelNotFound
            }
            other => RepositoryError::Database(other),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

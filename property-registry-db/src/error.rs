use thiserror::Error;
use uuid::Uuid;

/// Errors raised by repository implementations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(Uuid),

    /// The backing store could not be reached (pool exhausted, connection refused, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A storage constraint rejected the operation (foreign key, uniqueness, check)
    #[error("Constraint violation: {0}")]
    Conflict(String),

    #[error("Invalid data: {0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl RepositoryError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, RepositoryError::Unavailable(_))
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_CHECK_VIOLATION: &str = "23514";

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => RepositoryError::Unavailable(err.to_string()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(PG_FOREIGN_KEY_VIOLATION | PG_UNIQUE_VIOLATION | PG_CHECK_VIOLATION) => {
                    RepositoryError::Conflict(db_err.message().to_string())
                }
                _ => RepositoryError::Database(err.to_string()),
            },
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                RepositoryError::Invalid(err.to_string())
            }
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}

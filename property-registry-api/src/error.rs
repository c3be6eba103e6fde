use property_registry_db::RepositoryError;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::DependentSecondary;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("property not found: {0}")]
    NotFound(Uuid),

    /// Delete blocked because the principal still has secondaries
    #[error("property {property_id} has {} dependent secondary properties", dependents.len())]
    HasDependents {
        property_id: Uuid,
        dependents: Vec<DependentSecondary>,
    },

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, ApiError::BackendUnavailable(_))
    }
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(id) => ApiError::NotFound(id),
            RepositoryError::Unavailable(message) => ApiError::BackendUnavailable(message),
            RepositoryError::Conflict(message) => ApiError::Conflict(message),
            RepositoryError::Invalid(message) => ApiError::Validation(message),
            RepositoryError::Database(message) => ApiError::Internal(message),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

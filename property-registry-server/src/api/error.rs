use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use property_registry_api::{ApiError, DependentSecondary};
use serde::{Deserialize, Serialize};

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependents: Option<Vec<DependentSecondary>>,
}

#[derive(Debug)]
pub struct HttpError(pub ApiError);

impl From<ApiError> for HttpError {
    fn from(error: ApiError) -> Self {
        HttpError(error)
    }
}

impl HttpError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::HasDependents { .. } => (StatusCode::CONFLICT, "HAS_DEPENDENTS"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::BackendUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "BACKEND_UNAVAILABLE")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, code, "request failed");
        }

        let message = match &self.0 {
            ApiError::NotFound(_) => "property not found".to_string(),
            other => other.to_string(),
        };
        let dependents = match self.0 {
            ApiError::HasDependents { dependents, .. } => Some(dependents),
            _ => None,
        };

        (
            status,
            Json(ErrorResponse {
                code: code.to_string(),
                message,
                dependents,
            }),
        )
            .into_response()
    }
}

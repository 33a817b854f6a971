//! Error types for the Dealflow workflow server.
//!
//! `AppError` implements `IntoResponse`, so handlers return it directly.
//! Every error body has the shape `{"error": <message>, "status": <code>}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dealflow_engine::{EngineError, StoreError};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Schema introspection query failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Workflow invocation failed before or while recording its execution
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Store error outside of a workflow run
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::Store(StoreError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            AppError::BadRequest(_) | AppError::Store(StoreError::InvalidField(_)) => {
                StatusCode::BAD_REQUEST
            }
            // An invocation that cannot run, including a missing workflow,
            // is a server-side failure for the caller.
            AppError::Engine(_) | AppError::Store(StoreError::Backend(_)) | AppError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_not_found_error() {
        let err = AppError::NotFound("Execution 42".to_string());
        assert_eq!(err.to_string(), "Resource not found: Execution 42");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_workflow_not_found_is_server_error() {
        let err: AppError = EngineError::WorkflowNotFound(Uuid::nil()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Workflow not found: 00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_store_error_status() {
        let err: AppError = StoreError::InvalidField("leads.id".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err: AppError = StoreError::Backend("connection reset".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::BadRequest("limit".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

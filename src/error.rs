//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(String),
}

/// Failures of the storage engine. Lookups that simply find nothing are not
/// errors; they return `Ok(None)`.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage used before reload")]
    Uninitialized,
    #[error("unknown column {column} on {kind}")]
    UnknownColumn { kind: &'static str, column: String },
    #[error("persistence: {0}")]
    Persistence(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Not found")]
    NotFound,
    /// Client error whose message is the response text, e.g. "Missing name".
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Validation(String),
}

impl AppError {
    pub fn missing(field: &str) -> Self {
        AppError::BadRequest(format!("Missing {}", field))
    }

    pub fn not_a_json() -> Self {
        AppError::BadRequest("Not a JSON".into())
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(StorageError::Uninitialized) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Storage(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_is_404_with_message() {
        let response = AppError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, serde_json::json!({"error": "Not found"}));
    }

    #[tokio::test]
    async fn missing_field_is_400() {
        let response = AppError::missing("name").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Missing name");
    }

    #[tokio::test]
    async fn persistence_error_is_500() {
        let err = AppError::from(StorageError::Persistence(sqlx::Error::PoolTimedOut));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn uninitialized_storage_is_503() {
        let err = AppError::from(StorageError::Uninitialized);
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

//! API error taxonomy and response mapping.
//!
//! Every failure a handler can produce maps onto one of these variants,
//! and the `IntoResponse` impl turns them into `{"detail": "..."}` JSON
//! bodies with the corresponding status code. Errors are terminal
//! per-request; there is no retry.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use shelfmark_storage::StorageError;

/// Errors surfaced by the request handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or invalid bearer credential (403).
    #[error("{0}")]
    Authentication(String),

    /// The requested entity does not exist (404).
    #[error("{0}")]
    NotFound(String),

    /// The request conflicts with current state (400).
    #[error("{0}")]
    Conflict(String),

    /// A storage failure bubbled up (500).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Authentication(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            Self::Storage(err) => {
                tracing::error!(error = %err, "request failed on storage");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn authentication_maps_to_403_with_detail() {
        let response = ApiError::authentication("Could not validate credentials").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "Could not validate credentials");
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let response = ApiError::not_found("Author not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "Author not found");
    }

    #[tokio::test]
    async fn conflict_maps_to_400() {
        let response =
            ApiError::conflict("Cannot delete author with associated books").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn storage_errors_map_to_500_without_leaking() {
        let err: ApiError = StorageError::internal("connection reset by peer").into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "Internal server error");
    }
}

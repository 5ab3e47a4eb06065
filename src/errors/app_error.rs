//! Application error type for the primary request paths
//!
//! Failures on the call-creation and webhook-acceptance paths are logged with
//! their full detail server-side and surfaced to the caller as an opaque
//! `500 Internal error`. Upstream error bodies never reach the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Errors raised on the primary request paths
#[derive(Debug, Error)]
pub enum AppError {
    /// Required configuration is missing or unusable
    #[error("configuration error: {0}")]
    Config(String),

    /// The upstream API answered with a non-success status
    #[error("upstream rejected request: status {status}")]
    Upstream { status: StatusCode, detail: String },

    /// The upstream API answered successfully but violated its own contract
    /// (e.g. a create response without a call identifier)
    #[error("upstream protocol error: {0}")]
    UpstreamProtocol(String),

    /// The upstream request itself failed (connect, TLS, timeout)
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A request or response payload could not be serialized
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Full detail stays in the logs; the caller only ever sees the
        // generic error string.
        match &self {
            AppError::Upstream { status, detail } => {
                tracing::error!(status = %status, detail = %detail, "upstream request rejected");
            }
            other => {
                tracing::error!(error = %other, "request failed");
            }
        }
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_upstream_error_is_opaque_to_caller() {
        let err = AppError::Upstream {
            status: StatusCode::BAD_GATEWAY,
            detail: "secret upstream detail".to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"Internal error");
    }

    #[tokio::test]
    async fn test_config_error_maps_to_500() {
        let err = AppError::Config("OPENAI_SIGNING_SECRET not configured".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

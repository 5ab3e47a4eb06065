//! Webhook authentication errors
//!
//! Signature verification is the sole trust boundary in front of the `/sip`
//! endpoint. Every verification failure maps to the same `401 Invalid
//! signature` response so callers learn nothing about which check failed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

/// Errors raised while verifying an inbound webhook
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// A required signature header is absent
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    /// A signature header is present but unusable
    #[error("malformed header: {0}")]
    MalformedHeader(&'static str),

    /// The timestamp is outside the replay tolerance window
    #[error("timestamp outside tolerance window: {0}")]
    StaleTimestamp(i64),

    /// No candidate signature matched the expected HMAC
    #[error("signature mismatch")]
    SignatureMismatch,

    /// The verified body did not contain the expected envelope
    #[error("malformed webhook payload: {0}")]
    MalformedPayload(String),

    /// The configured signing secret could not be decoded
    #[error("invalid signing secret: {0}")]
    InvalidSecret(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "webhook verification failed");
        (StatusCode::UNAUTHORIZED, "Invalid signature").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_all_variants_map_to_401_invalid_signature() {
        let errors = vec![
            AuthError::MissingHeader("webhook-id"),
            AuthError::MalformedHeader("webhook-timestamp"),
            AuthError::StaleTimestamp(0),
            AuthError::SignatureMismatch,
            AuthError::MalformedPayload("missing call_id".to_string()),
        ];
        for err in errors {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body = to_bytes(response.into_body(), 1024).await.unwrap();
            assert_eq!(&body[..], b"Invalid signature");
        }
    }
}

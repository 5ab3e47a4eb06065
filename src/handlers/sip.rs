//! Inbound telephony webhook handler
//!
//! `POST /sip` receives signed inbound-call notifications. The signature
//! check runs before anything else: an unverified request never reaches the
//! upstream. On verified payloads the call is accepted upstream and the
//! observer is triggered in the background.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::auth::{WebhookEnvelope, WebhookVerifier};
use crate::core::realtime::SessionDescriptor;
use crate::errors::app_error::AppError;
use crate::errors::auth_error::AuthError;
use crate::handlers::trigger_observer;
use crate::state::AppState;

/// POST /sip : webhook endpoint for inbound telephony calls
pub async fn accept_inbound_call(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // A missing secret is a deployment fault, not an authentication failure.
    let Some(secret) = state.config.openai_signing_secret.as_deref() else {
        return AppError::Config("OPENAI_SIGNING_SECRET not configured".to_string())
            .into_response();
    };
    let verifier = match WebhookVerifier::new(secret) {
        Ok(v) => v,
        Err(e) => {
            return AppError::Config(format!("unusable signing secret: {e}")).into_response();
        }
    };

    if let Err(e) = verifier.verify(&body, &headers) {
        return e.into_response();
    }

    let envelope: WebhookEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => return AuthError::MalformedPayload(e.to_string()).into_response(),
    };
    let call_id = envelope.data.call_id;
    tracing::info!(call_id = %call_id, "verified webhook");

    let session = SessionDescriptor::build(&state.config.session, state.config.session.video_enabled);
    if let Err(e) = state.realtime.accept_call(&call_id, &session).await {
        return e.into_response();
    }
    tracing::info!(call_id = %call_id, "call accepted");

    // Kick off the observer in the background (fire-and-forget).
    trigger_observer(&state, &call_id);

    StatusCode::OK.into_response()
}

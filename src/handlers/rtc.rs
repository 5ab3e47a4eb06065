//! Call initiation handler
//!
//! `POST /rtc` relays a browser SDP offer to the upstream call-creation
//! endpoint and returns the SDP answer unchanged. On success the observer is
//! triggered in the background; the response never waits for it.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header::CONTENT_TYPE};
use axum::response::Response;

use crate::core::realtime::SessionDescriptor;
use crate::errors::app_error::{AppError, AppResult};
use crate::handlers::trigger_observer;
use crate::state::AppState;

/// POST /rtc : create a new call from an SDP offer
pub async fn create_call(
    State(state): State<Arc<AppState>>,
    sdp_offer: String,
) -> AppResult<Response> {
    let session = SessionDescriptor::build(&state.config.session, state.config.session.video_enabled);
    let created = state.realtime.create_call(sdp_offer, &session).await?;
    tracing::info!(call_id = %created.call_id, "call created");

    // Kick off the observer in the background (fire-and-forget).
    trigger_observer(&state, &created.call_id);

    // Transparent relay: the upstream answer body and content type pass
    // through unmodified.
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, created.content_type)
        .body(Body::from(created.answer))
        .map_err(|e| AppError::UpstreamProtocol(format!("unusable upstream response: {e}")))
}

//! Observer trigger handler
//!
//! `POST /observer/{call_id}` is a self-addressed internal endpoint: the call
//! flows post here after a call is confirmed. It answers immediately; the
//! observer channel continues in the background.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::core::observer::{self, ObserverConfig};
use crate::state::AppState;

/// POST /observer/{call_id} : attach an observer channel to a call
pub async fn attach_observer(
    State(state): State<Arc<AppState>>,
    Path(call_id): Path<String>,
) -> StatusCode {
    let config = ObserverConfig::from_server(&state.config);
    tokio::spawn(observer::attach(call_id, config));

    // Respond immediately; the channel continues in the background.
    StatusCode::OK
}

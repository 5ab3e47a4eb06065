use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{api, observer, rtc, sip};
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router
///
/// # Endpoints
///
/// - `GET /` - health check
/// - `POST /rtc` - create a call from a browser SDP offer
/// - `POST /sip` - signed webhook for inbound telephony calls
/// - `POST /observer/{call_id}` - self-addressed observer trigger
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(api::health_check))
        .route("/rtc", post(rtc::create_call))
        .route("/sip", post(sip::accept_inbound_call))
        .route("/observer/{call_id}", post(observer::attach_observer))
        .layer(TraceLayer::new_for_http())
}

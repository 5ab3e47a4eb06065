pub mod api;
pub mod observer;
pub mod rtc;
pub mod sip;

use crate::state::AppState;

/// Kick off the observer for a call in the background (fire-and-forget).
///
/// Posts to this server's own `/observer/{call_id}` endpoint without
/// awaiting the result. Runs only after the upstream call is confirmed; a
/// trigger failure is logged and never affects the response already being
/// sent.
pub(crate) fn trigger_observer(state: &AppState, call_id: &str) {
    let url = format!("{}/observer/{}", state.config.self_origin(), call_id);
    let http = state.http.clone();
    let call_id = call_id.to_string();
    tokio::spawn(async move {
        match http.post(&url).send().await {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(
                    call_id = %call_id,
                    status = %response.status(),
                    "observer trigger returned non-success status"
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(call_id = %call_id, error = %e, "observer trigger failed");
            }
        }
    });
}

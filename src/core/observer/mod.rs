//! Observer channel: a passive control connection attached to each
//! established call.
//!
//! Per call the attacher opens one outbound WebSocket addressed by call
//! identifier, waits a short settle delay, sends a single `response.create`
//! directive, then consumes inbound events for the lifetime of the
//! connection. It runs as a detached task: no caller waits for it and its
//! failure never affects the HTTP response that triggered it.
//!
//! Channel lifecycle: connecting → open → directive-sent → streaming →
//! closed. The only terminal transition is a remote close or transport error
//! — plus the local lifetime budget, which bounds what would otherwise be an
//! unbounded background connection. There is no retry and no reconnection.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use http::HeaderValue;
use http::header::AUTHORIZATION;
use thiserror::Error;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message, client::IntoClientRequest};

use crate::config::ServerConfig;
use crate::core::realtime::messages::{ClientEvent, ServerEvent};

/// Errors terminating an observer channel before or during streaming.
///
/// These are logged and swallowed by [`attach`]; the observer is best-effort
/// telemetry and has no caller-visible failure signal.
#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("websocket failed: {0}")]
    Transport(#[from] tungstenite::Error),

    #[error("invalid authorization header: {0}")]
    Authorization(#[from] http::header::InvalidHeaderValue),

    #[error("failed to encode directive: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Settings for one observer channel, snapshotted from the server config.
#[derive(Debug, Clone)]
pub struct ObserverConfig {
    /// WebSocket endpoint of the upstream realtime API
    pub ws_url: String,
    pub api_key: String,
    /// Delay between connection open and the initial directive
    pub settle_delay: Duration,
    /// Supervising budget: the channel is dropped once this elapses
    pub max_lifetime: Duration,
}

impl ObserverConfig {
    pub fn from_server(config: &ServerConfig) -> Self {
        Self {
            ws_url: config.realtime_ws_url.clone(),
            api_key: config.openai_api_key.clone(),
            settle_delay: Duration::from_millis(config.observer_settle_delay_ms),
            max_lifetime: Duration::from_secs(config.observer_max_lifetime_secs),
        }
    }
}

/// Attach an observer channel to a call.
///
/// Entry point for the detached task spawned by the `/observer/{call_id}`
/// handler. Errors are logged here and never propagated.
pub async fn attach(call_id: String, config: ObserverConfig) {
    if let Err(e) = run(&call_id, &config).await {
        tracing::error!(call_id = %call_id, error = %e, "observer channel failed");
    }
}

async fn run(call_id: &str, config: &ObserverConfig) -> Result<(), ObserverError> {
    let url = format!("{}?call_id={}", config.ws_url, call_id);
    let mut request = url.into_client_request()?;
    request.headers_mut().insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", config.api_key))?,
    );

    let (ws, _) = connect_async(request).await?;
    tracing::info!(call_id, "observer channel connected");
    let (mut write, mut read) = ws.split();

    // Let the upstream session settle before nudging the model.
    tokio::time::sleep(config.settle_delay).await;
    let directive = serde_json::to_string(&ClientEvent::ResponseCreate)?;
    write.send(Message::Text(directive.into())).await?;
    tracing::debug!(call_id, "response.create directive sent");

    let streaming = async {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => log_event(call_id, text.as_str()),
                Ok(Message::Close(frame)) => {
                    tracing::info!(call_id, frame = ?frame, "observer channel closed by remote");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(call_id, error = %e, "observer channel transport error");
                    break;
                }
            }
        }
    };

    if tokio::time::timeout(config.max_lifetime, streaming)
        .await
        .is_err()
    {
        tracing::warn!(call_id, "observer lifetime budget exhausted, dropping channel");
    }
    Ok(())
}

/// Log one inbound event, keeping high-frequency transcript deltas out of
/// the logs.
fn log_event(call_id: &str, raw: &str) {
    match serde_json::from_str::<ServerEvent>(raw) {
        Ok(event) if event.is_transcript_delta() => {}
        Ok(event) => {
            tracing::info!(call_id, event_type = %event.event_type, payload = %event.payload, "observer event");
        }
        Err(e) => {
            tracing::warn!(call_id, error = %e, "unparseable observer event");
        }
    }
}

//! Realtime WebSocket event types.
//!
//! All events are JSON-encoded and exchanged over the observer channel.
//! Client events are sent to the upstream; server events arrive as a tagged
//! stream of which this service only inspects the `type` field.

use serde::{Deserialize, Serialize};

/// High-frequency assistant transcript chunk, suppressed from observer logs.
pub const EVENT_TRANSCRIPT_DELTA: &str = "response.audio_transcript.delta";

/// Client events sent over the observer channel.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Ask the model to generate a response
    #[serde(rename = "response.create")]
    ResponseCreate,
}

/// A server event, parsed just far enough to dispatch on its type.
///
/// The remaining payload is kept as raw JSON; the observer only logs it.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(flatten)]
    pub payload: serde_json::Value,
}

impl ServerEvent {
    pub fn is_transcript_delta(&self) -> bool {
        self.event_type == EVENT_TRANSCRIPT_DELTA
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_create_wire_format() {
        let json = serde_json::to_string(&ClientEvent::ResponseCreate).unwrap();
        assert_eq!(json, r#"{"type":"response.create"}"#);
    }

    #[test]
    fn test_server_event_type_dispatch() {
        let event: ServerEvent = serde_json::from_str(
            r#"{"type":"response.audio_transcript.delta","delta":"hel","item_id":"item_1"}"#,
        )
        .unwrap();
        assert!(event.is_transcript_delta());
        assert_eq!(event.payload["delta"], "hel");

        let event: ServerEvent =
            serde_json::from_str(r#"{"type":"response.done","response":{}}"#).unwrap();
        assert!(!event.is_transcript_delta());
        assert_eq!(event.event_type, "response.done");
    }
}

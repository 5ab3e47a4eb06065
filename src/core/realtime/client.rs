//! Upstream realtime REST client.
//!
//! Two operations back the call-brokering flows: creating a call from an SDP
//! offer (`POST {base}/realtime/calls`, multipart `sdp` + `session`) and
//! accepting an inbound telephony call
//! (`POST {base}/realtime/calls/{id}/accept`, JSON session body). Non-success
//! responses are captured with their body for logging and surface as
//! [`AppError::Upstream`]; upstream detail never reaches end clients.

use axum::http::header::{CONTENT_TYPE, LOCATION};
use bytes::Bytes;
use reqwest::multipart::Form;

use super::session::SessionDescriptor;
use crate::errors::app_error::{AppError, AppResult};

/// Result of a successful call creation.
#[derive(Debug, Clone)]
pub struct CreatedCall {
    /// Opaque upstream-assigned call identifier
    pub call_id: String,
    /// SDP answer body, relayed byte-for-byte to the original caller
    pub answer: Bytes,
    /// Content type of the answer, relayed unchanged
    pub content_type: String,
}

/// Client for the upstream realtime call endpoints.
#[derive(Debug, Clone)]
pub struct RealtimeApi {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RealtimeApi {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Create a new call from an SDP offer.
    ///
    /// The offer is not validated locally; the upstream rejects unusable
    /// offers and that rejection surfaces as [`AppError::Upstream`].
    pub async fn create_call(
        &self,
        sdp_offer: String,
        session: &SessionDescriptor,
    ) -> AppResult<CreatedCall> {
        let form = Form::new()
            .text("sdp", sdp_offer)
            .text("session", serde_json::to_string(session)?);

        let response = self
            .http
            .post(format!("{}/realtime/calls", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(AppError::Upstream { status, detail });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/sdp")
            .to_string();

        let call_id = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(call_id_from_location)
            .ok_or_else(|| {
                AppError::UpstreamProtocol(
                    "create response carried no call identifier in Location header".to_string(),
                )
            })?;

        let answer = response.bytes().await?;
        Ok(CreatedCall {
            call_id,
            answer,
            content_type,
        })
    }

    /// Accept an inbound telephony call by identifier.
    pub async fn accept_call(&self, call_id: &str, session: &SessionDescriptor) -> AppResult<()> {
        let response = self
            .http
            .post(format!("{}/realtime/calls/{}/accept", self.base_url, call_id))
            .bearer_auth(&self.api_key)
            .json(session)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(AppError::Upstream { status, detail });
        }
        Ok(())
    }
}

/// Extract the call identifier from a location-style header value.
///
/// The upstream returns e.g. `/v1/realtime/calls/call_abc123`; the identifier
/// is the last path segment.
fn call_id_from_location(location: &str) -> Option<String> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

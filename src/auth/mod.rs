//! Webhook signature verification
//!
//! Implements the Standard Webhooks scheme used by the upstream API for
//! inbound-call notifications: an HMAC-SHA256 over `"{id}.{timestamp}.{body}"`
//! keyed with a shared signing secret, carried in the `webhook-id`,
//! `webhook-timestamp` and `webhook-signature` headers. Verification enforces
//! a replay window on the timestamp and compares signatures in constant time.
//!
//! This is the sole trust boundary protecting the `/sip` endpoint from forged
//! or replayed triggers.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::HeaderMap;
use base64::prelude::*;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::errors::auth_error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed skew between the webhook timestamp and local time, in
/// seconds. Applies in both directions.
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

const HEADER_ID: &str = "webhook-id";
const HEADER_TIMESTAMP: &str = "webhook-timestamp";
const HEADER_SIGNATURE: &str = "webhook-signature";

/// Verified webhook envelope carrying the inbound call notification
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    pub data: WebhookCallData,
}

/// Payload data of an inbound-call webhook
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookCallData {
    pub call_id: String,
}

/// Webhook signature verifier keyed with the configured signing secret
pub struct WebhookVerifier {
    key: Vec<u8>,
}

impl WebhookVerifier {
    /// Create a verifier from the configured secret.
    ///
    /// Accepts the `whsec_`-prefixed base64 form issued by the upstream API,
    /// or a raw secret string.
    pub fn new(secret: &str) -> AuthResult<Self> {
        let key = match secret.strip_prefix("whsec_") {
            Some(encoded) => BASE64_STANDARD
                .decode(encoded)
                .map_err(|e| AuthError::InvalidSecret(e.to_string()))?,
            None => secret.as_bytes().to_vec(),
        };
        if key.is_empty() {
            return Err(AuthError::InvalidSecret("secret is empty".to_string()));
        }
        Ok(Self { key })
    }

    /// Verify a webhook request against the current wall clock.
    pub fn verify(&self, body: &[u8], headers: &HeaderMap) -> AuthResult<()> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        self.verify_at(body, headers, now)
    }

    /// Verify a webhook request against an explicit clock reading.
    ///
    /// Checks, in order: presence and well-formedness of the signature
    /// headers, the replay window on the timestamp, and finally the HMAC
    /// itself against every `v1` candidate in the signature header.
    pub fn verify_at(&self, body: &[u8], headers: &HeaderMap, now_secs: i64) -> AuthResult<()> {
        let id = header_str(headers, HEADER_ID)?;
        let timestamp_raw = header_str(headers, HEADER_TIMESTAMP)?;
        let signatures = header_str(headers, HEADER_SIGNATURE)?;

        let timestamp: i64 = timestamp_raw
            .parse()
            .map_err(|_| AuthError::MalformedHeader(HEADER_TIMESTAMP))?;
        if (now_secs - timestamp).abs() > TIMESTAMP_TOLERANCE_SECS {
            return Err(AuthError::StaleTimestamp(timestamp));
        }

        let expected = self.compute_signature(id, timestamp_raw, body);

        // The signature header may carry several space-separated entries
        // (e.g. during secret rotation). Any matching v1 entry passes.
        for candidate in signatures.split_whitespace() {
            let Some(encoded) = candidate.strip_prefix("v1,") else {
                continue;
            };
            let Ok(decoded) = BASE64_STANDARD.decode(encoded) else {
                continue;
            };
            if decoded.ct_eq(&expected).into() {
                return Ok(());
            }
        }
        Err(AuthError::SignatureMismatch)
    }

    /// Produce the `v1,<base64>` signature entry for a payload.
    ///
    /// Counterpart of [`verify_at`](Self::verify_at); used to sign test and
    /// replay payloads with the same key material.
    pub fn sign(&self, id: &str, timestamp: i64, body: &[u8]) -> String {
        let signature = self.compute_signature(id, &timestamp.to_string(), body);
        format!("v1,{}", BASE64_STANDARD.encode(signature))
    }

    fn compute_signature(&self, id: &str, timestamp: &str, body: &[u8]) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC accepts keys of any length");
        mac.update(id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        mac.finalize().into_bytes().to_vec()
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &'static str) -> AuthResult<&'a str> {
    headers
        .get(name)
        .ok_or(AuthError::MissingHeader(name))?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader(name))
}

//! Configuration module for the CallBridge server
//!
//! This module handles server configuration from environment variables
//! (including `.env` values loaded at startup in `main.rs`). The configuration
//! is loaded once at process start and never mutated afterwards; every request
//! handler sees the same immutable snapshot through `AppState`.
//!
//! # Example
//! ```rust,no_run
//! use callbridge::config::ServerConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::env;

/// Default model for realtime call sessions.
pub const DEFAULT_REALTIME_MODEL: &str = "gpt-realtime";

/// Default voice for audio output.
pub const DEFAULT_REALTIME_VOICE: &str = "marin";

/// Default system instructions for call sessions.
pub const DEFAULT_INSTRUCTIONS: &str = "\
You are a friendly realtime voice assistant. Greet the caller in English, \
briefly explain what you can help with, and answer their questions concisely. \
For questions outside your scope, apologize and say you can't help with that.";

/// Default base URL for the upstream REST API.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default WebSocket endpoint for the realtime control channel.
pub const DEFAULT_REALTIME_WS_URL: &str = "wss://api.openai.com/v1/realtime";

/// Default delay before the observer sends its first directive, in milliseconds.
///
/// Gives the upstream session a moment to stabilize after the call is
/// established before asking the model to respond.
pub const DEFAULT_OBSERVER_SETTLE_DELAY_MS: u64 = 250;

/// Default maximum lifetime for one observer channel, in seconds.
pub const DEFAULT_OBSERVER_MAX_LIFETIME_SECS: u64 = 3600;

/// Per-call session defaults (model, voice, instructions, video capability)
///
/// These are configuration, not logic: the session descriptor sent upstream
/// is built fresh per call from this snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDefaults {
    pub model: String,
    pub voice: String,
    pub instructions: String,
    /// Whether new sessions request the video input capability
    pub video_enabled: bool,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            model: DEFAULT_REALTIME_MODEL.to_string(),
            voice: DEFAULT_REALTIME_VOICE.to_string(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            video_enabled: false,
        }
    }
}

/// Server configuration
///
/// Contains all configuration needed to run the CallBridge server, including:
/// - Server settings (host, port, public URL)
/// - Upstream API credential and endpoints
/// - Webhook signing secret (required only for the `/sip` path)
/// - Session defaults (model, voice, instructions, video)
/// - Observer channel tuning (settle delay, lifetime budget)
/// - Security settings (CORS)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,
    /// Externally reachable origin of this server, used for the
    /// self-addressed observer trigger. Defaults to the bind address.
    pub public_url: Option<String>,

    // Upstream API settings
    pub openai_api_key: String,
    /// Shared secret for webhook signature verification. The `/sip` endpoint
    /// refuses all traffic when this is unset.
    pub openai_signing_secret: Option<String>,
    pub openai_api_base: String,
    pub realtime_ws_url: String,

    // Session defaults
    pub session: SessionDefaults,

    // Observer channel settings
    pub observer_settle_delay_ms: u64,
    pub observer_max_lifetime_secs: u64,

    // Security settings
    pub cors_allowed_origins: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// `OPENAI_API_KEY` is required; everything else falls back to defaults.
    /// `.env` files are loaded by `main.rs` before this runs.
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("PORT") {
            Ok(p) => p
                .parse::<u16>()
                .map_err(|e| format!("Invalid PORT value '{p}': {e}"))?,
            Err(_) => 3000,
        };

        let openai_api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| "OPENAI_API_KEY not configured in server environment".to_string())?;

        let session = SessionDefaults {
            model: env::var("REALTIME_MODEL").unwrap_or_else(|_| DEFAULT_REALTIME_MODEL.into()),
            voice: env::var("REALTIME_VOICE").unwrap_or_else(|_| DEFAULT_REALTIME_VOICE.into()),
            instructions: env::var("REALTIME_INSTRUCTIONS")
                .unwrap_or_else(|_| DEFAULT_INSTRUCTIONS.into()),
            video_enabled: parse_bool(env::var("REALTIME_VIDEO_ENABLED").ok().as_deref()),
        };

        Ok(Self {
            host,
            port,
            public_url: env::var("PUBLIC_URL").ok(),
            openai_api_key,
            openai_signing_secret: env::var("OPENAI_SIGNING_SECRET").ok(),
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.into()),
            realtime_ws_url: env::var("OPENAI_REALTIME_WS_URL")
                .unwrap_or_else(|_| DEFAULT_REALTIME_WS_URL.into()),
            session,
            observer_settle_delay_ms: parse_u64(
                env::var("OBSERVER_SETTLE_DELAY_MS").ok().as_deref(),
                DEFAULT_OBSERVER_SETTLE_DELAY_MS,
            )?,
            observer_max_lifetime_secs: parse_u64(
                env::var("OBSERVER_MAX_LIFETIME_SECS").ok().as_deref(),
                DEFAULT_OBSERVER_MAX_LIFETIME_SECS,
            )?,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").ok(),
        })
    }

    /// Get the server address as a string in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The origin used for self-addressed requests (the observer trigger).
    ///
    /// `PUBLIC_URL` wins when configured; otherwise the bind address is
    /// assumed reachable over plain HTTP.
    pub fn self_origin(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }

    /// Check if webhook verification is configured
    pub fn has_signing_secret(&self) -> bool {
        self.openai_signing_secret.is_some()
    }
}

fn parse_bool(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1") | Some("true") | Some("yes") | Some("on")
    )
}

fn parse_u64(value: Option<&str>, default: u64) -> Result<u64, String> {
    match value {
        Some(v) => v
            .parse::<u64>()
            .map_err(|e| format!("Invalid numeric value '{v}': {e}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper function to create a test ServerConfig with defaults
    fn test_config() -> ServerConfig {
        ServerConfig {
            host: "localhost".to_string(),
            port: 3001,
            public_url: None,
            openai_api_key: "test-key".to_string(),
            openai_signing_secret: None,
            openai_api_base: DEFAULT_API_BASE.to_string(),
            realtime_ws_url: DEFAULT_REALTIME_WS_URL.to_string(),
            session: SessionDefaults::default(),
            observer_settle_delay_ms: DEFAULT_OBSERVER_SETTLE_DELAY_MS,
            observer_max_lifetime_secs: DEFAULT_OBSERVER_MAX_LIFETIME_SECS,
            cors_allowed_origins: None,
        }
    }

    #[test]
    fn test_address_format() {
        let config = test_config();
        assert_eq!(config.address(), "localhost:3001");
    }

    #[test]
    fn test_self_origin_defaults_to_bind_address() {
        let config = test_config();
        assert_eq!(config.self_origin(), "http://localhost:3001");
    }

    #[test]
    fn test_self_origin_prefers_public_url() {
        let mut config = test_config();
        config.public_url = Some("https://calls.example.com/".to_string());
        assert_eq!(config.self_origin(), "https://calls.example.com");
    }

    #[test]
    fn test_has_signing_secret() {
        let mut config = test_config();
        assert!(!config.has_signing_secret());
        config.openai_signing_secret = Some("whsec_c2VjcmV0".to_string());
        assert!(config.has_signing_secret());
    }

    #[test]
    fn test_parse_bool_variants() {
        assert!(parse_bool(Some("true")));
        assert!(parse_bool(Some("1")));
        assert!(parse_bool(Some("YES")));
        assert!(!parse_bool(Some("false")));
        assert!(!parse_bool(Some("0")));
        assert!(!parse_bool(None));
    }

    #[test]
    fn test_parse_u64_default_and_error() {
        assert_eq!(parse_u64(None, 250).unwrap(), 250);
        assert_eq!(parse_u64(Some("500"), 250).unwrap(), 500);
        assert!(parse_u64(Some("not-a-number"), 250).is_err());
    }
}

//! Shared application state
//!
//! One immutable snapshot per process: the configuration, a shared HTTP
//! client, and the upstream API client built from both. Handlers hold no
//! other state, so concurrent requests never share anything mutable.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::core::realtime::RealtimeApi;

pub struct AppState {
    pub config: ServerConfig,
    /// Shared HTTP client, also used for the self-addressed observer trigger
    pub http: reqwest::Client,
    pub realtime: RealtimeApi,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let http = reqwest::Client::new();
        let realtime = RealtimeApi::new(
            http.clone(),
            config.openai_api_base.clone(),
            config.openai_api_key.clone(),
        );
        Arc::new(Self {
            config,
            http,
            realtime,
        })
    }
}

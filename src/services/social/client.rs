//! Shared HTTP plumbing for the third-party fetchers

use super::error::SocialError;
use crate::config::SocialConfig;
use reqwest::RequestBuilder;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::RwLock;

const USER_AGENT: &str = concat!("labsite/", env!("CARGO_PKG_VERSION"));

/// Client for GitHub, Google+, Facebook, Twitter and YouTube
///
/// The public fetch methods never fail: network, status and decode errors
/// are logged and turned into an empty list.
pub struct SocialClient {
    pub(super) http: reqwest::Client,
    pub(super) config: SocialConfig,
    /// Twitter application bearer token, fetched on first use
    pub(super) twitter_token: RwLock<Option<String>>,
}

impl SocialClient {
    pub fn new(config: SocialConfig) -> Result<Self, SocialError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            config,
            twitter_token: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &SocialConfig {
        &self.config
    }

    /// Send a request and decode the JSON body of a successful response
    pub(super) async fn send_json(&self, request: RequestBuilder) -> Result<Value, SocialError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SocialError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Take the array stored under `field`
pub(super) fn take_array(mut body: Value, field: &str) -> Result<Vec<Value>, SocialError> {
    match body.get_mut(field).map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(SocialError::UnexpectedResponse(format!(
            "missing '{}' array",
            field
        ))),
    }
}

/// Log a failed fetch and substitute an empty result
pub(super) fn absorb(source: &'static str, err: SocialError) -> Vec<Value> {
    tracing::warn!(source, error = %err, "Social feed fetch failed");
    Vec::new()
}

/// Join a configured base URL and a path without doubling the slash
pub(super) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

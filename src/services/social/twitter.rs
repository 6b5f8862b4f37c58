//! Twitter user timeline
//!
//! Uses application-only auth: the consumer key and secret are exchanged
//! once for a bearer token, which is kept for the life of the process.

use super::client::{absorb, endpoint, SocialClient};
use super::error::SocialError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;

impl SocialClient {
    /// Most recent tweets of `screen_name`, at most `count`
    pub async fn twitter_feed(&self, screen_name: &str, count: u32) -> Vec<Value> {
        self.fetch_twitter_feed(screen_name, count)
            .await
            .unwrap_or_else(|err| absorb("twitter", err))
    }

    async fn fetch_twitter_feed(
        &self,
        screen_name: &str,
        count: u32,
    ) -> Result<Vec<Value>, SocialError> {
        let token = self.twitter_bearer_token().await?;

        let url = endpoint(&self.config.twitter_api, "1.1/statuses/user_timeline.json");
        let request = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(&[("screen_name", screen_name.to_string()), ("count", count.to_string())]);

        match self.send_json(request).await? {
            Value::Array(tweets) => Ok(tweets),
            other => Err(SocialError::UnexpectedResponse(format!(
                "timeline is not an array: {}",
                other
            ))),
        }
    }

    /// Cached bearer token, requested from Twitter when not yet known
    async fn twitter_bearer_token(&self) -> Result<String, SocialError> {
        if let Some(token) = self.twitter_token.read().await.as_ref() {
            return Ok(token.clone());
        }

        let mut slot = self.twitter_token.write().await;
        // Another request may have filled the slot while we waited
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }

        let token = self.request_twitter_bearer_token().await?;
        *slot = Some(token.clone());
        tracing::info!("Obtained Twitter bearer token");
        Ok(token)
    }

    async fn request_twitter_bearer_token(&self) -> Result<String, SocialError> {
        let credentials = STANDARD.encode(format!(
            "{}:{}",
            self.config.twitter_consumer_key, self.config.twitter_consumer_secret
        ));
        let url = endpoint(&self.config.twitter_api, "oauth2/token");
        let request = self
            .http
            .post(url)
            .header(AUTHORIZATION, format!("Basic {}", credentials))
            .form(&[("grant_type", "client_credentials")]);

        let body = self.send_json(request).await?;
        match body.get("access_token").and_then(Value::as_str) {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(SocialError::UnexpectedResponse(
                "token response has no access_token".to_string(),
            )),
        }
    }
}

//! Social media feeds
//!
//! Thin clients for GitHub, Google+, Facebook, Twitter and YouTube. Fetch
//! failures never reach the caller; they are logged and yield an empty
//! list. Non-empty results are cached for the configured TTL.

mod client;
pub mod error;
mod facebook;
mod github;
mod google_plus;
mod twitter;
mod youtube;

pub use client::SocialClient;
pub use error::SocialError;

use crate::cache::{CacheLayer, MemoryCache};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Cache key prefix shared by every social feed entry
pub const CACHE_PREFIX: &str = "social:";

/// Which third-party feed to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialSource {
    GooglePlus,
    Facebook,
    Twitter,
    YouTube,
}

impl SocialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GooglePlus => "google-plus",
            Self::Facebook => "facebook",
            Self::Twitter => "twitter",
            Self::YouTube => "youtube",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "google-plus" => Some(Self::GooglePlus),
            "facebook" => Some(Self::Facebook),
            "twitter" => Some(Self::Twitter),
            "youtube" => Some(Self::YouTube),
            _ => None,
        }
    }
}

/// Cached access to the social feeds and the GitHub permission check
pub struct SocialFeedService {
    client: Arc<SocialClient>,
    cache: Arc<MemoryCache>,
}

impl SocialFeedService {
    pub fn new(client: Arc<SocialClient>, cache: Arc<MemoryCache>) -> Self {
        Self { client, cache }
    }

    /// Items of one feed; `account` is the user, page, screen name or channel
    pub async fn feed(&self, source: SocialSource, account: &str, count: u32) -> Vec<Value> {
        let client = &self.client;
        match source {
            SocialSource::GooglePlus => {
                self.cached(source, account, count, client.google_plus_activity(account, count))
                    .await
            }
            SocialSource::Facebook => {
                self.cached(source, account, count, client.facebook_page_feed(account, count))
                    .await
            }
            SocialSource::Twitter => {
                self.cached(source, account, count, client.twitter_feed(account, count))
                    .await
            }
            SocialSource::YouTube => {
                self.cached(source, account, count, client.youtube_videos(account, count))
                    .await
            }
        }
    }

    /// Whether the token grants access to the configured admin repository
    pub async fn has_commit_permission(&self, token: &str) -> bool {
        let repository = &self.client.config().repository_name;
        self.client.has_commit_permission(token, repository).await
    }

    /// Drop every cached feed, returning how many entries were removed
    pub async fn flush(&self) -> anyhow::Result<usize> {
        let removed = self.cache.delete_prefix(CACHE_PREFIX).await?;
        tracing::info!(removed, "Flushed social feed cache");
        Ok(removed)
    }

    async fn cached<F>(&self, source: SocialSource, account: &str, count: u32, fetch: F) -> Vec<Value>
    where
        F: Future<Output = Vec<Value>>,
    {
        let key = format!("{}{}:{}:{}", CACHE_PREFIX, source.as_str(), account, count);

        match self.cache.get::<Vec<Value>>(&key).await {
            Ok(Some(items)) => {
                tracing::debug!(key = %key, "Social feed cache hit");
                return items;
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(key = %key, error = %err, "Failed to read social feed cache"),
        }

        let items = fetch.await;
        if !items.is_empty() {
            if let Err(err) = self.cache.set(&key, &items).await {
                tracing::warn!(key = %key, error = %err, "Failed to cache social feed");
            }
        }
        items
    }
}

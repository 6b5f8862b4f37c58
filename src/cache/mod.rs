//! Cache layer
//!
//! In-process cache for data that is expensive to obtain, chiefly the
//! responses of third-party social APIs. Entries expire after the configured
//! TTL.
//!
//! ```rust,ignore
//! use labsite::cache::{create_cache, CacheLayer};
//! use labsite::config::CacheConfig;
//!
//! let cache = create_cache(&CacheConfig::default());
//! cache.set("social:twitter:lab:5", &tweets).await?;
//! ```

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheConfig;

pub use memory::MemoryCache;

#[async_trait]
pub trait CacheLayer: Send + Sync {
    /// Get a value from cache
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>>;

    /// Set a value; it lives for the cache-wide TTL
    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T) -> Result<()>;

    /// Delete every key starting with `prefix`, returning how many were removed
    async fn delete_prefix(&self, prefix: &str) -> Result<usize>;
}

/// Create the process-wide cache from configuration
pub fn create_cache(config: &CacheConfig) -> Arc<MemoryCache> {
    Arc::new(MemoryCache::with_capacity_and_ttl(
        config.max_capacity,
        Duration::from_secs(config.ttl_seconds),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_cache_from_config() {
        let cache = create_cache(&CacheConfig::default());

        cache.set("numbers", &vec![1, 2, 3]).await.unwrap();
        let result: Option<Vec<i32>> = cache.get("numbers").await.unwrap();
        assert_eq!(result, Some(vec![1, 2, 3]));
        assert_eq!(cache.default_ttl(), Duration::from_secs(600));
    }
}

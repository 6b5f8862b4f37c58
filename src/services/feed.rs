//! Feed aggregation
//!
//! Merges blog posts, events and publications into one feed ordered by
//! creation time, newest first. The "news" feed and the "highlights" feed
//! are both built on [`aggregate`]; the repositories only pre-filter.

use crate::db::repositories::{BlogPostRepository, EventPostRepository, PublicationRepository};
use crate::models::{BlogPost, ContentItem, EventPost};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;

/// Merge content collections into a single feed
///
/// Items are ordered by `created_at` descending. The sort is stable, so items
/// with equal timestamps keep the order in which the collections yielded
/// them. With `Some(limit)` the feed is truncated to at most `limit` items;
/// `None` returns everything.
pub fn aggregate<C>(collections: C, limit: Option<usize>) -> Vec<ContentItem>
where
    C: IntoIterator,
    C::Item: IntoIterator<Item = ContentItem>,
{
    let mut items: Vec<ContentItem> = collections.into_iter().flatten().collect();
    items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

/// Aggregate only the highlighted items of the given collections
///
/// Callers normally pass collections already filtered by the repository;
/// the flag is checked again here so a stale or unfiltered input can never
/// leak a non-highlighted item.
pub fn select_highlights<C>(collections: C, limit: Option<usize>) -> Vec<ContentItem>
where
    C: IntoIterator,
    C::Item: IntoIterator<Item = ContentItem>,
{
    let highlighted = collections
        .into_iter()
        .flatten()
        .filter(ContentItem::is_highlighted);
    aggregate([highlighted], limit)
}

/// Read-only feeds over the content repositories
pub struct FeedService {
    blog_repo: Arc<dyn BlogPostRepository>,
    event_repo: Arc<dyn EventPostRepository>,
    publication_repo: Arc<dyn PublicationRepository>,
}

impl FeedService {
    pub fn new(
        blog_repo: Arc<dyn BlogPostRepository>,
        event_repo: Arc<dyn EventPostRepository>,
        publication_repo: Arc<dyn PublicationRepository>,
    ) -> Self {
        Self {
            blog_repo,
            event_repo,
            publication_repo,
        }
    }

    /// Lab blog posts and events that have not ended yet, newest first
    pub async fn news_posts(&self, limit: Option<usize>) -> Result<Vec<ContentItem>> {
        let posts = self
            .blog_repo
            .list_visible(limit.map(to_sql_limit))
            .await
            .context("Failed to load blog posts for news feed")?;
        let now = Utc::now();
        let events = self
            .event_repo
            .list_not_ended(now)
            .await
            .context("Failed to load events for news feed")?;

        let feed = aggregate(
            [
                posts.into_iter().map(ContentItem::from).collect::<Vec<_>>(),
                events
                    .into_iter()
                    .filter(|e| !e.has_ended(now))
                    .map(ContentItem::from)
                    .collect(),
            ],
            limit,
        );
        tracing::debug!(count = feed.len(), ?limit, "Built news feed");
        Ok(feed)
    }

    /// Highlighted blog posts, events and publications, newest first
    pub async fn highlights(&self, limit: Option<usize>) -> Result<Vec<ContentItem>> {
        let posts = self.blog_repo.list_highlighted().await?;
        let events = self.event_repo.list_highlighted().await?;
        let publications = self.publication_repo.list_highlighted().await?;

        Ok(select_highlights(
            [
                posts.into_iter().map(ContentItem::from).collect::<Vec<_>>(),
                events.into_iter().map(ContentItem::from).collect(),
                publications.into_iter().map(ContentItem::from).collect(),
            ],
            limit,
        ))
    }

    pub async fn latest_blog_posts(&self, limit: Option<usize>) -> Result<Vec<BlogPost>> {
        self.blog_repo.list_visible(limit.map(to_sql_limit)).await
    }

    pub async fn latest_event_posts(&self, limit: Option<usize>) -> Result<Vec<EventPost>> {
        self.event_repo.list(limit.map(to_sql_limit)).await
    }
}

fn to_sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

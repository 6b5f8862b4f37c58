//! Event post repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::EventPost;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::sync::Arc;

use super::{mysql, sqlite, NO_LIMIT};

#[async_trait]
pub trait EventPostRepository: Send + Sync {
    async fn create(&self, event: &EventPost) -> Result<EventPost>;
    async fn get_by_id(&self, id: i64) -> Result<Option<EventPost>>;
    async fn get_by_identifier(&self, identifier: &str) -> Result<Option<EventPost>>;
    async fn get_by_title(&self, title: &str) -> Result<Option<EventPost>>;
    /// All events, newest first
    async fn list(&self, limit: Option<i64>) -> Result<Vec<EventPost>>;
    /// Events that have no end date or end at or after `now`, newest first
    async fn list_not_ended(&self, now: DateTime<Utc>) -> Result<Vec<EventPost>>;
    async fn list_highlighted(&self) -> Result<Vec<EventPost>>;
    async fn update(&self, event: &EventPost) -> Result<EventPost>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct SqlxEventPostRepository {
    pool: DynDatabasePool,
}

impl SqlxEventPostRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn EventPostRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_COLUMNS: &str = "SELECT id, title, identifier, description, body, location, start_date, end_date, is_highlighted, created_at, updated_at FROM event_posts";
const NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

#[async_trait]
impl EventPostRepository for SqlxEventPostRepository {
    async fn create(&self, event: &EventPost) -> Result<EventPost> {
        let sql = "INSERT INTO event_posts (title, identifier, description, body, location, start_date, end_date, is_highlighted, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .bind(&event.title)
                .bind(&event.identifier)
                .bind(&event.description)
                .bind(&event.body)
                .bind(&event.location)
                .bind(event.start_date)
                .bind(event.end_date)
                .bind(event.is_highlighted)
                .bind(event.created_at)
                .bind(event.updated_at)
                .execute(sqlite(&self.pool)?)
                .await
                .context("Failed to create event")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .bind(&event.title)
                .bind(&event.identifier)
                .bind(&event.description)
                .bind(&event.body)
                .bind(&event.location)
                .bind(event.start_date)
                .bind(event.end_date)
                .bind(event.is_highlighted)
                .bind(event.created_at)
                .bind(event.updated_at)
                .execute(mysql(&self.pool)?)
                .await
                .context("Failed to create event")?
                .last_insert_id() as i64,
        };
        Ok(EventPost { id, ..event.clone() })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<EventPost>> {
        let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(&sql)
                .bind(id)
                .fetch_optional(sqlite(&self.pool)?)
                .await
                .context("Failed to get event")?
                .map(|r| row_to_event_sqlite(&r))
                .transpose(),
            DatabaseDriver::Mysql => sqlx::query(&sql)
                .bind(id)
                .fetch_optional(mysql(&self.pool)?)
                .await
                .context("Failed to get event")?
                .map(|r| row_to_event_mysql(&r))
                .transpose(),
        }
    }

    async fn get_by_identifier(&self, identifier: &str) -> Result<Option<EventPost>> {
        self.fetch_by_text("identifier", identifier).await
    }

    async fn get_by_title(&self, title: &str) -> Result<Option<EventPost>> {
        self.fetch_by_text("title", title).await
    }

    async fn list(&self, limit: Option<i64>) -> Result<Vec<EventPost>> {
        let sql = format!("{} {} LIMIT ?", SELECT_COLUMNS, NEWEST_FIRST);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(&sql)
                    .bind(limit.unwrap_or(NO_LIMIT))
                    .fetch_all(sqlite(&self.pool)?)
                    .await
                    .context("Failed to list events")?;
                rows.iter().map(row_to_event_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(&sql)
                    .bind(limit.unwrap_or(NO_LIMIT))
                    .fetch_all(mysql(&self.pool)?)
                    .await
                    .context("Failed to list events")?;
                rows.iter().map(row_to_event_mysql).collect()
            }
        }
    }

    async fn list_not_ended(&self, now: DateTime<Utc>) -> Result<Vec<EventPost>> {
        let sql = format!(
            "{} WHERE end_date IS NULL OR end_date >= ? {}",
            SELECT_COLUMNS, NEWEST_FIRST
        );
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(&sql)
                    .bind(now)
                    .fetch_all(sqlite(&self.pool)?)
                    .await
                    .context("Failed to list current events")?;
                rows.iter().map(row_to_event_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(&sql)
                    .bind(now)
                    .fetch_all(mysql(&self.pool)?)
                    .await
                    .context("Failed to list current events")?;
                rows.iter().map(row_to_event_mysql).collect()
            }
        }
    }

    async fn list_highlighted(&self) -> Result<Vec<EventPost>> {
        let sql = format!("{} WHERE is_highlighted = 1 {}", SELECT_COLUMNS, NEWEST_FIRST);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(&sql)
                    .fetch_all(sqlite(&self.pool)?)
                    .await
                    .context("Failed to list highlighted events")?;
                rows.iter().map(row_to_event_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(&sql)
                    .fetch_all(mysql(&self.pool)?)
                    .await
                    .context("Failed to list highlighted events")?;
                rows.iter().map(row_to_event_mysql).collect()
            }
        }
    }

    async fn update(&self, event: &EventPost) -> Result<EventPost> {
        let sql = "UPDATE event_posts SET title = ?, identifier = ?, description = ?, body = ?, location = ?, start_date = ?, end_date = ?, is_highlighted = ?, updated_at = ? WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(&event.title)
                    .bind(&event.identifier)
                    .bind(&event.description)
                    .bind(&event.body)
                    .bind(&event.location)
                    .bind(event.start_date)
                    .bind(event.end_date)
                    .bind(event.is_highlighted)
                    .bind(event.updated_at)
                    .bind(event.id)
                    .execute(sqlite(&self.pool)?)
                    .await
                    .context("Failed to update event")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(&event.title)
                    .bind(&event.identifier)
                    .bind(&event.description)
                    .bind(&event.body)
                    .bind(&event.location)
                    .bind(event.start_date)
                    .bind(event.end_date)
                    .bind(event.is_highlighted)
                    .bind(event.updated_at)
                    .bind(event.id)
                    .execute(mysql(&self.pool)?)
                    .await
                    .context("Failed to update event")?;
            }
        }
        self.get_by_id(event.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Event not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.pool
            .execute(&format!("DELETE FROM event_posts WHERE id = {}", id))
            .await
            .context("Failed to delete event")?;
        Ok(())
    }
}

impl SqlxEventPostRepository {
    async fn fetch_by_text(&self, column: &str, value: &str) -> Result<Option<EventPost>> {
        let sql = format!("{} WHERE {} = ?", SELECT_COLUMNS, column);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(&sql)
                .bind(value)
                .fetch_optional(sqlite(&self.pool)?)
                .await
                .with_context(|| format!("Failed to get event by {}", column))?
                .map(|r| row_to_event_sqlite(&r))
                .transpose(),
            DatabaseDriver::Mysql => sqlx::query(&sql)
                .bind(value)
                .fetch_optional(mysql(&self.pool)?)
                .await
                .with_context(|| format!("Failed to get event by {}", column))?
                .map(|r| row_to_event_mysql(&r))
                .transpose(),
        }
    }
}

fn row_to_event_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<EventPost> {
    Ok(EventPost {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        identifier: row.try_get("identifier")?,
        description: row.try_get("description")?,
        body: row.try_get("body")?,
        location: row.try_get("location")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        is_highlighted: row.try_get("is_highlighted")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_event_mysql(row: &sqlx::mysql::MySqlRow) -> Result<EventPost> {
    Ok(EventPost {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        identifier: row.try_get("identifier")?,
        description: row.try_get("description")?,
        body: row.try_get("body")?,
        location: row.try_get("location")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        is_highlighted: row.try_get("is_highlighted")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use chrono::Duration;

    async fn setup_repo() -> Arc<dyn EventPostRepository> {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool).await.expect("Failed to run migrations");
        SqlxEventPostRepository::boxed(pool)
    }

    fn event(title: &str, end_in_days: Option<i64>) -> EventPost {
        let now = Utc::now();
        let mut event = EventPost::new(title.into(), title.to_lowercase(), now - Duration::days(10));
        event.end_date = end_in_days.map(|d| now + Duration::days(d));
        event
    }

    #[tokio::test]
    async fn test_list_not_ended_excludes_past_events() {
        let repo = setup_repo().await;
        repo.create(&event("Past", Some(-1))).await.unwrap();
        repo.create(&event("Upcoming", Some(2))).await.unwrap();
        repo.create(&event("Open", None)).await.unwrap();

        let current = repo.list_not_ended(Utc::now()).await.unwrap();
        let mut titles: Vec<String> = current.into_iter().map(|e| e.title).collect();
        titles.sort();
        assert_eq!(titles, vec!["Open", "Upcoming"]);
        assert_eq!(repo.list(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_optional_fields_round_trip() {
        let repo = setup_repo().await;
        let mut e = event("Summit", Some(1));
        e.location = Some("Room 101".into());
        e.is_highlighted = true;

        let created = repo.create(&e).await.unwrap();
        let found = repo.get_by_identifier("summit").await.unwrap().unwrap();

        assert_eq!(found.id, created.id);
        assert_eq!(found.location.as_deref(), Some("Room 101"));
        assert!(found.end_date.is_some());
        assert_eq!(repo.list_highlighted().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_clears_end_date() {
        let repo = setup_repo().await;
        let mut created = repo.create(&event("Sprint", Some(-3))).await.unwrap();
        created.end_date = None;

        let updated = repo.update(&created).await.unwrap();
        assert!(updated.end_date.is_none());

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}

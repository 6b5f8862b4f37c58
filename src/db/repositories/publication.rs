//! Publication repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{EntryType, Publication};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

use super::{mysql, sqlite};

#[async_trait]
pub trait PublicationRepository: Send + Sync {
    async fn create(&self, publication: &Publication) -> Result<Publication>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Publication>>;
    /// All publications, most recent year first
    async fn list(&self) -> Result<Vec<Publication>>;
    async fn list_highlighted(&self) -> Result<Vec<Publication>>;
    async fn update(&self, publication: &Publication) -> Result<Publication>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct SqlxPublicationRepository {
    pool: DynDatabasePool,
}

impl SqlxPublicationRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PublicationRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_COLUMNS: &str = "SELECT id, title, authors, venue, year, url, entry_type, is_highlighted, created_at, updated_at FROM publications";

#[async_trait]
impl PublicationRepository for SqlxPublicationRepository {
    async fn create(&self, publication: &Publication) -> Result<Publication> {
        let sql = "INSERT INTO publications (title, authors, venue, year, url, entry_type, is_highlighted, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";
        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .bind(&publication.title)
                .bind(&publication.authors)
                .bind(&publication.venue)
                .bind(publication.year)
                .bind(&publication.url)
                .bind(publication.entry_type.to_string())
                .bind(publication.is_highlighted)
                .bind(publication.created_at)
                .bind(publication.updated_at)
                .execute(sqlite(&self.pool)?)
                .await
                .context("Failed to create publication")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .bind(&publication.title)
                .bind(&publication.authors)
                .bind(&publication.venue)
                .bind(publication.year)
                .bind(&publication.url)
                .bind(publication.entry_type.to_string())
                .bind(publication.is_highlighted)
                .bind(publication.created_at)
                .bind(publication.updated_at)
                .execute(mysql(&self.pool)?)
                .await
                .context("Failed to create publication")?
                .last_insert_id() as i64,
        };
        Ok(Publication { id, ..publication.clone() })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Publication>> {
        let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(&sql)
                .bind(id)
                .fetch_optional(sqlite(&self.pool)?)
                .await
                .context("Failed to get publication")?
                .map(|r| row_to_publication_sqlite(&r))
                .transpose(),
            DatabaseDriver::Mysql => sqlx::query(&sql)
                .bind(id)
                .fetch_optional(mysql(&self.pool)?)
                .await
                .context("Failed to get publication")?
                .map(|r| row_to_publication_mysql(&r))
                .transpose(),
        }
    }

    async fn list(&self) -> Result<Vec<Publication>> {
        self.fetch_all(&format!("{} ORDER BY year DESC, created_at DESC", SELECT_COLUMNS))
            .await
    }

    async fn list_highlighted(&self) -> Result<Vec<Publication>> {
        self.fetch_all(&format!(
            "{} WHERE is_highlighted = 1 ORDER BY created_at DESC, id DESC",
            SELECT_COLUMNS
        ))
        .await
    }

    async fn update(&self, publication: &Publication) -> Result<Publication> {
        let sql = "UPDATE publications SET title = ?, authors = ?, venue = ?, year = ?, url = ?, entry_type = ?, is_highlighted = ?, updated_at = ? WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(&publication.title)
                    .bind(&publication.authors)
                    .bind(&publication.venue)
                    .bind(publication.year)
                    .bind(&publication.url)
                    .bind(publication.entry_type.to_string())
                    .bind(publication.is_highlighted)
                    .bind(publication.updated_at)
                    .bind(publication.id)
                    .execute(sqlite(&self.pool)?)
                    .await
                    .context("Failed to update publication")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(&publication.title)
                    .bind(&publication.authors)
                    .bind(&publication.venue)
                    .bind(publication.year)
                    .bind(&publication.url)
                    .bind(publication.entry_type.to_string())
                    .bind(publication.is_highlighted)
                    .bind(publication.updated_at)
                    .bind(publication.id)
                    .execute(mysql(&self.pool)?)
                    .await
                    .context("Failed to update publication")?;
            }
        }
        self.get_by_id(publication.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Publication not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.pool
            .execute(&format!("DELETE FROM publications WHERE id = {}", id))
            .await
            .context("Failed to delete publication")?;
        Ok(())
    }
}

impl SqlxPublicationRepository {
    async fn fetch_all(&self, sql: &str) -> Result<Vec<Publication>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(sql)
                    .fetch_all(sqlite(&self.pool)?)
                    .await
                    .context("Failed to list publications")?;
                rows.iter().map(row_to_publication_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(sql)
                    .fetch_all(mysql(&self.pool)?)
                    .await
                    .context("Failed to list publications")?;
                rows.iter().map(row_to_publication_mysql).collect()
            }
        }
    }
}

fn parse_entry_type(raw: &str) -> EntryType {
    raw.parse().unwrap_or_else(|_| {
        tracing::warn!(entry_type = raw, "Unknown publication entry type, using default");
        EntryType::default()
    })
}

fn row_to_publication_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Publication> {
    let entry_type: String = row.try_get("entry_type")?;
    Ok(Publication {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        authors: row.try_get("authors")?,
        venue: row.try_get("venue")?,
        year: row.try_get("year")?,
        url: row.try_get("url")?,
        entry_type: parse_entry_type(&entry_type),
        is_highlighted: row.try_get("is_highlighted")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_publication_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Publication> {
    let entry_type: String = row.try_get("entry_type")?;
    Ok(Publication {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        authors: row.try_get("authors")?,
        venue: row.try_get("venue")?,
        year: row.try_get("year")?,
        url: row.try_get("url")?,
        entry_type: parse_entry_type(&entry_type),
        is_highlighted: row.try_get("is_highlighted")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

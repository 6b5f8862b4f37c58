//! Website section repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{SectionType, WebsiteSection};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

use super::{mysql, sqlite};

#[async_trait]
pub trait SectionRepository: Send + Sync {
    async fn create(&self, section: &WebsiteSection) -> Result<WebsiteSection>;
    async fn get_by_id(&self, id: i64) -> Result<Option<WebsiteSection>>;
    async fn get_by_position_id(&self, position_id: &str) -> Result<Option<WebsiteSection>>;
    async fn list(&self) -> Result<Vec<WebsiteSection>>;
    /// Sections flagged `show_in_nav`, in navigation order
    async fn list_nav(&self) -> Result<Vec<WebsiteSection>>;
    async fn update(&self, section: &WebsiteSection) -> Result<WebsiteSection>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct SqlxSectionRepository {
    pool: DynDatabasePool,
}

impl SqlxSectionRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SectionRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, title, website_position_id, section_type, body, show_in_nav, sort_order FROM website_sections";

#[async_trait]
impl SectionRepository for SqlxSectionRepository {
    async fn create(&self, section: &WebsiteSection) -> Result<WebsiteSection> {
        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(sqlite(&self.pool)?, section).await?,
            DatabaseDriver::Mysql => create_mysql(mysql(&self.pool)?, section).await?,
        };
        Ok(WebsiteSection { id, ..section.clone() })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<WebsiteSection>> {
        let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(sqlite(&self.pool)?)
                    .await
                    .context("Failed to get section")?;
                row.map(|r| row_to_section_sqlite(&r)).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(mysql(&self.pool)?)
                    .await
                    .context("Failed to get section")?;
                row.map(|r| row_to_section_mysql(&r)).transpose()
            }
        }
    }

    async fn get_by_position_id(&self, position_id: &str) -> Result<Option<WebsiteSection>> {
        let sql = format!("{} WHERE website_position_id = ?", SELECT_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(position_id)
                    .fetch_optional(sqlite(&self.pool)?)
                    .await
                    .context("Failed to get section by position id")?;
                row.map(|r| row_to_section_sqlite(&r)).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(position_id)
                    .fetch_optional(mysql(&self.pool)?)
                    .await
                    .context("Failed to get section by position id")?;
                row.map(|r| row_to_section_mysql(&r)).transpose()
            }
        }
    }

    async fn list(&self) -> Result<Vec<WebsiteSection>> {
        let sql = format!("{} ORDER BY sort_order, id", SELECT_COLUMNS);
        self.fetch_all(&sql).await
    }

    async fn list_nav(&self) -> Result<Vec<WebsiteSection>> {
        let sql = format!("{} WHERE show_in_nav = 1 ORDER BY sort_order, id", SELECT_COLUMNS);
        self.fetch_all(&sql).await
    }

    async fn update(&self, section: &WebsiteSection) -> Result<WebsiteSection> {
        let sql = "UPDATE website_sections SET title = ?, website_position_id = ?, section_type = ?, body = ?, show_in_nav = ?, sort_order = ? WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(&section.title)
                    .bind(&section.website_position_id)
                    .bind(section.section_type.to_string())
                    .bind(&section.body)
                    .bind(section.show_in_nav)
                    .bind(section.sort_order)
                    .bind(section.id)
                    .execute(sqlite(&self.pool)?)
                    .await
                    .context("Failed to update section")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(&section.title)
                    .bind(&section.website_position_id)
                    .bind(section.section_type.to_string())
                    .bind(&section.body)
                    .bind(section.show_in_nav)
                    .bind(section.sort_order)
                    .bind(section.id)
                    .execute(mysql(&self.pool)?)
                    .await
                    .context("Failed to update section")?;
            }
        }
        self.get_by_id(section.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Section not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.pool
            .execute(&format!("DELETE FROM website_sections WHERE id = {}", id))
            .await
            .context("Failed to delete section")?;
        Ok(())
    }
}

impl SqlxSectionRepository {
    async fn fetch_all(&self, sql: &str) -> Result<Vec<WebsiteSection>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(sql)
                    .fetch_all(sqlite(&self.pool)?)
                    .await
                    .context("Failed to list sections")?;
                rows.iter().map(row_to_section_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(sql)
                    .fetch_all(mysql(&self.pool)?)
                    .await
                    .context("Failed to list sections")?;
                rows.iter().map(row_to_section_mysql).collect()
            }
        }
    }
}

const INSERT_SQL: &str = "INSERT INTO website_sections (title, website_position_id, section_type, body, show_in_nav, sort_order) VALUES (?, ?, ?, ?, ?, ?)";

fn parse_section_type(raw: &str) -> SectionType {
    raw.parse().unwrap_or_else(|_| {
        tracing::warn!(section_type = raw, "Unknown section type, using default");
        SectionType::default()
    })
}

// SQLite implementations
async fn create_sqlite(pool: &SqlitePool, section: &WebsiteSection) -> Result<i64> {
    let result = sqlx::query(INSERT_SQL)
        .bind(&section.title)
        .bind(&section.website_position_id)
        .bind(section.section_type.to_string())
        .bind(&section.body)
        .bind(section.show_in_nav)
        .bind(section.sort_order)
        .execute(pool)
        .await
        .context("Failed to create section")?;
    Ok(result.last_insert_rowid())
}

fn row_to_section_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<WebsiteSection> {
    let section_type: String = row.try_get("section_type")?;
    Ok(WebsiteSection {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        website_position_id: row.try_get("website_position_id")?,
        section_type: parse_section_type(&section_type),
        body: row.try_get("body")?,
        show_in_nav: row.try_get("show_in_nav")?,
        sort_order: row.try_get("sort_order")?,
    })
}

// MySQL implementations
async fn create_mysql(pool: &MySqlPool, section: &WebsiteSection) -> Result<i64> {
    let result = sqlx::query(INSERT_SQL)
        .bind(&section.title)
        .bind(&section.website_position_id)
        .bind(section.section_type.to_string())
        .bind(&section.body)
        .bind(section.show_in_nav)
        .bind(section.sort_order)
        .execute(pool)
        .await
        .context("Failed to create section")?;
    Ok(result.last_insert_id() as i64)
}

fn row_to_section_mysql(row: &sqlx::mysql::MySqlRow) -> Result<WebsiteSection> {
    let section_type: String = row.try_get("section_type")?;
    Ok(WebsiteSection {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        website_position_id: row.try_get("website_position_id")?,
        section_type: parse_section_type(&section_type),
        body: row.try_get("body")?,
        show_in_nav: row.try_get("show_in_nav")?,
        sort_order: row.try_get("sort_order")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_repo() -> Arc<dyn SectionRepository> {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool).await.expect("Failed to run migrations");
        SqlxSectionRepository::boxed(pool)
    }

    #[tokio::test]
    async fn test_get_by_position_id_returns_none_when_missing() {
        let repo = setup_repo().await;
        assert!(repo.get_by_position_id("nowhere").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_and_lookup_by_position_id() {
        let repo = setup_repo().await;
        let mut section = WebsiteSection::new("About".into(), "about".into(), SectionType::Fixed);
        section.body = "We study brains.".into();

        let created = repo.create(&section).await.unwrap();
        assert!(created.id > 0);

        let found = repo.get_by_position_id("about").await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.section_type, SectionType::Fixed);
    }

    #[tokio::test]
    async fn test_list_nav_filters_and_orders() {
        let repo = setup_repo().await;
        for (title, slug, in_nav, order) in [("Team", "team", true, 2), ("Docs", "docs", true, 1), ("Hidden", "hidden", false, 0)] {
            let mut section = WebsiteSection::new(title.into(), slug.into(), SectionType::Page);
            section.show_in_nav = in_nav;
            section.sort_order = order;
            repo.create(&section).await.unwrap();
        }

        let nav = repo.list_nav().await.unwrap();
        let slugs: Vec<&str> = nav.iter().map(|s| s.website_position_id.as_str()).collect();
        assert_eq!(slugs, vec!["docs", "team"]);
        assert_eq!(repo.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = setup_repo().await;
        let mut section = repo
            .create(&WebsiteSection::new("News".into(), "news".into(), SectionType::Page))
            .await
            .unwrap();

        section.title = "Latest news".into();
        section.show_in_nav = true;
        let updated = repo.update(&section).await.unwrap();
        assert_eq!(updated.title, "Latest news");
        assert!(updated.show_in_nav);

        repo.delete(section.id).await.unwrap();
        assert!(repo.get_by_id(section.id).await.unwrap().is_none());
    }
}

//! Blog post repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::BlogPost;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

use super::{mysql, sqlite, NO_LIMIT};

#[async_trait]
pub trait BlogPostRepository: Send + Sync {
    async fn create(&self, post: &BlogPost) -> Result<BlogPost>;
    async fn get_by_id(&self, id: i64) -> Result<Option<BlogPost>>;
    async fn get_by_identifier(&self, identifier: &str) -> Result<Option<BlogPost>>;
    async fn get_by_title(&self, title: &str) -> Result<Option<BlogPost>>;
    /// All posts, newest first
    async fn list(&self, limit: Option<i64>) -> Result<Vec<BlogPost>>;
    /// Posts shown in the lab blog, newest first
    async fn list_visible(&self, limit: Option<i64>) -> Result<Vec<BlogPost>>;
    async fn list_highlighted(&self) -> Result<Vec<BlogPost>>;
    async fn update(&self, post: &BlogPost) -> Result<BlogPost>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct SqlxBlogPostRepository {
    pool: DynDatabasePool,
}

impl SqlxBlogPostRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn BlogPostRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_COLUMNS: &str = "SELECT id, title, identifier, body, author, image_url, show_in_lab_blog, is_highlighted, created_at, updated_at FROM blog_posts";
const NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC LIMIT ?";

#[async_trait]
impl BlogPostRepository for SqlxBlogPostRepository {
    async fn create(&self, post: &BlogPost) -> Result<BlogPost> {
        let sql = "INSERT INTO blog_posts (title, identifier, body, author, image_url, show_in_lab_blog, is_highlighted, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";
        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .bind(&post.title)
                .bind(&post.identifier)
                .bind(&post.body)
                .bind(&post.author)
                .bind(&post.image_url)
                .bind(post.show_in_lab_blog)
                .bind(post.is_highlighted)
                .bind(post.created_at)
                .bind(post.updated_at)
                .execute(sqlite(&self.pool)?)
                .await
                .context("Failed to create blog post")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .bind(&post.title)
                .bind(&post.identifier)
                .bind(&post.body)
                .bind(&post.author)
                .bind(&post.image_url)
                .bind(post.show_in_lab_blog)
                .bind(post.is_highlighted)
                .bind(post.created_at)
                .bind(post.updated_at)
                .execute(mysql(&self.pool)?)
                .await
                .context("Failed to create blog post")?
                .last_insert_id() as i64,
        };
        Ok(BlogPost { id, ..post.clone() })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<BlogPost>> {
        let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(&sql)
                .bind(id)
                .fetch_optional(sqlite(&self.pool)?)
                .await
                .context("Failed to get blog post")?
                .map(|r| row_to_blog_post_sqlite(&r))
                .transpose(),
            DatabaseDriver::Mysql => sqlx::query(&sql)
                .bind(id)
                .fetch_optional(mysql(&self.pool)?)
                .await
                .context("Failed to get blog post")?
                .map(|r| row_to_blog_post_mysql(&r))
                .transpose(),
        }
    }

    async fn get_by_identifier(&self, identifier: &str) -> Result<Option<BlogPost>> {
        self.fetch_by_text("identifier", identifier).await
    }

    async fn get_by_title(&self, title: &str) -> Result<Option<BlogPost>> {
        self.fetch_by_text("title", title).await
    }

    async fn list(&self, limit: Option<i64>) -> Result<Vec<BlogPost>> {
        let sql = format!("{} {}", SELECT_COLUMNS, NEWEST_FIRST);
        self.fetch_many(&sql, limit).await
    }

    async fn list_visible(&self, limit: Option<i64>) -> Result<Vec<BlogPost>> {
        let sql = format!("{} WHERE show_in_lab_blog = 1 {}", SELECT_COLUMNS, NEWEST_FIRST);
        self.fetch_many(&sql, limit).await
    }

    async fn list_highlighted(&self) -> Result<Vec<BlogPost>> {
        let sql = format!("{} WHERE is_highlighted = 1 {}", SELECT_COLUMNS, NEWEST_FIRST);
        self.fetch_many(&sql, None).await
    }

    async fn update(&self, post: &BlogPost) -> Result<BlogPost> {
        let sql = "UPDATE blog_posts SET title = ?, identifier = ?, body = ?, author = ?, image_url = ?, show_in_lab_blog = ?, is_highlighted = ?, updated_at = ? WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(&post.title)
                    .bind(&post.identifier)
                    .bind(&post.body)
                    .bind(&post.author)
                    .bind(&post.image_url)
                    .bind(post.show_in_lab_blog)
                    .bind(post.is_highlighted)
                    .bind(post.updated_at)
                    .bind(post.id)
                    .execute(sqlite(&self.pool)?)
                    .await
                    .context("Failed to update blog post")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(&post.title)
                    .bind(&post.identifier)
                    .bind(&post.body)
                    .bind(&post.author)
                    .bind(&post.image_url)
                    .bind(post.show_in_lab_blog)
                    .bind(post.is_highlighted)
                    .bind(post.updated_at)
                    .bind(post.id)
                    .execute(mysql(&self.pool)?)
                    .await
                    .context("Failed to update blog post")?;
            }
        }
        self.get_by_id(post.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Blog post not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.pool
            .execute(&format!("DELETE FROM blog_posts WHERE id = {}", id))
            .await
            .context("Failed to delete blog post")?;
        Ok(())
    }
}

impl SqlxBlogPostRepository {
    async fn fetch_by_text(&self, column: &str, value: &str) -> Result<Option<BlogPost>> {
        let sql = format!("{} WHERE {} = ?", SELECT_COLUMNS, column);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(&sql)
                .bind(value)
                .fetch_optional(sqlite(&self.pool)?)
                .await
                .with_context(|| format!("Failed to get blog post by {}", column))?
                .map(|r| row_to_blog_post_sqlite(&r))
                .transpose(),
            DatabaseDriver::Mysql => sqlx::query(&sql)
                .bind(value)
                .fetch_optional(mysql(&self.pool)?)
                .await
                .with_context(|| format!("Failed to get blog post by {}", column))?
                .map(|r| row_to_blog_post_mysql(&r))
                .transpose(),
        }
    }

    async fn fetch_many(&self, sql: &str, limit: Option<i64>) -> Result<Vec<BlogPost>> {
        let limit = limit.unwrap_or(NO_LIMIT);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(sql)
                    .bind(limit)
                    .fetch_all(sqlite(&self.pool)?)
                    .await
                    .context("Failed to list blog posts")?;
                rows.iter().map(row_to_blog_post_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(sql)
                    .bind(limit)
                    .fetch_all(mysql(&self.pool)?)
                    .await
                    .context("Failed to list blog posts")?;
                rows.iter().map(row_to_blog_post_mysql).collect()
            }
        }
    }
}

fn row_to_blog_post_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<BlogPost> {
    Ok(BlogPost {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        identifier: row.try_get("identifier")?,
        body: row.try_get("body")?,
        author: row.try_get("author")?,
        image_url: row.try_get("image_url")?,
        show_in_lab_blog: row.try_get("show_in_lab_blog")?,
        is_highlighted: row.try_get("is_highlighted")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_blog_post_mysql(row: &sqlx::mysql::MySqlRow) -> Result<BlogPost> {
    Ok(BlogPost {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        identifier: row.try_get("identifier")?,
        body: row.try_get("body")?,
        author: row.try_get("author")?,
        image_url: row.try_get("image_url")?,
        show_in_lab_blog: row.try_get("show_in_lab_blog")?,
        is_highlighted: row.try_get("is_highlighted")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use chrono::{Duration, Utc};

    async fn setup_repo() -> Arc<dyn BlogPostRepository> {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool).await.expect("Failed to run migrations");
        SqlxBlogPostRepository::boxed(pool)
    }

    fn post(title: &str, age_days: i64) -> BlogPost {
        let mut post = BlogPost::new(title.into(), title.to_lowercase().replace(' ', "-"), "body".into(), "ann".into());
        post.created_at = Utc::now() - Duration::days(age_days);
        post.updated_at = post.created_at;
        post
    }

    #[tokio::test]
    async fn test_create_and_get_by_identifier() {
        let repo = setup_repo().await;
        let created = repo.create(&post("First post", 0)).await.unwrap();
        assert!(created.id > 0);

        let found = repo.get_by_identifier("first-post").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.title, "First post");
        assert!(found.show_in_lab_blog);
        assert!(repo.get_by_identifier("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_visible_is_newest_first_and_limited() {
        let repo = setup_repo().await;
        repo.create(&post("Old", 5)).await.unwrap();
        repo.create(&post("Newest", 1)).await.unwrap();
        let mut hidden = post("Hidden", 0);
        hidden.show_in_lab_blog = false;
        repo.create(&hidden).await.unwrap();

        let visible = repo.list_visible(None).await.unwrap();
        let titles: Vec<&str> = visible.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Newest", "Old"]);

        assert_eq!(repo.list_visible(Some(1)).await.unwrap().len(), 1);
        assert_eq!(repo.list(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_highlighted() {
        let repo = setup_repo().await;
        let mut starred = post("Starred", 2);
        starred.is_highlighted = true;
        repo.create(&starred).await.unwrap();
        repo.create(&post("Plain", 1)).await.unwrap();

        let highlighted = repo.list_highlighted().await.unwrap();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted[0].title, "Starred");
    }

    #[tokio::test]
    async fn test_duplicate_title_rejected_by_store() {
        let repo = setup_repo().await;
        repo.create(&post("Same", 0)).await.unwrap();
        let mut again = post("Same", 0);
        again.identifier = "other".into();
        assert!(repo.create(&again).await.is_err());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = setup_repo().await;
        let mut created = repo.create(&post("Draft", 0)).await.unwrap();
        created.body = "final".into();
        created.is_highlighted = true;

        let updated = repo.update(&created).await.unwrap();
        assert_eq!(updated.body, "final");
        assert!(updated.is_highlighted);

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}

//! Database migrations
//!
//! Migrations are embedded in the binary as SQL strings, one variant per
//! supported backend. Applied versions are recorded in `_migrations`, so
//! running the migrator on every start only applies what is missing.

use anyhow::{Context, Result};
use sqlx::{MySqlPool, Row, SqlitePool};

use super::DynDatabasePool;
use crate::config::DatabaseDriver;

/// A database migration with SQL for both SQLite and MySQL
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (must be unique and increasing)
    pub version: i32,
    pub name: &'static str,
    pub up_sqlite: &'static str,
    pub up_mysql: &'static str,
}

/// All schema migrations, in application order.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_website_sections",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS website_sections (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(100) NOT NULL,
                website_position_id VARCHAR(100) NOT NULL UNIQUE,
                section_type VARCHAR(20) NOT NULL DEFAULT 'page',
                body TEXT NOT NULL DEFAULT '',
                show_in_nav BOOLEAN NOT NULL DEFAULT 0,
                sort_order INTEGER NOT NULL DEFAULT 0
            );
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS website_sections (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                title VARCHAR(100) NOT NULL,
                website_position_id VARCHAR(100) NOT NULL UNIQUE,
                section_type VARCHAR(20) NOT NULL DEFAULT 'page',
                body TEXT NOT NULL,
                show_in_nav BOOLEAN NOT NULL DEFAULT FALSE,
                sort_order INT NOT NULL DEFAULT 0
            );
        "#,
    },
    Migration {
        version: 2,
        name: "create_blog_posts",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS blog_posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(100) NOT NULL UNIQUE,
                identifier VARCHAR(100) NOT NULL UNIQUE,
                body TEXT NOT NULL,
                author VARCHAR(100) NOT NULL,
                image_url VARCHAR(500),
                show_in_lab_blog BOOLEAN NOT NULL DEFAULT 1,
                is_highlighted BOOLEAN NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL,
                updated_at TIMESTAMP NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_blog_posts_created_at ON blog_posts(created_at);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS blog_posts (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                title VARCHAR(100) NOT NULL UNIQUE,
                identifier VARCHAR(100) NOT NULL UNIQUE,
                body TEXT NOT NULL,
                author VARCHAR(100) NOT NULL,
                image_url VARCHAR(500),
                show_in_lab_blog BOOLEAN NOT NULL DEFAULT TRUE,
                is_highlighted BOOLEAN NOT NULL DEFAULT FALSE,
                created_at DATETIME(6) NOT NULL,
                updated_at DATETIME(6) NOT NULL
            );
            CREATE INDEX idx_blog_posts_created_at ON blog_posts(created_at);
        "#,
    },
    Migration {
        version: 3,
        name: "create_event_posts",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS event_posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(100) NOT NULL UNIQUE,
                identifier VARCHAR(100) NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                body TEXT NOT NULL DEFAULT '',
                location VARCHAR(200),
                start_date TIMESTAMP NOT NULL,
                end_date TIMESTAMP,
                is_highlighted BOOLEAN NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL,
                updated_at TIMESTAMP NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_event_posts_created_at ON event_posts(created_at);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS event_posts (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                title VARCHAR(100) NOT NULL UNIQUE,
                identifier VARCHAR(100) NOT NULL UNIQUE,
                description TEXT NOT NULL,
                body TEXT NOT NULL,
                location VARCHAR(200),
                start_date DATETIME(6) NOT NULL,
                end_date DATETIME(6),
                is_highlighted BOOLEAN NOT NULL DEFAULT FALSE,
                created_at DATETIME(6) NOT NULL,
                updated_at DATETIME(6) NOT NULL
            );
            CREATE INDEX idx_event_posts_created_at ON event_posts(created_at);
        "#,
    },
    Migration {
        version: 4,
        name: "create_publications",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS publications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(300) NOT NULL,
                authors TEXT NOT NULL,
                venue VARCHAR(300) NOT NULL DEFAULT '',
                year INTEGER NOT NULL,
                url VARCHAR(500),
                entry_type VARCHAR(20) NOT NULL DEFAULT 'article',
                is_highlighted BOOLEAN NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL,
                updated_at TIMESTAMP NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_publications_created_at ON publications(created_at);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS publications (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                title VARCHAR(300) NOT NULL,
                authors TEXT NOT NULL,
                venue VARCHAR(300) NOT NULL DEFAULT '',
                year INT NOT NULL,
                url VARCHAR(500),
                entry_type VARCHAR(20) NOT NULL DEFAULT 'article',
                is_highlighted BOOLEAN NOT NULL DEFAULT FALSE,
                created_at DATETIME(6) NOT NULL,
                updated_at DATETIME(6) NOT NULL
            );
            CREATE INDEX idx_publications_created_at ON publications(created_at);
        "#,
    },
];

/// Run all pending migrations, returning how many were applied.
pub async fn run_migrations(pool: &DynDatabasePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = applied_versions(pool).await?;
    let mut count = 0;

    for migration in MIGRATIONS {
        if applied.contains(&migration.version) {
            continue;
        }
        tracing::info!(version = migration.version, name = migration.name, "Applying migration");
        apply_migration(pool, migration)
            .await
            .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
        count += 1;
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

async fn create_migrations_table(pool: &DynDatabasePool) -> Result<()> {
    let sql = match pool.driver() {
        DatabaseDriver::Sqlite => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
        DatabaseDriver::Mysql => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INT PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
    };

    pool.execute(sql).await?;
    Ok(())
}

async fn applied_versions(pool: &DynDatabasePool) -> Result<Vec<i32>> {
    if let Some(sqlite) = pool.as_sqlite() {
        return applied_versions_sqlite(sqlite).await;
    }
    if let Some(mysql) = pool.as_mysql() {
        return applied_versions_mysql(mysql).await;
    }
    anyhow::bail!("Database pool exposes no backend")
}

async fn applied_versions_sqlite(pool: &SqlitePool) -> Result<Vec<i32>> {
    let rows = sqlx::query("SELECT version FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to read applied migrations")?;
    Ok(rows.iter().map(|r| r.get::<i64, _>("version") as i32).collect())
}

async fn applied_versions_mysql(pool: &MySqlPool) -> Result<Vec<i32>> {
    let rows = sqlx::query("SELECT version FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to read applied migrations")?;
    Ok(rows.iter().map(|r| r.get::<i32, _>("version")).collect())
}

async fn apply_migration(pool: &DynDatabasePool, migration: &Migration) -> Result<()> {
    let sql = match pool.driver() {
        DatabaseDriver::Sqlite => migration.up_sqlite,
        DatabaseDriver::Mysql => migration.up_mysql,
    };

    for statement in split_sql_statements(sql) {
        pool.execute(statement)
            .await
            .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
    }

    let record = format!(
        "INSERT INTO _migrations (version, name) VALUES ({}, '{}')",
        migration.version, migration.name
    );
    pool.execute(&record).await?;

    Ok(())
}

fn truncate_sql(sql: &str) -> String {
    match sql.char_indices().nth(100) {
        Some((idx, _)) => format!("{}...", &sql[..idx]),
        None => sql.to_string(),
    }
}

/// Split SQL into individual statements, dropping comment-only fragments
fn split_sql_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty() && !is_comment_only(s))
        .collect()
}

fn is_comment_only(s: &str) -> bool {
    s.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with("--"))
}

/// Get the total number of migrations defined
pub fn total_migrations() -> usize {
    MIGRATIONS.len()
}

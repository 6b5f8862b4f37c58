//! Database repositories
//!
//! Repository pattern implementations for database access. Each repository
//! handles CRUD operations and the filtered, ordered queries for one entity.
//! Lookups that find nothing return `Ok(None)`.

pub mod blog_post;
pub mod event_post;
pub mod publication;
pub mod section;

pub use blog_post::{BlogPostRepository, SqlxBlogPostRepository};
pub use event_post::{EventPostRepository, SqlxEventPostRepository};
pub use publication::{PublicationRepository, SqlxPublicationRepository};
pub use section::{SectionRepository, SqlxSectionRepository};

use anyhow::{Context, Result};
use sqlx::{MySqlPool, SqlitePool};

use crate::db::DynDatabasePool;

/// Row cap used when a query has no limit; both backends accept it
pub(crate) const NO_LIMIT: i64 = i64::MAX;

pub(crate) fn sqlite(pool: &DynDatabasePool) -> Result<&SqlitePool> {
    pool.as_sqlite().context("SQLite pool not available")
}

pub(crate) fn mysql(pool: &DynDatabasePool) -> Result<&MySqlPool> {
    pool.as_mysql().context("MySQL pool not available")
}

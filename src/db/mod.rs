//! Database layer
//!
//! SQLite is the default backend (single-file deployment); MySQL is
//! available for larger installations. The backend is chosen from
//! configuration and hidden behind [`DatabasePool`].
//!
//! ```ignore
//! use labsite::config::DatabaseConfig;
//! use labsite::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};

//! Database layer
//!
//! Storage for the school site. It supports:
//! - SQLite (default, single-file deployment)
//! - MySQL
//!
//! The driver is selected by configuration. Repositories branch on
//! [`DatabasePool::driver`] and run the matching SQL dialect.
//!
//! # Usage
//!
//! ```ignore
//! use schoolsite::config::DatabaseConfig;
//! use schoolsite::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};

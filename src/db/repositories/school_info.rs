//! School info repository
//!
//! The school info table holds a singleton. Reads always take the lowest id
//! so an accidental second row is ignored.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::SchoolInfo;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// School info repository trait
#[async_trait]
pub trait SchoolInfoRepository: Send + Sync {
    /// The first record, if any
    async fn first(&self) -> Result<Option<SchoolInfo>>;

    /// Insert a record with zero counts and no contact details
    async fn create_default(&self) -> Result<SchoolInfo>;

    /// Overwrite every field of the record with `info.id`
    async fn update(&self, info: &SchoolInfo) -> Result<SchoolInfo>;
}

/// SQLx-based school info repository implementation
pub struct SqlxSchoolInfoRepository {
    pool: DynDatabasePool,
}

impl SqlxSchoolInfoRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SchoolInfoRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SchoolInfoRepository for SqlxSchoolInfoRepository {
    async fn first(&self) -> Result<Option<SchoolInfo>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => first_sqlite(self.pool.sqlite()?).await,
            DatabaseDriver::Mysql => first_mysql(self.pool.mysql()?).await,
        }
    }

    async fn create_default(&self) -> Result<SchoolInfo> {
        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => create_default_sqlite(self.pool.sqlite()?).await?,
            DatabaseDriver::Mysql => create_default_mysql(self.pool.mysql()?).await?,
        };

        Ok(SchoolInfo {
            id,
            ..SchoolInfo::default()
        })
    }

    async fn update(&self, info: &SchoolInfo) -> Result<SchoolInfo> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(self.pool.sqlite()?, info).await?,
            DatabaseDriver::Mysql => update_mysql(self.pool.mysql()?, info).await?,
        }
        Ok(info.clone())
    }
}

const SELECT_FIRST: &str = r#"
    SELECT id, teachers_count, students_count, classes_count, sciences_count, phone, email
    FROM school_info
    ORDER BY id ASC
    LIMIT 1
"#;

const UPDATE_INFO: &str = r#"
    UPDATE school_info
    SET teachers_count = ?, students_count = ?, classes_count = ?, sciences_count = ?,
        phone = ?, email = ?
    WHERE id = ?
"#;

// ============================================================================
// SQLite implementations
// ============================================================================

async fn first_sqlite(pool: &SqlitePool) -> Result<Option<SchoolInfo>> {
    let row = sqlx::query(SELECT_FIRST)
        .fetch_optional(pool)
        .await
        .context("Failed to get school info")?;

    Ok(row.map(|row| SchoolInfo {
        id: row.get("id"),
        teachers_count: row.get("teachers_count"),
        students_count: row.get("students_count"),
        classes_count: row.get("classes_count"),
        sciences_count: row.get("sciences_count"),
        phone: row.get("phone"),
        email: row.get("email"),
    }))
}

async fn create_default_sqlite(pool: &SqlitePool) -> Result<i64> {
    let result = sqlx::query("INSERT INTO school_info DEFAULT VALUES")
        .execute(pool)
        .await
        .context("Failed to create school info")?;

    Ok(result.last_insert_rowid())
}

async fn update_sqlite(pool: &SqlitePool, info: &SchoolInfo) -> Result<()> {
    sqlx::query(UPDATE_INFO)
        .bind(info.teachers_count)
        .bind(info.students_count)
        .bind(info.classes_count)
        .bind(info.sciences_count)
        .bind(&info.phone)
        .bind(&info.email)
        .bind(info.id)
        .execute(pool)
        .await
        .context("Failed to update school info")?;

    Ok(())
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn first_mysql(pool: &MySqlPool) -> Result<Option<SchoolInfo>> {
    let row = sqlx::query(SELECT_FIRST)
        .fetch_optional(pool)
        .await
        .context("Failed to get school info")?;

    Ok(row.map(|row| SchoolInfo {
        id: row.get("id"),
        teachers_count: row.get("teachers_count"),
        students_count: row.get("students_count"),
        classes_count: row.get("classes_count"),
        sciences_count: row.get("sciences_count"),
        phone: row.get("phone"),
        email: row.get("email"),
    }))
}

async fn create_default_mysql(pool: &MySqlPool) -> Result<i64> {
    let result = sqlx::query("INSERT INTO school_info () VALUES ()")
        .execute(pool)
        .await
        .context("Failed to create school info")?;

    Ok(result.last_insert_id() as i64)
}

async fn update_mysql(pool: &MySqlPool, info: &SchoolInfo) -> Result<()> {
    sqlx::query(UPDATE_INFO)
        .bind(info.teachers_count)
        .bind(info.students_count)
        .bind(info.classes_count)
        .bind(info.sciences_count)
        .bind(&info.phone)
        .bind(&info.email)
        .bind(info.id)
        .execute(pool)
        .await
        .context("Failed to update school info")?;

    Ok(())
}

//! Teacher repository
//!
//! Database operations for teachers. Reads join the category name so the
//! admin listing can show it without a second query.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Teacher;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Teacher repository trait
#[async_trait]
pub trait TeacherRepository: Send + Sync {
    /// Create a new teacher
    async fn create(&self, teacher: &Teacher) -> Result<Teacher>;

    /// Get teacher by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Teacher>>;

    /// List all teachers ordered by id
    async fn list(&self) -> Result<Vec<Teacher>>;

    /// Update every editable field of a teacher
    async fn update(&self, teacher: &Teacher) -> Result<Teacher>;

    /// Delete a teacher
    async fn delete(&self, id: i64) -> Result<()>;

    /// Number of teachers
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based teacher repository implementation
pub struct SqlxTeacherRepository {
    pool: DynDatabasePool,
}

impl SqlxTeacherRepository {
    /// Create a new SQLx teacher repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn TeacherRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TeacherRepository for SqlxTeacherRepository {
    async fn create(&self, teacher: &Teacher) -> Result<Teacher> {
        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => create_teacher_sqlite(self.pool.sqlite()?, teacher).await?,
            DatabaseDriver::Mysql => create_teacher_mysql(self.pool.mysql()?, teacher).await?,
        };

        self.get_by_id(id)
            .await?
            .context("Teacher not found after insert")
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Teacher>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_teacher_by_id_sqlite(self.pool.sqlite()?, id).await,
            DatabaseDriver::Mysql => get_teacher_by_id_mysql(self.pool.mysql()?, id).await,
        }
    }

    async fn list(&self) -> Result<Vec<Teacher>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_teachers_sqlite(self.pool.sqlite()?).await,
            DatabaseDriver::Mysql => list_teachers_mysql(self.pool.mysql()?).await,
        }
    }

    async fn update(&self, teacher: &Teacher) -> Result<Teacher> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_teacher_sqlite(self.pool.sqlite()?, teacher).await?,
            DatabaseDriver::Mysql => update_teacher_mysql(self.pool.mysql()?, teacher).await?,
        }

        self.get_by_id(teacher.id)
            .await?
            .context("Teacher not found after update")
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_teacher_sqlite(self.pool.sqlite()?, id).await,
            DatabaseDriver::Mysql => delete_teacher_mysql(self.pool.mysql()?, id).await,
        }
    }

    async fn count(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_teachers_sqlite(self.pool.sqlite()?).await,
            DatabaseDriver::Mysql => count_teachers_mysql(self.pool.mysql()?).await,
        }
    }
}

const SELECT_TEACHER: &str = r#"
    SELECT t.id, t.name, t.surname, t.image, t.category_id, t.position,
           c.name AS category_name
    FROM teachers t
    LEFT JOIN categories c ON c.id = t.category_id
"#;

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_teacher_sqlite(pool: &SqlitePool, teacher: &Teacher) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO teachers (name, surname, image, category_id, position)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&teacher.name)
    .bind(&teacher.surname)
    .bind(&teacher.image)
    .bind(teacher.category_id)
    .bind(&teacher.position)
    .execute(pool)
    .await
    .context("Failed to create teacher")?;

    Ok(result.last_insert_rowid())
}

async fn get_teacher_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Teacher>> {
    let row = sqlx::query(&format!("{} WHERE t.id = ?", SELECT_TEACHER))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get teacher by ID")?;

    Ok(row.map(|row| row_to_teacher_sqlite(&row)))
}

async fn list_teachers_sqlite(pool: &SqlitePool) -> Result<Vec<Teacher>> {
    let rows = sqlx::query(&format!("{} ORDER BY t.id ASC", SELECT_TEACHER))
        .fetch_all(pool)
        .await
        .context("Failed to list teachers")?;

    Ok(rows.iter().map(row_to_teacher_sqlite).collect())
}

async fn update_teacher_sqlite(pool: &SqlitePool, teacher: &Teacher) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE teachers
        SET name = ?, surname = ?, image = ?, category_id = ?, position = ?
        WHERE id = ?
        "#,
    )
    .bind(&teacher.name)
    .bind(&teacher.surname)
    .bind(&teacher.image)
    .bind(teacher.category_id)
    .bind(&teacher.position)
    .bind(teacher.id)
    .execute(pool)
    .await
    .context("Failed to update teacher")?;

    Ok(())
}

async fn delete_teacher_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM teachers WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete teacher")?;

    Ok(())
}

async fn count_teachers_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM teachers")
        .fetch_one(pool)
        .await
        .context("Failed to count teachers")?;

    Ok(row.get("count"))
}

fn row_to_teacher_sqlite(row: &sqlx::sqlite::SqliteRow) -> Teacher {
    Teacher {
        id: row.get("id"),
        name: row.get("name"),
        surname: row.get("surname"),
        image: row.get("image"),
        category_id: row.get("category_id"),
        position: row.get("position"),
        category_name: row.get("category_name"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_teacher_mysql(pool: &MySqlPool, teacher: &Teacher) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO teachers (name, surname, image, category_id, position)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&teacher.name)
    .bind(&teacher.surname)
    .bind(&teacher.image)
    .bind(teacher.category_id)
    .bind(&teacher.position)
    .execute(pool)
    .await
    .context("Failed to create teacher")?;

    Ok(result.last_insert_id() as i64)
}

async fn get_teacher_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Teacher>> {
    let row = sqlx::query(&format!("{} WHERE t.id = ?", SELECT_TEACHER))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get teacher by ID")?;

    Ok(row.map(|row| row_to_teacher_mysql(&row)))
}

async fn list_teachers_mysql(pool: &MySqlPool) -> Result<Vec<Teacher>> {
    let rows = sqlx::query(&format!("{} ORDER BY t.id ASC", SELECT_TEACHER))
        .fetch_all(pool)
        .await
        .context("Failed to list teachers")?;

    Ok(rows.iter().map(row_to_teacher_mysql).collect())
}

async fn update_teacher_mysql(pool: &MySqlPool, teacher: &Teacher) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE teachers
        SET name = ?, surname = ?, image = ?, category_id = ?, position = ?
        WHERE id = ?
        "#,
    )
    .bind(&teacher.name)
    .bind(&teacher.surname)
    .bind(&teacher.image)
    .bind(teacher.category_id)
    .bind(&teacher.position)
    .bind(teacher.id)
    .execute(pool)
    .await
    .context("Failed to update teacher")?;

    Ok(())
}

async fn delete_teacher_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM teachers WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete teacher")?;

    Ok(())
}

async fn count_teachers_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM teachers")
        .fetch_one(pool)
        .await
        .context("Failed to count teachers")?;

    Ok(row.get("count"))
}

fn row_to_teacher_mysql(row: &sqlx::mysql::MySqlRow) -> Teacher {
    Teacher {
        id: row.get("id"),
        name: row.get("name"),
        surname: row.get("surname"),
        image: row.get("image"),
        category_id: row.get("category_id"),
        position: row.get("position"),
        category_name: row.get("category_name"),
    }
}

//! Category repository
//!
//! Database operations for teacher categories.
//!
//! This module provides:
//! - `CategoryRepository` trait defining the interface for category data access
//! - `SqlxCategoryRepository` implementing the trait for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Category;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Category repository trait
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a new category
    async fn create(&self, category: &Category) -> Result<Category>;

    /// Get category by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>>;

    /// List all categories ordered by name, then id
    async fn list(&self) -> Result<Vec<Category>>;

    /// Rename a category
    async fn update(&self, category: &Category) -> Result<Category>;

    /// Delete a category. Teachers in it become uncategorized.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Number of categories
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based category repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxCategoryRepository {
    pool: DynDatabasePool,
}

impl SqlxCategoryRepository {
    /// Create a new SQLx category repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CategoryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn create(&self, category: &Category) -> Result<Category> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_category_sqlite(self.pool.sqlite()?, category).await,
            DatabaseDriver::Mysql => create_category_mysql(self.pool.mysql()?, category).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Category>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_category_by_id_sqlite(self.pool.sqlite()?, id).await,
            DatabaseDriver::Mysql => get_category_by_id_mysql(self.pool.mysql()?, id).await,
        }
    }

    async fn list(&self) -> Result<Vec<Category>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_categories_sqlite(self.pool.sqlite()?).await,
            DatabaseDriver::Mysql => list_categories_mysql(self.pool.mysql()?).await,
        }
    }

    async fn update(&self, category: &Category) -> Result<Category> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_category_sqlite(self.pool.sqlite()?, category).await,
            DatabaseDriver::Mysql => update_category_mysql(self.pool.mysql()?, category).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_category_sqlite(self.pool.sqlite()?, id).await,
            DatabaseDriver::Mysql => delete_category_mysql(self.pool.mysql()?, id).await,
        }
    }

    async fn count(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_categories_sqlite(self.pool.sqlite()?).await,
            DatabaseDriver::Mysql => count_categories_mysql(self.pool.mysql()?).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_category_sqlite(pool: &SqlitePool, category: &Category) -> Result<Category> {
    let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
        .bind(&category.name)
        .execute(pool)
        .await
        .context("Failed to create category")?;

    Ok(Category {
        id: result.last_insert_rowid(),
        name: category.name.clone(),
    })
}

async fn get_category_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Category>> {
    let row = sqlx::query("SELECT id, name FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get category by ID")?;

    Ok(row.map(|row| row_to_category_sqlite(&row)))
}

async fn list_categories_sqlite(pool: &SqlitePool) -> Result<Vec<Category>> {
    let rows = sqlx::query("SELECT id, name FROM categories ORDER BY name ASC, id ASC")
        .fetch_all(pool)
        .await
        .context("Failed to list categories")?;

    Ok(rows.iter().map(row_to_category_sqlite).collect())
}

async fn update_category_sqlite(pool: &SqlitePool, category: &Category) -> Result<Category> {
    sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
        .bind(&category.name)
        .bind(category.id)
        .execute(pool)
        .await
        .context("Failed to update category")?;

    Ok(category.clone())
}

async fn delete_category_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    sqlx::query("UPDATE teachers SET category_id = NULL WHERE category_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to detach teachers from category")?;

    sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete category")?;

    tx.commit().await.context("Failed to commit transaction")?;
    Ok(())
}

async fn count_categories_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM categories")
        .fetch_one(pool)
        .await
        .context("Failed to count categories")?;

    Ok(row.get("count"))
}

fn row_to_category_sqlite(row: &sqlx::sqlite::SqliteRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_category_mysql(pool: &MySqlPool, category: &Category) -> Result<Category> {
    let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
        .bind(&category.name)
        .execute(pool)
        .await
        .context("Failed to create category")?;

    Ok(Category {
        id: result.last_insert_id() as i64,
        name: category.name.clone(),
    })
}

async fn get_category_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Category>> {
    let row = sqlx::query("SELECT id, name FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get category by ID")?;

    Ok(row.map(|row| row_to_category_mysql(&row)))
}

async fn list_categories_mysql(pool: &MySqlPool) -> Result<Vec<Category>> {
    let rows = sqlx::query("SELECT id, name FROM categories ORDER BY name ASC, id ASC")
        .fetch_all(pool)
        .await
        .context("Failed to list categories")?;

    Ok(rows.iter().map(row_to_category_mysql).collect())
}

async fn update_category_mysql(pool: &MySqlPool, category: &Category) -> Result<Category> {
    sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
        .bind(&category.name)
        .bind(category.id)
        .execute(pool)
        .await
        .context("Failed to update category")?;

    Ok(category.clone())
}

async fn delete_category_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    sqlx::query("UPDATE teachers SET category_id = NULL WHERE category_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to detach teachers from category")?;

    sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete category")?;

    tx.commit().await.context("Failed to commit transaction")?;
    Ok(())
}

async fn count_categories_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM categories")
        .fetch_one(pool)
        .await
        .context("Failed to count categories")?;

    Ok(row.get("count"))
}

fn row_to_category_mysql(row: &sqlx::mysql::MySqlRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> (DynDatabasePool, SqlxCategoryRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxCategoryRepository::new(pool.clone());
        (pool, repo)
    }

    #[tokio::test]
    async fn test_create_and_get_category() {
        let (_pool, repo) = setup_test_repo().await;

        let created = repo
            .create(&Category::new("Rahbariyat"))
            .await
            .expect("Failed to create category");
        assert!(created.id > 0);

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get category")
            .expect("Category not found");
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_get_category_not_found() {
        let (_pool, repo) = setup_test_repo().await;
        assert!(repo.get_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders_by_name() {
        let (_pool, repo) = setup_test_repo().await;

        for name in ["Rahbariyat", "Fan o'qituvchisi", "Maktab direktori"] {
            repo.create(&Category::new(name)).await.unwrap();
        }

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Fan o'qituvchisi", "Maktab direktori", "Rahbariyat"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_category() {
        let (_pool, repo) = setup_test_repo().await;

        let mut category = repo.create(&Category::new("Old")).await.unwrap();
        category.name = "New".to_string();
        repo.update(&category).await.unwrap();

        let found = repo.get_by_id(category.id).await.unwrap().unwrap();
        assert_eq!(found.name, "New");
    }

    #[tokio::test]
    async fn test_delete_category_uncategorizes_teachers() {
        let (pool, repo) = setup_test_repo().await;

        let category = repo.create(&Category::new("Rahbariyat")).await.unwrap();
        let sqlite = pool.sqlite().unwrap();
        sqlx::query("INSERT INTO teachers (name, image, category_id) VALUES ('A', 'images/a.png', ?)")
            .bind(category.id)
            .execute(sqlite)
            .await
            .unwrap();

        repo.delete(category.id).await.expect("Failed to delete category");

        assert!(repo.get_by_id(category.id).await.unwrap().is_none());
        let row = sqlx::query("SELECT category_id FROM teachers")
            .fetch_one(sqlite)
            .await
            .unwrap();
        let category_id: Option<i64> = row.get("category_id");
        assert_eq!(category_id, None);
    }
}

//! News repository
//!
//! Database operations for news items. Every listing is newest first, with
//! the id as a tie-breaker for items created in the same instant.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::News;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// News repository trait
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Create a news item, keeping its `created_at`
    async fn create(&self, news: &News) -> Result<News>;

    /// Get news item by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<News>>;

    /// The `limit` most recent items
    async fn list_recent(&self, limit: i64) -> Result<Vec<News>>;

    /// All items, newest first
    async fn list_all(&self) -> Result<Vec<News>>;

    /// Update title, description and image. `created_at` is never touched.
    async fn update(&self, news: &News) -> Result<News>;

    /// Delete a news item
    async fn delete(&self, id: i64) -> Result<()>;

    /// Number of news items
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based news repository implementation
pub struct SqlxNewsRepository {
    pool: DynDatabasePool,
}

impl SqlxNewsRepository {
    /// Create a new SQLx news repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn NewsRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl NewsRepository for SqlxNewsRepository {
    async fn create(&self, news: &News) -> Result<News> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_news_sqlite(self.pool.sqlite()?, news).await,
            DatabaseDriver::Mysql => create_news_mysql(self.pool.mysql()?, news).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<News>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_news_by_id_sqlite(self.pool.sqlite()?, id).await,
            DatabaseDriver::Mysql => get_news_by_id_mysql(self.pool.mysql()?, id).await,
        }
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<News>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_news_sqlite(self.pool.sqlite()?, Some(limit)).await,
            DatabaseDriver::Mysql => list_news_mysql(self.pool.mysql()?, Some(limit)).await,
        }
    }

    async fn list_all(&self) -> Result<Vec<News>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_news_sqlite(self.pool.sqlite()?, None).await,
            DatabaseDriver::Mysql => list_news_mysql(self.pool.mysql()?, None).await,
        }
    }

    async fn update(&self, news: &News) -> Result<News> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_news_sqlite(self.pool.sqlite()?, news).await?,
            DatabaseDriver::Mysql => update_news_mysql(self.pool.mysql()?, news).await?,
        }

        self.get_by_id(news.id)
            .await?
            .context("News not found after update")
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_news_sqlite(self.pool.sqlite()?, id).await,
            DatabaseDriver::Mysql => delete_news_mysql(self.pool.mysql()?, id).await,
        }
    }

    async fn count(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_news_sqlite(self.pool.sqlite()?).await,
            DatabaseDriver::Mysql => count_news_mysql(self.pool.mysql()?).await,
        }
    }
}

const SELECT_NEWS: &str = "SELECT id, title, description, image, created_at FROM news";
const ORDER_NEWS: &str = "ORDER BY created_at DESC, id DESC";

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_news_sqlite(pool: &SqlitePool, news: &News) -> Result<News> {
    let result = sqlx::query(
        r#"
        INSERT INTO news (title, description, image, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&news.title)
    .bind(&news.description)
    .bind(&news.image)
    .bind(news.created_at)
    .execute(pool)
    .await
    .context("Failed to create news")?;

    let mut created = news.clone();
    created.id = result.last_insert_rowid();
    Ok(created)
}

async fn get_news_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<News>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_NEWS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get news by ID")?;

    Ok(row.map(|row| row_to_news_sqlite(&row)))
}

async fn list_news_sqlite(pool: &SqlitePool, limit: Option<i64>) -> Result<Vec<News>> {
    let rows = match limit {
        Some(limit) => sqlx::query(&format!("{} {} LIMIT ?", SELECT_NEWS, ORDER_NEWS))
            .bind(limit.max(0))
            .fetch_all(pool)
            .await,
        None => sqlx::query(&format!("{} {}", SELECT_NEWS, ORDER_NEWS))
            .fetch_all(pool)
            .await,
    }
    .context("Failed to list news")?;

    Ok(rows.iter().map(row_to_news_sqlite).collect())
}

async fn update_news_sqlite(pool: &SqlitePool, news: &News) -> Result<()> {
    sqlx::query("UPDATE news SET title = ?, description = ?, image = ? WHERE id = ?")
        .bind(&news.title)
        .bind(&news.description)
        .bind(&news.image)
        .bind(news.id)
        .execute(pool)
        .await
        .context("Failed to update news")?;

    Ok(())
}

async fn delete_news_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM news WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete news")?;

    Ok(())
}

async fn count_news_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM news")
        .fetch_one(pool)
        .await
        .context("Failed to count news")?;

    Ok(row.get("count"))
}

fn row_to_news_sqlite(row: &sqlx::sqlite::SqliteRow) -> News {
    News {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        image: row.get("image"),
        created_at: row.get("created_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_news_mysql(pool: &MySqlPool, news: &News) -> Result<News> {
    let result = sqlx::query(
        r#"
        INSERT INTO news (title, description, image, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&news.title)
    .bind(&news.description)
    .bind(&news.image)
    .bind(news.created_at)
    .execute(pool)
    .await
    .context("Failed to create news")?;

    let mut created = news.clone();
    created.id = result.last_insert_id() as i64;
    Ok(created)
}

async fn get_news_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<News>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_NEWS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get news by ID")?;

    Ok(row.map(|row| row_to_news_mysql(&row)))
}

async fn list_news_mysql(pool: &MySqlPool, limit: Option<i64>) -> Result<Vec<News>> {
    let rows = match limit {
        Some(limit) => sqlx::query(&format!("{} {} LIMIT ?", SELECT_NEWS, ORDER_NEWS))
            .bind(limit.max(0))
            .fetch_all(pool)
            .await,
        None => sqlx::query(&format!("{} {}", SELECT_NEWS, ORDER_NEWS))
            .fetch_all(pool)
            .await,
    }
    .context("Failed to list news")?;

    Ok(rows.iter().map(row_to_news_mysql).collect())
}

async fn update_news_mysql(pool: &MySqlPool, news: &News) -> Result<()> {
    sqlx::query("UPDATE news SET title = ?, description = ?, image = ? WHERE id = ?")
        .bind(&news.title)
        .bind(&news.description)
        .bind(&news.image)
        .bind(news.id)
        .execute(pool)
        .await
        .context("Failed to update news")?;

    Ok(())
}

async fn delete_news_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM news WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete news")?;

    Ok(())
}

async fn count_news_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM news")
        .fetch_one(pool)
        .await
        .context("Failed to count news")?;

    Ok(row.get("count"))
}

fn row_to_news_mysql(row: &sqlx::mysql::MySqlRow) -> News {
    News {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        image: row.get("image"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use chrono::{Duration, Utc};

    async fn setup_test_repo() -> SqlxNewsRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxNewsRepository::new(pool)
    }

    fn news_at(title: &str, minutes_ago: i64) -> News {
        News::new(title, "Body", "images/n.png").created_at(Utc::now() - Duration::minutes(minutes_ago))
    }

    #[tokio::test]
    async fn test_list_recent_is_newest_first() {
        let repo = setup_test_repo().await;

        for (title, age) in [("old", 30), ("newest", 1), ("middle", 10), ("oldest", 60)] {
            repo.create(&news_at(title, age)).await.unwrap();
        }

        let titles: Vec<String> = repo
            .list_recent(3)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["newest", "middle", "old"]);

        assert_eq!(repo.list_all().await.unwrap().len(), 4);
        assert_eq!(repo.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_same_timestamp_breaks_ties_by_id() {
        let repo = setup_test_repo().await;
        let at = Utc::now();

        let first = repo.create(&News::new("a", "x", "images/a.png").created_at(at)).await.unwrap();
        let second = repo.create(&News::new("b", "x", "images/b.png").created_at(at)).await.unwrap();

        let ids: Vec<i64> = repo.list_all().await.unwrap().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let repo = setup_test_repo().await;

        let mut news = repo.create(&news_at("title", 5)).await.unwrap();
        let created_at = repo.get_by_id(news.id).await.unwrap().unwrap().created_at;

        news.title = "changed".to_string();
        news.created_at = Utc::now();
        let updated = repo.update(&news).await.unwrap();

        assert_eq!(updated.title, "changed");
        assert_eq!(updated.created_at, created_at);
    }

    #[tokio::test]
    async fn test_delete_news() {
        let repo = setup_test_repo().await;

        let news = repo.create(&news_at("gone", 1)).await.unwrap();
        repo.delete(news.id).await.unwrap();

        assert!(repo.get_by_id(news.id).await.unwrap().is_none());
        assert!(repo.list_all().await.unwrap().is_empty());
    }
}

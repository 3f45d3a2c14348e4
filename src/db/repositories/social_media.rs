//! Social media repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Platform, SocialMedia};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Social media repository trait
#[async_trait]
pub trait SocialMediaRepository: Send + Sync {
    /// All links ordered by id
    async fn list(&self) -> Result<Vec<SocialMedia>>;

    /// The link stored for a platform
    async fn get_by_platform(&self, platform: Platform) -> Result<Option<SocialMedia>>;

    /// Insert or replace the link for a platform
    async fn upsert(&self, platform: Platform, url: &str) -> Result<SocialMedia>;
}

/// SQLx-based social media repository implementation
pub struct SqlxSocialMediaRepository {
    pool: DynDatabasePool,
}

impl SqlxSocialMediaRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SocialMediaRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SocialMediaRepository for SqlxSocialMediaRepository {
    async fn list(&self) -> Result<Vec<SocialMedia>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query("SELECT id, platform, url FROM social_media ORDER BY id")
                    .fetch_all(self.pool.sqlite()?)
                    .await
                    .context("Failed to list social media")?;
                rows.iter().map(row_to_social_media_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query("SELECT id, platform, url FROM social_media ORDER BY id")
                    .fetch_all(self.pool.mysql()?)
                    .await
                    .context("Failed to list social media")?;
                rows.iter().map(row_to_social_media_mysql).collect()
            }
        }
    }

    async fn get_by_platform(&self, platform: Platform) -> Result<Option<SocialMedia>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_platform_sqlite(self.pool.sqlite()?, platform).await,
            DatabaseDriver::Mysql => get_by_platform_mysql(self.pool.mysql()?, platform).await,
        }
    }

    async fn upsert(&self, platform: Platform, url: &str) -> Result<SocialMedia> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(
                    r#"
                    INSERT INTO social_media (platform, url) VALUES (?, ?)
                    ON CONFLICT(platform) DO UPDATE SET url = excluded.url
                    "#,
                )
                .bind(platform.code())
                .bind(url)
                .execute(self.pool.sqlite()?)
                .await
                .context("Failed to save social media link")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(
                    r#"
                    INSERT INTO social_media (platform, url) VALUES (?, ?)
                    ON DUPLICATE KEY UPDATE url = VALUES(url)
                    "#,
                )
                .bind(platform.code())
                .bind(url)
                .execute(self.pool.mysql()?)
                .await
                .context("Failed to save social media link")?;
            }
        }

        self.get_by_platform(platform)
            .await?
            .context("Social media link not found after save")
    }
}

async fn get_by_platform_sqlite(pool: &SqlitePool, platform: Platform) -> Result<Option<SocialMedia>> {
    let row = sqlx::query("SELECT id, platform, url FROM social_media WHERE platform = ?")
        .bind(platform.code())
        .fetch_optional(pool)
        .await
        .context("Failed to get social media link")?;

    row.as_ref().map(row_to_social_media_sqlite).transpose()
}

async fn get_by_platform_mysql(pool: &MySqlPool, platform: Platform) -> Result<Option<SocialMedia>> {
    let row = sqlx::query("SELECT id, platform, url FROM social_media WHERE platform = ?")
        .bind(platform.code())
        .fetch_optional(pool)
        .await
        .context("Failed to get social media link")?;

    row.as_ref().map(row_to_social_media_mysql).transpose()
}

fn row_to_social_media_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<SocialMedia> {
    let code: String = row.get("platform");
    Ok(SocialMedia {
        id: row.get("id"),
        platform: code.parse().map_err(|e: String| anyhow!(e))?,
        url: row.get("url"),
    })
}

fn row_to_social_media_mysql(row: &sqlx::mysql::MySqlRow) -> Result<SocialMedia> {
    let code: String = row.get("platform");
    Ok(SocialMedia {
        id: row.get("id"),
        platform: code.parse().map_err(|e: String| anyhow!(e))?,
        url: row.get("url"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxSocialMediaRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxSocialMediaRepository::new(pool)
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_link() {
        let repo = setup_test_repo().await;

        let first = repo.upsert(Platform::Telegram, "https://t.me/old").await.unwrap();
        let second = repo.upsert(Platform::Telegram, "https://t.me/school").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.url, "https://t.me/school");
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_by_platform() {
        let repo = setup_test_repo().await;
        repo.upsert(Platform::Instagram, "https://instagram.com/school").await.unwrap();

        assert!(repo.get_by_platform(Platform::Facebook).await.unwrap().is_none());
        let link = repo.get_by_platform(Platform::Instagram).await.unwrap().unwrap();
        assert_eq!(link.platform, Platform::Instagram);
    }
}

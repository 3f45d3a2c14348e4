//! Admin session management
//!
//! Sessions live in the database and are keyed by a random token carried in
//! the `sessionid` cookie. Admin access is the `admin_logged = true` entry in
//! the session data; the secret it is compared against comes from config.

use crate::config::AdminConfig;
use crate::db::repositories::SessionRepository;
use crate::models::{Session, ADMIN_LOGGED_KEY};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "sessionid";

pub struct SessionService {
    repo: Arc<dyn SessionRepository>,
    admin_password: String,
    max_age_secs: i64,
}

impl SessionService {
    pub fn new(repo: Arc<dyn SessionRepository>, config: &AdminConfig) -> Self {
        Self {
            repo,
            admin_password: config.password.clone(),
            max_age_secs: config.session_max_age_secs,
        }
    }

    /// Session lifetime, also used as the cookie Max-Age
    pub fn max_age_secs(&self) -> i64 {
        self.max_age_secs
    }

    /// Load a live session. Expired sessions are removed and reported absent.
    pub async fn load(&self, token: &str) -> Result<Option<Session>> {
        let session = match self
            .repo
            .get_by_id(token)
            .await
            .context("Failed to get session")?
        {
            Some(s) => s,
            None => return Ok(None),
        };

        if session.is_expired() {
            self.repo.delete(token).await?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Check the submitted secret.
    ///
    /// On a match the previous session (if any) is dropped and a fresh admin
    /// session is returned. On a mismatch nothing changes and `None` is
    /// returned; callers show one generic message either way.
    pub async fn login(&self, current: Option<&str>, password: &str) -> Result<Option<Session>> {
        if self.admin_password.is_empty() || password != self.admin_password {
            tracing::warn!("Admin login failed");
            return Ok(None);
        }

        if let Some(token) = current {
            self.repo.delete(token).await?;
        }

        let now = Utc::now();
        let mut data = Map::new();
        data.insert(ADMIN_LOGGED_KEY.to_string(), Value::Bool(true));
        let session = Session {
            id: Uuid::new_v4().simple().to_string(),
            data,
            expires_at: now + Duration::seconds(self.max_age_secs),
            created_at: now,
        };

        let session = self.repo.create(&session).await?;
        tracing::info!("Admin logged in");
        Ok(Some(session))
    }

    /// Drop every value stored for a session
    pub async fn flush(&self, token: &str) -> Result<()> {
        self.repo.delete(token).await?;
        tracing::info!("Session flushed");
        Ok(())
    }

    /// Delete all expired sessions, returning how many were removed
    pub async fn cleanup_expired(&self) -> Result<i64> {
        self.repo
            .delete_expired()
            .await
            .context("Failed to delete expired sessions")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxSessionRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup_service() -> (SessionService, Arc<dyn SessionRepository>) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxSessionRepository::boxed(pool);
        let config = AdminConfig {
            password: "maktab-2024".to_string(),
            session_max_age_secs: 3600,
        };
        (SessionService::new(repo.clone(), &config), repo)
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let (service, _repo) = setup_service().await;
        assert!(service.login(None, "guess").await.unwrap().is_none());
        assert!(service.login(None, "").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_creates_admin_session() {
        let (service, _repo) = setup_service().await;

        let session = service.login(None, "maktab-2024").await.unwrap().unwrap();
        assert!(session.is_admin());
        assert_eq!(session.id.len(), 32);

        let loaded = service.load(&session.id).await.unwrap().unwrap();
        assert!(loaded.is_admin());
    }

    #[tokio::test]
    async fn test_login_replaces_previous_session() {
        let (service, _repo) = setup_service().await;

        let first = service.login(None, "maktab-2024").await.unwrap().unwrap();
        let second = service
            .login(Some(&first.id), "maktab-2024")
            .await
            .unwrap()
            .unwrap();

        assert_ne!(first.id, second.id);
        assert!(service.load(&first.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_flush_ends_session() {
        let (service, _repo) = setup_service().await;

        let session = service.login(None, "maktab-2024").await.unwrap().unwrap();
        service.flush(&session.id).await.unwrap();
        assert!(service.load(&session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_absent() {
        let (service, repo) = setup_service().await;

        let now = Utc::now();
        let mut data = Map::new();
        data.insert(ADMIN_LOGGED_KEY.to_string(), Value::Bool(true));
        let stale = Session {
            id: "stale".to_string(),
            data,
            expires_at: now - Duration::minutes(1),
            created_at: now - Duration::days(1),
        };
        repo.create(&stale).await.unwrap();

        assert!(service.load("stale").await.unwrap().is_none());
        assert!(repo.get_by_id("stale").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_secret_never_matches() {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        let service = SessionService::new(
            SqlxSessionRepository::boxed(pool),
            &AdminConfig {
                password: String::new(),
                session_max_age_secs: 60,
            },
        );
        assert!(service.login(None, "").await.unwrap().is_none());
    }
}

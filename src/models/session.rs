//! Session model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Session key marking an authenticated admin
pub const ADMIN_LOGGED_KEY: &str = "admin_logged";

/// Server-side session: an opaque key-value store scoped to one browser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session ID (cookie token)
    pub id: String,
    /// Stored values
    pub data: Map<String, Value>,
    /// Expiration timestamp
    pub expires_at: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    /// True only when `admin_logged` is stored as boolean `true`
    pub fn is_admin(&self) -> bool {
        matches!(self.data.get(ADMIN_LOGGED_KEY), Some(Value::Bool(true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(data: Map<String, Value>, expires_in: Duration) -> Session {
        Session {
            id: "abc".to_string(),
            data,
            expires_at: Utc::now() + expires_in,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_admin_requires_true() {
        let mut s = session(Map::new(), Duration::hours(1));
        assert!(!s.is_admin());

        s.data
            .insert(ADMIN_LOGGED_KEY.to_string(), Value::String("true".to_string()));
        assert!(!s.is_admin());

        s.data.insert(ADMIN_LOGGED_KEY.to_string(), Value::Bool(true));
        assert!(s.is_admin());
    }

    #[test]
    fn test_is_expired() {
        assert!(session(Map::new(), Duration::seconds(-1)).is_expired());
        assert!(!session(Map::new(), Duration::hours(1)).is_expired());
    }
}

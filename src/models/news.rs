//! News model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// News article. `created_at` is set once on creation and never changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Stored image reference, relative to the media root
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl News {
    /// Create a new News item stamped with the current time.
    pub fn new(title: impl Into<String>, description: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
            image: image.into(),
            created_at: Utc::now(),
        }
    }

    /// Same as [`News::new`] with an explicit creation time
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

//! Teacher model

use serde::{Deserialize, Serialize};

/// Teacher entity
///
/// Created, edited and deleted only through the admin panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Teacher {
    /// Unique identifier
    pub id: i64,
    /// Given name (required)
    pub name: String,
    /// Family name
    pub surname: Option<String>,
    /// Stored image reference, relative to the media root
    pub image: String,
    /// Category this teacher belongs to
    pub category_id: Option<i64>,
    /// Free-text job title
    pub position: Option<String>,
    /// Name of the referenced category, filled by joined queries
    #[serde(default)]
    pub category_name: Option<String>,
}

impl Teacher {
    /// Create a new Teacher. The ID is assigned by the database.
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            surname: None,
            image: image.into(),
            category_id: None,
            position: None,
            category_name: None,
        }
    }

    pub fn with_category(mut self, category_id: Option<i64>) -> Self {
        self.category_id = category_id;
        self
    }

    pub fn with_surname(mut self, surname: Option<String>) -> Self {
        self.surname = surname;
        self
    }

    pub fn with_position(mut self, position: Option<String>) -> Self {
        self.position = position;
        self
    }

    /// "Name Surname", or just the name when there is no surname
    pub fn full_name(&self) -> String {
        match self.surname.as_deref() {
            Some(surname) if !surname.is_empty() => format!("{} {}", self.name, surname),
            _ => self.name.clone(),
        }
    }
}

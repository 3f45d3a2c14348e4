//! Category model
//!
//! Teacher groups shown on the directory page ("Rahbariyat", "Fan o'qituvchisi", ...).

use serde::{Deserialize, Serialize};

use super::Teacher;

/// Category entity. Teachers reference zero or one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    /// Unique identifier
    pub id: i64,
    /// Category name, matched exactly by the ordering policy
    pub name: String,
}

impl Category {
    /// Create a new Category. The ID is assigned by the database.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }
}

/// A category paired with its teachers, as shown on the directory page
#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub teachers: Vec<Teacher>,
}

impl CategoryGroup {
    pub fn new(category: Category, teachers: Vec<Teacher>) -> Self {
        Self { category, teachers }
    }

    pub fn is_empty(&self) -> bool {
        self.teachers.is_empty()
    }
}

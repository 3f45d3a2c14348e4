//! School info model
//!
//! A singleton record: at most one row is ever read or updated.

use serde::{Deserialize, Serialize};

/// Headline counts and contact details of the school
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchoolInfo {
    pub id: i64,
    pub teachers_count: i64,
    pub students_count: i64,
    pub classes_count: i64,
    pub sciences_count: i64,
    pub phone: Option<String>,
    pub email: Option<String>,
}

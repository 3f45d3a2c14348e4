//! Form validation
//!
//! Each admin form has a plain struct holding the raw submitted text and a
//! `validate` method that either yields clean values or every field error at
//! once. Nothing here touches storage: checks that need the database (does
//! the category exist?) and the image checks live in the entity services.

use lettre::Address;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

pub const CATEGORY_NAME_MAX: usize = 155;
pub const TEACHER_NAME_MAX: usize = 155;
pub const TEACHER_SURNAME_MAX: usize = 100;
pub const TEACHER_POSITION_MAX: usize = 100;
pub const NEWS_TITLE_MAX: usize = 255;
pub const PHONE_MAX: usize = 20;
pub const EMAIL_MAX: usize = 254;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?\d[\d\s]{6,20}$").unwrap());

/// Field-level error messages in the order they were found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<(String, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single error on one field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record an error. Only the first message per field is kept.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        if self.get(&field).is_none() {
            self.errors.push((field, message.into()));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    /// `Ok(value)` when no error was recorded
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

// Templates look errors up by field name
impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, message) in &self.errors {
            map.serialize_entry(field, message)?;
        }
        map.end()
    }
}

/// Phone numbers: optional leading `+`, then digits and spaces
pub fn is_valid_phone(phone: &str) -> bool {
    phone.chars().count() <= PHONE_MAX && PHONE_RE.is_match(phone)
}

/// Syntactically well-formed email address with a dotted domain
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > EMAIL_MAX {
        return false;
    }
    match email.parse::<Address>() {
        Ok(address) => {
            let domain = address.domain();
            domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
        }
        Err(_) => false,
    }
}

fn required(errors: &mut FieldErrors, field: &str, value: &str, max: Option<usize>) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, "This field is required.");
    } else if let Some(max) = max {
        check_length(errors, field, value, max);
    }
    value.to_string()
}

fn optional(errors: &mut FieldErrors, field: &str, value: &str, max: usize) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    check_length(errors, field, value, max);
    Some(value.to_string())
}

fn check_length(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    let len = value.chars().count();
    if len > max {
        errors.add(
            field,
            format!("Ensure this value has at most {} characters (it has {}).", max, len),
        );
    }
}

fn count(errors: &mut FieldErrors, field: &str, value: &str) -> i64 {
    let value = value.trim();
    if value.is_empty() {
        return 0;
    }
    match value.parse::<i64>() {
        Ok(n) if n >= 0 => n,
        Ok(_) => {
            errors.add(field, "Ensure this value is greater than or equal to 0.");
            0
        }
        Err(_) => {
            errors.add(field, "Enter a whole number.");
            0
        }
    }
}

/// Submitted category form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
}

impl CategoryForm {
    pub fn from_category(category: &crate::models::Category) -> Self {
        Self {
            name: category.name.clone(),
        }
    }

    /// The trimmed name
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required(&mut errors, "name", &self.name, Some(CATEGORY_NAME_MAX));
        errors.into_result(name)
    }
}

/// Submitted teacher form (text fields only; the image travels separately)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeacherForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    /// Category id as submitted; empty means no category
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub position: String,
}

/// Clean teacher fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherInput {
    pub name: String,
    pub surname: Option<String>,
    pub category_id: Option<i64>,
    pub position: Option<String>,
}

impl TeacherForm {
    /// Prefill from a stored teacher
    pub fn from_teacher(teacher: &crate::models::Teacher) -> Self {
        Self {
            name: teacher.name.clone(),
            surname: teacher.surname.clone().unwrap_or_default(),
            category: teacher
                .category_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            position: teacher.position.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<TeacherInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required(&mut errors, "name", &self.name, Some(TEACHER_NAME_MAX));
        let surname = optional(&mut errors, "surname", &self.surname, TEACHER_SURNAME_MAX);
        let position = optional(&mut errors, "position", &self.position, TEACHER_POSITION_MAX);

        let category = self.category.trim();
        let category_id = if category.is_empty() {
            None
        } else {
            match category.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("category", "Select a valid choice.");
                    None
                }
            }
        };

        errors.into_result(TeacherInput {
            name,
            surname,
            category_id,
            position,
        })
    }
}

/// Submitted news form (text fields only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Clean news fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsInput {
    pub title: String,
    pub description: String,
}

impl NewsForm {
    pub fn from_news(news: &crate::models::News) -> Self {
        Self {
            title: news.title.clone(),
            description: news.description.clone(),
        }
    }

    pub fn validate(&self) -> Result<NewsInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = required(&mut errors, "title", &self.title, Some(NEWS_TITLE_MAX));
        let description = required(&mut errors, "description", &self.description, None);
        errors.into_result(NewsInput { title, description })
    }
}

/// Submitted school info form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolInfoForm {
    #[serde(default)]
    pub teachers_count: String,
    #[serde(default)]
    pub students_count: String,
    #[serde(default)]
    pub classes_count: String,
    #[serde(default)]
    pub sciences_count: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// Clean school info fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolInfoInput {
    pub teachers_count: i64,
    pub students_count: i64,
    pub classes_count: i64,
    pub sciences_count: i64,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl SchoolInfoForm {
    /// Prefill from a stored record
    pub fn from_info(info: &crate::models::SchoolInfo) -> Self {
        Self {
            teachers_count: info.teachers_count.to_string(),
            students_count: info.students_count.to_string(),
            classes_count: info.classes_count.to_string(),
            sciences_count: info.sciences_count.to_string(),
            phone: info.phone.clone().unwrap_or_default(),
            email: info.email.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<SchoolInfoInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let teachers_count = count(&mut errors, "teachers_count", &self.teachers_count);
        let students_count = count(&mut errors, "students_count", &self.students_count);
        let classes_count = count(&mut errors, "classes_count", &self.classes_count);
        let sciences_count = count(&mut errors, "sciences_count", &self.sciences_count);

        let phone = Some(self.phone.trim().to_string()).filter(|p| !p.is_empty());
        if let Some(p) = &phone {
            if !is_valid_phone(p) {
                errors.add(
                    "phone",
                    "Phone number may only contain '+', digits and spaces.",
                );
            }
        }

        let email = Some(self.email.trim().to_string()).filter(|e| !e.is_empty());
        if let Some(e) = &email {
            if !is_valid_email(e) {
                errors.add("email", "Enter a valid email address.");
            }
        }

        errors.into_result(SchoolInfoInput {
            teachers_count,
            students_count,
            classes_count,
            sciences_count,
            phone,
            email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_pattern() {
        assert!(is_valid_phone("+998 90 123 45 67"));
        assert!(is_valid_phone("998901234567"));
        assert!(!is_valid_phone("abc"));
        assert!(!is_valid_phone("+12"));
        assert!(!is_valid_phone(" 998901234567"));
        assert!(!is_valid_phone("+998 90 123 45 67 89 01"));
    }

    #[test]
    fn test_email_check() {
        assert!(is_valid_email("info@school.uz"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@"));
    }

    #[test]
    fn test_email_requires_dotted_domain() {
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a@.uz"));
        assert!(!is_valid_email("a@school..uz"));
        assert!(is_valid_email("a@b.uz"));
    }

    #[test]
    fn test_school_info_empty_phone_accepted() {
        let form = SchoolInfoForm {
            phone: "".to_string(),
            ..Default::default()
        };
        let input = form.validate().unwrap();
        assert_eq!(input.phone, None);
        assert_eq!(input.teachers_count, 0);
    }

    #[test]
    fn test_school_info_collects_every_error() {
        let form = SchoolInfoForm {
            teachers_count: "-1".to_string(),
            students_count: "many".to_string(),
            phone: "abc".to_string(),
            email: "nope".to_string(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.get("teachers_count").is_some());
        assert!(errors.get("students_count").is_some());
        assert!(errors.get("phone").is_some());
        assert!(errors.get("email").is_some());
        assert!(errors.get("classes_count").is_none());
    }

    #[test]
    fn test_school_info_valid() {
        let form = SchoolInfoForm {
            teachers_count: "52".to_string(),
            students_count: " 900 ".to_string(),
            classes_count: "30".to_string(),
            sciences_count: "".to_string(),
            phone: "+998 90 123 45 67".to_string(),
            email: "info@school.uz".to_string(),
        };
        let input = form.validate().unwrap();
        assert_eq!(input.students_count, 900);
        assert_eq!(input.sciences_count, 0);
        assert_eq!(input.email.as_deref(), Some("info@school.uz"));
    }

    #[test]
    fn test_category_name_limits() {
        assert!(CategoryForm { name: "  ".into() }.validate().is_err());
        assert!(CategoryForm { name: "x".repeat(155) }.validate().is_ok());
        assert!(CategoryForm { name: "x".repeat(156) }.validate().is_err());
        assert_eq!(
            CategoryForm { name: " Rahbariyat ".into() }.validate().unwrap(),
            "Rahbariyat"
        );
    }

    #[test]
    fn test_length_counts_characters() {
        // 155 two-byte characters still fit
        let form = TeacherForm {
            name: "ş".repeat(155),
            ..Default::default()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_teacher_form() {
        let form = TeacherForm {
            name: "Aziza".into(),
            surname: "".into(),
            category: "3".into(),
            position: "Direktor".into(),
        };
        let input = form.validate().unwrap();
        assert_eq!(input.surname, None);
        assert_eq!(input.category_id, Some(3));

        let bad = TeacherForm {
            name: "".into(),
            surname: "x".repeat(101),
            category: "abc".into(),
            ..Default::default()
        };
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_news_form_requires_both_fields() {
        let errors = NewsForm::default().validate().unwrap_err();
        assert!(errors.get("title").is_some());
        assert!(errors.get("description").is_some());
    }

    #[test]
    fn test_field_errors_keep_first_message() {
        let mut errors = FieldErrors::new();
        errors.add("name", "first");
        errors.add("name", "second");
        assert_eq!(errors.get("name"), Some("first"));
        assert_eq!(errors.to_string(), "name: first");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["name"], "first");
    }

    #[test]
    fn test_teacher_form_prefill_round_trips() {
        let teacher = crate::models::Teacher::new("Aziza", "images/a.png")
            .with_category(Some(3))
            .with_position(Some("Direktor".to_string()));

        let form = TeacherForm::from_teacher(&teacher);
        assert_eq!(form.category, "3");
        assert_eq!(form.surname, "");

        let input = form.validate().unwrap();
        assert_eq!(input.category_id, Some(3));
        assert_eq!(input.position.as_deref(), Some("Direktor"));
        assert_eq!(input.surname, None);
    }
}

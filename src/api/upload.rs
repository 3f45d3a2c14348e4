//! Multipart form reading
//!
//! Teacher and news forms are posted as `multipart/form-data`: text fields
//! plus one optional file part named `image`.

use axum::extract::Multipart;
use std::collections::HashMap;

use crate::api::middleware::PageError;
use crate::services::{NewsForm, TeacherForm, UploadedImage};

/// Name of the file part
pub const IMAGE_FIELD: &str = "image";

/// A multipart form split into text fields and the image part
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    pub image: Option<UploadedImage>,
}

impl MultipartForm {
    /// Read every part of the body
    pub async fn read(mut multipart: Multipart) -> Result<Self, PageError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            tracing::warn!("Failed to read multipart: {}", e);
            PageError::bad_request("The submitted form could not be read.")
        })? {
            let name = field.name().unwrap_or("").to_string();

            if name == IMAGE_FIELD {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(|e| {
                    tracing::warn!("Failed to read uploaded file: {}", e);
                    PageError::bad_request("The uploaded file could not be read.")
                })?;

                form.image = Some(UploadedImage {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            } else if !name.is_empty() {
                let value = field.text().await.map_err(|e| {
                    tracing::warn!("Failed to read form field {}: {}", name, e);
                    PageError::bad_request("The submitted form could not be read.")
                })?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// A text field, empty when absent
    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    pub fn teacher_form(&self) -> TeacherForm {
        TeacherForm {
            name: self.text("name"),
            surname: self.text("surname"),
            category: self.text("category"),
            position: self.text("position"),
        }
    }

    pub fn news_form(&self) -> NewsForm {
        NewsForm {
            title: self.text("title"),
            description: self.text("description"),
        }
    }

    /// Take the image part, leaving `None`
    pub fn take_image(&mut self) -> Option<UploadedImage> {
        self.image.take()
    }
}

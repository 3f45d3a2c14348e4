//! Uploaded image storage
//!
//! Images land under `<media root>/images/<uuid>.<ext>`. The value stored on
//! a teacher or news row is the path relative to the media root.

use anyhow::{Context, Result};
use tokio::fs;
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::services::validation::FieldErrors;

/// Subdirectory of the media root holding uploaded images
const IMAGES_DIR: &str = "images";

/// An image part read from a multipart form
#[derive(Debug, Clone, Default)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadedImage {
    /// A file input left blank still sends a part with no name and no bytes
    pub fn is_empty(&self) -> bool {
        self.file_name.is_empty() && self.data.is_empty()
    }
}

/// Writes validated images to disk
#[derive(Debug, Clone)]
pub struct MediaStore {
    config: UploadConfig,
}

impl MediaStore {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    /// Check type and size against the upload limits
    pub fn check(&self, image: &UploadedImage) -> Result<(), String> {
        if image.data.is_empty() {
            return Err("The submitted file is empty.".to_string());
        }
        if !self.config.is_type_allowed(&image.content_type) {
            return Err(format!(
                "Unsupported image type: {}",
                if image.content_type.is_empty() {
                    "unknown"
                } else {
                    image.content_type.as_str()
                }
            ));
        }
        if image.data.len() as u64 > self.config.max_file_size {
            return Err(format!(
                "Image is too large (max {} MB)",
                self.config.max_file_size / 1024 / 1024
            ));
        }
        Ok(())
    }

    /// Record image problems on the `image` field. A missing image is an
    /// error only when `required` is set.
    pub fn check_field(&self, errors: &mut FieldErrors, image: Option<&UploadedImage>, required: bool) {
        match image {
            Some(image) => {
                if let Err(message) = self.check(image) {
                    errors.add("image", message);
                }
            }
            None if required => errors.add("image", "This field is required."),
            None => {}
        }
    }

    /// Write an image and return its reference relative to the media root
    pub async fn store(&self, image: &UploadedImage) -> Result<String> {
        let dir = self.config.path.join(IMAGES_DIR);
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create media directory: {:?}", dir))?;

        let ext = self.config.get_extension(&image.content_type);
        let file_name = format!("{}.{}", Uuid::new_v4(), ext);
        let path = dir.join(&file_name);

        fs::write(&path, &image.data)
            .await
            .with_context(|| format!("Failed to save image: {:?}", path))?;

        tracing::info!("Stored image {} ({} bytes)", file_name, image.data.len());
        Ok(format!("{}/{}", IMAGES_DIR, file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &std::path::Path) -> MediaStore {
        MediaStore::new(UploadConfig {
            path: dir.to_path_buf(),
            max_file_size: 16,
            ..UploadConfig::default()
        })
    }

    fn png(size: usize) -> UploadedImage {
        UploadedImage {
            file_name: "photo.png".to_string(),
            content_type: "image/png".to_string(),
            data: vec![0u8; size],
        }
    }

    #[test]
    fn test_empty_part_is_omitted() {
        assert!(UploadedImage::default().is_empty());
        assert!(!png(1).is_empty());
    }

    #[test]
    fn test_check_rejects_type_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        assert!(store.check(&png(16)).is_ok());
        assert!(store.check(&png(17)).is_err());

        let pdf = UploadedImage {
            content_type: "application/pdf".to_string(),
            ..png(1)
        };
        assert!(store.check(&pdf).is_err());
    }

    #[test]
    fn test_check_rejects_named_part_without_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let blank = png(0);
        assert!(!blank.is_empty());
        assert_eq!(store.check(&blank), Err("The submitted file is empty.".to_string()));

        let mut errors = FieldErrors::new();
        store.check_field(&mut errors, Some(&blank), false);
        assert_eq!(errors.get("image"), Some("The submitted file is empty."));
    }

    #[test]
    fn test_check_field_required() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let mut errors = FieldErrors::new();
        store.check_field(&mut errors, None, false);
        assert!(errors.is_empty());

        store.check_field(&mut errors, None, true);
        assert_eq!(errors.get("image"), Some("This field is required."));
    }

    #[tokio::test]
    async fn test_store_writes_under_images() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let reference = store.store(&png(4)).await.unwrap();
        assert!(reference.starts_with("images/"));
        assert!(reference.ends_with(".png"));
        assert!(dir.path().join(&reference).exists());
    }
}

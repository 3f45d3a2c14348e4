//! Teacher service
//!
//! Admin-side create, edit and delete for teachers. Every field is checked
//! before anything is written: the image is stored only once the whole form
//! is valid, so a rejected submission leaves no file and no row behind.

use crate::db::repositories::{CategoryRepository, TeacherRepository};
use crate::models::Teacher;
use crate::services::media::{MediaStore, UploadedImage};
use crate::services::validation::{FieldErrors, TeacherForm, TeacherInput};
use anyhow::Result;
use std::sync::Arc;

/// Error types for teacher service operations
#[derive(Debug, thiserror::Error)]
pub enum TeacherServiceError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Teacher not found: {0}")]
    NotFound(i64),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Teacher service
pub struct TeacherService {
    repo: Arc<dyn TeacherRepository>,
    categories: Arc<dyn CategoryRepository>,
    media: Arc<MediaStore>,
}

impl TeacherService {
    pub fn new(
        repo: Arc<dyn TeacherRepository>,
        categories: Arc<dyn CategoryRepository>,
        media: Arc<MediaStore>,
    ) -> Self {
        Self {
            repo,
            categories,
            media,
        }
    }

    /// All teachers by id, with category names
    pub async fn list(&self) -> Result<Vec<Teacher>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Option<Teacher>> {
        self.repo.get_by_id(id).await
    }

    pub async fn count(&self) -> Result<i64> {
        self.repo.count().await
    }

    /// Create a teacher. The image is required.
    pub async fn create(
        &self,
        form: &TeacherForm,
        image: Option<UploadedImage>,
    ) -> Result<Teacher, TeacherServiceError> {
        let image = image.filter(|i| !i.is_empty());
        let input = self.validate(form, image.as_ref(), true).await?;

        let Some(image) = image else {
            return Err(TeacherServiceError::Validation(FieldErrors::single(
                "image",
                "This field is required.",
            )));
        };
        let reference = self.media.store(&image).await?;

        let teacher = Teacher::new(input.name, reference)
            .with_surname(input.surname)
            .with_category(input.category_id)
            .with_position(input.position);
        let teacher = self.repo.create(&teacher).await?;

        tracing::info!("Created teacher {} ({})", teacher.id, teacher.full_name());
        Ok(teacher)
    }

    /// Update a teacher. Without a new image the current one is kept.
    pub async fn update(
        &self,
        id: i64,
        form: &TeacherForm,
        image: Option<UploadedImage>,
    ) -> Result<Teacher, TeacherServiceError> {
        let mut teacher = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(TeacherServiceError::NotFound(id))?;

        let image = image.filter(|i| !i.is_empty());
        let input = self.validate(form, image.as_ref(), false).await?;

        if let Some(image) = &image {
            teacher.image = self.media.store(image).await?;
        }
        teacher.name = input.name;
        teacher.surname = input.surname;
        teacher.category_id = input.category_id;
        teacher.position = input.position;

        let teacher = self.repo.update(&teacher).await?;
        tracing::info!("Updated teacher {} ({})", teacher.id, teacher.full_name());
        Ok(teacher)
    }

    /// Delete a teacher. Returns `false` when it did not exist.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        if self.repo.get_by_id(id).await?.is_none() {
            return Ok(false);
        }
        self.repo.delete(id).await?;
        tracing::info!("Deleted teacher {}", id);
        Ok(true)
    }

    async fn validate(
        &self,
        form: &TeacherForm,
        image: Option<&UploadedImage>,
        image_required: bool,
    ) -> Result<TeacherInput, TeacherServiceError> {
        let (input, mut errors) = match form.validate() {
            Ok(input) => (Some(input), FieldErrors::new()),
            Err(errors) => (None, errors),
        };

        if let Some(category_id) = input.as_ref().and_then(|i| i.category_id) {
            if self.categories.get_by_id(category_id).await?.is_none() {
                errors.add("category", "Select a valid choice.");
            }
        }
        self.media.check_field(&mut errors, image, image_required);

        match input {
            Some(input) if errors.is_empty() => Ok(input),
            _ => Err(TeacherServiceError::Validation(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UploadConfig;
    use crate::db::repositories::{SqlxCategoryRepository, SqlxTeacherRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::Category;
    use tempfile::TempDir;

    struct Fixture {
        service: TeacherService,
        categories: Arc<dyn CategoryRepository>,
        media_dir: TempDir,
    }

    async fn setup() -> Fixture {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let media_dir = tempfile::tempdir().unwrap();
        let media = Arc::new(MediaStore::new(UploadConfig {
            path: media_dir.path().to_path_buf(),
            ..UploadConfig::default()
        }));
        let categories = SqlxCategoryRepository::boxed(pool.clone());
        let service = TeacherService::new(SqlxTeacherRepository::boxed(pool), categories.clone(), media);

        Fixture {
            service,
            categories,
            media_dir,
        }
    }

    fn png() -> UploadedImage {
        UploadedImage {
            file_name: "face.png".to_string(),
            content_type: "image/png".to_string(),
            data: vec![1, 2, 3],
        }
    }

    fn form(name: &str, category: &str) -> TeacherForm {
        TeacherForm {
            name: name.to_string(),
            category: category.to_string(),
            ..Default::default()
        }
    }

    fn stored_files(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path().join("images"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_create_requires_image() {
        let f = setup().await;

        let err = f.service.create(&form("Aziza", ""), None).await.unwrap_err();
        match err {
            TeacherServiceError::Validation(errors) => {
                assert_eq!(errors.get("image"), Some("This field is required."));
            }
            other => panic!("unexpected error: {other}"),
        }

        // An empty file part counts as no image
        let err = f
            .service
            .create(&form("Aziza", ""), Some(UploadedImage::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, TeacherServiceError::Validation(_)));
        assert_eq!(f.service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_zero_byte_image() {
        let f = setup().await;

        let blank = UploadedImage {
            data: Vec::new(),
            ..png()
        };
        let err = f.service.create(&form("Aziza", ""), Some(blank)).await.unwrap_err();
        match err {
            TeacherServiceError::Validation(errors) => {
                assert_eq!(errors.get("image"), Some("The submitted file is empty."));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(f.service.count().await.unwrap(), 0);
        assert_eq!(stored_files(&f.media_dir), 0);
    }

    #[tokio::test]
    async fn test_invalid_form_writes_no_file() {
        let f = setup().await;

        let err = f.service.create(&form("", "77"), Some(png())).await.unwrap_err();
        match err {
            TeacherServiceError::Validation(errors) => {
                assert!(errors.get("name").is_some());
                assert!(errors.get("image").is_none());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(stored_files(&f.media_dir), 0);
    }

    #[tokio::test]
    async fn test_unknown_category_rejected() {
        let f = setup().await;

        let err = f.service.create(&form("Aziza", "77"), Some(png())).await.unwrap_err();
        match err {
            TeacherServiceError::Validation(errors) => {
                assert_eq!(errors.get("category"), Some("Select a valid choice."));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(stored_files(&f.media_dir), 0);
    }

    #[tokio::test]
    async fn test_create_then_edit_keeps_image() {
        let f = setup().await;
        let category = f.categories.create(&Category::new("Rahbariyat")).await.unwrap();

        let created = f
            .service
            .create(&form("Aziza", &category.id.to_string()), Some(png()))
            .await
            .unwrap();
        assert!(created.image.starts_with("images/"));
        assert_eq!(created.category_name.as_deref(), Some("Rahbariyat"));
        assert_eq!(stored_files(&f.media_dir), 1);

        let updated = f
            .service
            .update(created.id, &form("Aziza K.", ""), None)
            .await
            .unwrap();
        assert_eq!(updated.name, "Aziza K.");
        assert_eq!(updated.image, created.image);
        assert_eq!(updated.category_id, None);
    }

    #[tokio::test]
    async fn test_edit_replaces_image() {
        let f = setup().await;
        let created = f.service.create(&form("A", ""), Some(png())).await.unwrap();

        let updated = f.service.update(created.id, &form("A", ""), Some(png())).await.unwrap();
        assert_ne!(updated.image, created.image);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let f = setup().await;

        let err = f.service.update(5, &form("A", ""), None).await.unwrap_err();
        assert!(matches!(err, TeacherServiceError::NotFound(5)));
        assert!(!f.service.delete(5).await.unwrap());
    }
}

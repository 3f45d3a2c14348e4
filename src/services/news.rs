//! News service
//!
//! Admin-side create, edit and delete for news items. `created_at` is
//! stamped on creation and never changes afterwards.

use crate::db::repositories::NewsRepository;
use crate::models::News;
use crate::services::media::{MediaStore, UploadedImage};
use crate::services::validation::{FieldErrors, NewsForm, NewsInput};
use anyhow::Result;
use std::sync::Arc;

/// Error types for news service operations
#[derive(Debug, thiserror::Error)]
pub enum NewsServiceError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("News not found: {0}")]
    NotFound(i64),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// News service
pub struct NewsService {
    repo: Arc<dyn NewsRepository>,
    media: Arc<MediaStore>,
}

impl NewsService {
    pub fn new(repo: Arc<dyn NewsRepository>, media: Arc<MediaStore>) -> Self {
        Self { repo, media }
    }

    /// All news, newest first
    pub async fn list(&self) -> Result<Vec<News>> {
        self.repo.list_all().await
    }

    pub async fn get(&self, id: i64) -> Result<Option<News>> {
        self.repo.get_by_id(id).await
    }

    pub async fn count(&self) -> Result<i64> {
        self.repo.count().await
    }

    /// Create a news item. The image is required.
    pub async fn create(
        &self,
        form: &NewsForm,
        image: Option<UploadedImage>,
    ) -> Result<News, NewsServiceError> {
        let image = image.filter(|i| !i.is_empty());
        let input = self.validate(form, image.as_ref(), true)?;

        let Some(image) = image else {
            return Err(NewsServiceError::Validation(FieldErrors::single(
                "image",
                "This field is required.",
            )));
        };
        let reference = self.media.store(&image).await?;

        let news = self
            .repo
            .create(&News::new(input.title, input.description, reference))
            .await?;
        tracing::info!("Created news {} ({})", news.id, news.title);
        Ok(news)
    }

    /// Update a news item. Without a new image the current one is kept.
    pub async fn update(
        &self,
        id: i64,
        form: &NewsForm,
        image: Option<UploadedImage>,
    ) -> Result<News, NewsServiceError> {
        let mut news = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(NewsServiceError::NotFound(id))?;

        let image = image.filter(|i| !i.is_empty());
        let input = self.validate(form, image.as_ref(), false)?;

        if let Some(image) = &image {
            news.image = self.media.store(image).await?;
        }
        news.title = input.title;
        news.description = input.description;

        let news = self.repo.update(&news).await?;
        tracing::info!("Updated news {} ({})", news.id, news.title);
        Ok(news)
    }

    /// Delete a news item. Returns `false` when it did not exist.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        if self.repo.get_by_id(id).await?.is_none() {
            return Ok(false);
        }
        self.repo.delete(id).await?;
        tracing::info!("Deleted news {}", id);
        Ok(true)
    }

    fn validate(
        &self,
        form: &NewsForm,
        image: Option<&UploadedImage>,
        image_required: bool,
    ) -> Result<NewsInput, NewsServiceError> {
        let (input, mut errors) = match form.validate() {
            Ok(input) => (Some(input), FieldErrors::new()),
            Err(errors) => (None, errors),
        };
        self.media.check_field(&mut errors, image, image_required);

        match input {
            Some(input) if errors.is_empty() => Ok(input),
            _ => Err(NewsServiceError::Validation(errors)),
        }
    }
}

//! Category service
//!
//! Validated create, rename and delete for teacher categories. Deleting a
//! category keeps its teachers and clears their category.

use crate::db::repositories::CategoryRepository;
use crate::models::Category;
use crate::services::validation::{CategoryForm, FieldErrors};
use anyhow::Result;
use std::sync::Arc;

/// Error types for category service operations
#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Category not found: {0}")]
    NotFound(i64),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Category service
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    /// All categories by name
    pub async fn list(&self) -> Result<Vec<Category>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Option<Category>> {
        self.repo.get_by_id(id).await
    }

    pub async fn count(&self) -> Result<i64> {
        self.repo.count().await
    }

    pub async fn create(&self, form: &CategoryForm) -> Result<Category, CategoryServiceError> {
        let name = form.validate().map_err(CategoryServiceError::Validation)?;
        let category = self.repo.create(&Category::new(name)).await?;
        tracing::info!("Created category {} ({})", category.id, category.name);
        Ok(category)
    }

    pub async fn update(&self, id: i64, form: &CategoryForm) -> Result<Category, CategoryServiceError> {
        let mut category = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(CategoryServiceError::NotFound(id))?;

        category.name = form.validate().map_err(CategoryServiceError::Validation)?;
        let category = self.repo.update(&category).await?;
        tracing::info!("Updated category {} ({})", category.id, category.name);
        Ok(category)
    }

    /// Delete a category. Returns `false` when it did not exist.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        if self.repo.get_by_id(id).await?.is_none() {
            return Ok(false);
        }
        self.repo.delete(id).await?;
        tracing::info!("Deleted category {}", id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxCategoryRepository, SqlxTeacherRepository, TeacherRepository};
    use crate::db::{create_test_pool, migrations, DynDatabasePool};
    use crate::models::Teacher;

    async fn setup_service() -> (CategoryService, DynDatabasePool) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        (CategoryService::new(SqlxCategoryRepository::boxed(pool.clone())), pool)
    }

    fn form(name: &str) -> CategoryForm {
        CategoryForm { name: name.to_string() }
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (service, _pool) = setup_service().await;

        let result = service.create(&form("   ")).await;
        assert!(matches!(result, Err(CategoryServiceError::Validation(_))));
        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_category() {
        let (service, _pool) = setup_service().await;
        let result = service.update(42, &form("x")).await;
        assert!(matches!(result, Err(CategoryServiceError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_delete_keeps_teachers() {
        let (service, pool) = setup_service().await;
        let teachers = SqlxTeacherRepository::new(pool);

        let category = service.create(&form("Rahbariyat")).await.unwrap();
        let a = teachers
            .create(&Teacher::new("A", "images/a.png").with_category(Some(category.id)))
            .await
            .unwrap();
        let b = teachers
            .create(&Teacher::new("B", "images/b.png").with_category(Some(category.id)))
            .await
            .unwrap();

        assert!(service.delete(category.id).await.unwrap());
        assert!(!service.delete(category.id).await.unwrap());

        for id in [a.id, b.id] {
            let teacher = teachers.get_by_id(id).await.unwrap().expect("teacher kept");
            assert_eq!(teacher.category_id, None);
            assert_eq!(teacher.category_name, None);
        }
    }
}

//! School info service
//!
//! The singleton record is created with zero counts the first time the admin
//! side asks for it. Public pages only read it.

use crate::db::repositories::SchoolInfoRepository;
use crate::models::SchoolInfo;
use crate::services::validation::{FieldErrors, SchoolInfoForm};
use anyhow::Result;
use std::sync::Arc;

/// Error types for school info operations
#[derive(Debug, thiserror::Error)]
pub enum SchoolInfoServiceError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub struct SchoolInfoService {
    repo: Arc<dyn SchoolInfoRepository>,
}

impl SchoolInfoService {
    pub fn new(repo: Arc<dyn SchoolInfoRepository>) -> Self {
        Self { repo }
    }

    /// The record if it exists
    pub async fn get(&self) -> Result<Option<SchoolInfo>> {
        self.repo.first().await
    }

    /// The record, created with defaults when missing
    pub async fn get_or_create(&self) -> Result<SchoolInfo> {
        match self.repo.first().await? {
            Some(info) => Ok(info),
            None => {
                let info = self.repo.create_default().await?;
                tracing::info!("Created school info record {}", info.id);
                Ok(info)
            }
        }
    }

    /// Validate and save every field
    pub async fn update(&self, form: &SchoolInfoForm) -> Result<SchoolInfo, SchoolInfoServiceError> {
        let input = form.validate().map_err(SchoolInfoServiceError::Validation)?;
        let current = self.get_or_create().await?;

        let info = SchoolInfo {
            id: current.id,
            teachers_count: input.teachers_count,
            students_count: input.students_count,
            classes_count: input.classes_count,
            sciences_count: input.sciences_count,
            phone: input.phone,
            email: input.email,
        };
        let info = self.repo.update(&info).await?;
        tracing::info!("Updated school info");
        Ok(info)
    }
}

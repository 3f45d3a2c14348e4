//! Content queries for the public pages
//!
//! Read-only compositions over the repositories:
//! - featured teachers for the home page
//! - recent news and the full news list
//! - a single news item with the news list beside it
//! - the teacher directory grouped by category
//!
//! The selection and grouping rules are plain functions over slices so they
//! can be tested without a database.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::ContentConfig;
use crate::db::repositories::{
    CategoryRepository, NewsRepository, SchoolInfoRepository, TeacherRepository,
};
use crate::models::{Category, CategoryGroup, News, SchoolInfo, Teacher};
use crate::services::ordering::CategoryOrder;

/// Everything the home page shows
#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub teachers: Vec<Teacher>,
    pub news: Vec<News>,
    pub info: Option<SchoolInfo>,
}

/// A news item (absent when the id is unknown) and the news list
#[derive(Debug, Clone, Serialize)]
pub struct NewsDetail {
    pub news: Option<News>,
    pub recent_news: Vec<News>,
}

/// Pick up to `limit` teachers.
///
/// Members of the priority categories come first, category by category in
/// priority order and by ascending id inside a category. Remaining slots are
/// filled with the other teachers by ascending id. No teacher appears twice.
pub fn select_featured(teachers: &[Teacher], priority: &CategoryOrder, limit: usize) -> Vec<Teacher> {
    let mut pool: Vec<&Teacher> = teachers.iter().collect();
    pool.sort_by_key(|t| t.id);

    let mut chosen: Vec<Teacher> = Vec::with_capacity(limit.min(pool.len()));
    let mut seen: HashSet<i64> = HashSet::new();

    for name in priority.names() {
        for teacher in pool.iter().filter(|t| t.category_name.as_deref() == Some(name.as_str())) {
            if chosen.len() == limit {
                return chosen;
            }
            if seen.insert(teacher.id) {
                chosen.push((*teacher).clone());
            }
        }
    }

    for teacher in &pool {
        if chosen.len() == limit {
            break;
        }
        if seen.insert(teacher.id) {
            chosen.push((*teacher).clone());
        }
    }

    chosen
}

/// Group teachers under their categories in directory order.
///
/// Categories without teachers are dropped. Uncategorized teachers do not
/// appear. Teachers keep ascending id order inside a group.
pub fn group_directory(
    mut categories: Vec<Category>,
    teachers: &[Teacher],
    order: &CategoryOrder,
) -> Vec<CategoryGroup> {
    order.sort(&mut categories);

    categories
        .into_iter()
        .filter_map(|category| {
            let mut members: Vec<Teacher> = teachers
                .iter()
                .filter(|t| t.category_id == Some(category.id))
                .cloned()
                .collect();
            if members.is_empty() {
                return None;
            }
            members.sort_by_key(|t| t.id);
            Some(CategoryGroup::new(category, members))
        })
        .collect()
}

/// Read-side service behind the public pages
pub struct ContentService {
    teachers: Arc<dyn TeacherRepository>,
    news: Arc<dyn NewsRepository>,
    categories: Arc<dyn CategoryRepository>,
    school_info: Arc<dyn SchoolInfoRepository>,
    featured: CategoryOrder,
    directory: CategoryOrder,
    featured_limit: usize,
    recent_news_limit: usize,
}

impl ContentService {
    pub fn new(
        teachers: Arc<dyn TeacherRepository>,
        news: Arc<dyn NewsRepository>,
        categories: Arc<dyn CategoryRepository>,
        school_info: Arc<dyn SchoolInfoRepository>,
        config: &ContentConfig,
    ) -> Self {
        Self {
            teachers,
            news,
            categories,
            school_info,
            featured: CategoryOrder::new(config.featured_categories.iter().cloned()),
            directory: CategoryOrder::new(config.directory_order.iter().cloned()),
            featured_limit: config.featured_limit,
            recent_news_limit: config.recent_news_limit,
        }
    }

    /// Teachers featured on the home page
    pub async fn featured_teachers(&self) -> Result<Vec<Teacher>> {
        let teachers = self.teachers.list().await?;
        Ok(select_featured(&teachers, &self.featured, self.featured_limit))
    }

    /// Most recent news, newest first
    pub async fn recent_news(&self) -> Result<Vec<News>> {
        self.news.list_recent(self.recent_news_limit as i64).await
    }

    /// Every news item, newest first
    pub async fn all_news(&self) -> Result<Vec<News>> {
        self.news.list_all().await
    }

    /// A single item plus the full news list. Unknown ids give `news: None`.
    pub async fn news_detail(&self, id: i64) -> Result<NewsDetail> {
        let news = self.news.get_by_id(id).await?;
        let recent_news = self.news.list_all().await?;
        Ok(NewsDetail { news, recent_news })
    }

    /// Teacher directory grouped by category
    pub async fn teacher_directory(&self) -> Result<Vec<CategoryGroup>> {
        let categories = self.categories.list().await?;
        let teachers = self.teachers.list().await?;
        Ok(group_directory(categories, &teachers, &self.directory))
    }

    /// The school info record, if one exists. Never creates it.
    pub async fn school_info(&self) -> Result<Option<SchoolInfo>> {
        self.school_info.first().await
    }

    pub async fn home_page(&self) -> Result<HomePage> {
        Ok(HomePage {
            teachers: self.featured_teachers().await?,
            news: self.recent_news().await?,
            info: self.school_info().await?,
        })
    }
}

//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles CRUD operations for a specific entity.

pub mod category;
pub mod news;
pub mod school_info;
pub mod session;
pub mod social_media;
pub mod teacher;

pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use news::{NewsRepository, SqlxNewsRepository};
pub use school_info::{SchoolInfoRepository, SqlxSchoolInfoRepository};
pub use session::{SessionRepository, SqlxSessionRepository};
pub use social_media::{SocialMediaRepository, SqlxSocialMediaRepository};
pub use teacher::{SqlxTeacherRepository, TeacherRepository};

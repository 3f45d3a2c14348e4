//! Data models
//!
//! Database entities of the school site and the small composite types the
//! content queries return.

mod category;
mod news;
mod school_info;
mod session;
mod social_media;
mod teacher;

pub use category::{Category, CategoryGroup};
pub use news::News;
pub use school_info::SchoolInfo;
pub use session::{Session, ADMIN_LOGGED_KEY};
pub use social_media::{Platform, SocialMedia};
pub use teacher::Teacher;

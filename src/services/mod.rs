//! Services layer - Business logic
//!
//! Services sit between the HTTP handlers and the repositories:
//! - content queries behind the public pages
//! - validated writes for the admin panel
//! - admin sessions
//! - the contact form relay

pub mod category;
pub mod contact;
pub mod content;
pub mod media;
pub mod news;
pub mod ordering;
pub mod school_info;
pub mod session;
pub mod teacher;
pub mod validation;

pub use category::{CategoryService, CategoryServiceError};
pub use contact::{create_mailer, ContactForm, ContactRelay, Mailer, RelayError};
pub use content::{ContentService, HomePage, NewsDetail};
pub use media::{MediaStore, UploadedImage};
pub use news::{NewsService, NewsServiceError};
pub use ordering::{CategoryOrder, UNLISTED_RANK};
pub use school_info::{SchoolInfoService, SchoolInfoServiceError};
pub use session::{SessionService, SESSION_COOKIE};
pub use teacher::{TeacherService, TeacherServiceError};
pub use validation::{CategoryForm, FieldErrors, NewsForm, SchoolInfoForm, TeacherForm};

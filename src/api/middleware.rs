//! HTTP middleware and shared request plumbing
//!
//! Contains:
//! - `AppState`, the services every handler reaches through `State`
//! - session loading (`session_layer`) and the `SessionContext` extractor
//! - the admin guard (`require_admin`)
//! - `PageError` and the layer that renders it through the theme

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::convert::Infallible;
use std::sync::Arc;
use tera::Context as TeraContext;

use crate::config::Config;
use crate::db::repositories::{
    SqlxCategoryRepository, SqlxNewsRepository, SqlxSchoolInfoRepository,
    SqlxSessionRepository, SqlxTeacherRepository,
};
use crate::db::DynDatabasePool;
use crate::models::Session;
use crate::services::{
    CategoryService, ContactRelay, ContentService, Mailer, MediaStore, NewsService,
    SchoolInfoService, SessionService, TeacherService, SESSION_COOKIE,
};
use crate::theme::{simple_error_page, StandardTemplateVars, ThemeEngine};

/// Where the guard sends anonymous visitors
pub const LOGIN_PATH: &str = "/admin/login";

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub content: Arc<ContentService>,
    pub teachers: Arc<TeacherService>,
    pub news: Arc<NewsService>,
    pub categories: Arc<CategoryService>,
    pub school_info: Arc<SchoolInfoService>,
    pub sessions: Arc<SessionService>,
    pub relay: Arc<ContactRelay>,
    pub theme: Arc<ThemeEngine>,
}

impl AppState {
    /// Wire repositories and services over one pool
    pub fn new(
        config: Config,
        pool: DynDatabasePool,
        mailer: Arc<dyn Mailer>,
        theme: ThemeEngine,
    ) -> Self {
        let teacher_repo = SqlxTeacherRepository::boxed(pool.clone());
        let news_repo = SqlxNewsRepository::boxed(pool.clone());
        let category_repo = SqlxCategoryRepository::boxed(pool.clone());
        let school_info_repo = SqlxSchoolInfoRepository::boxed(pool.clone());
        let session_repo = SqlxSessionRepository::boxed(pool);

        let media = Arc::new(MediaStore::new(config.upload.clone()));

        Self {
            content: Arc::new(ContentService::new(
                teacher_repo.clone(),
                news_repo.clone(),
                category_repo.clone(),
                school_info_repo.clone(),
                &config.content,
            )),
            teachers: Arc::new(TeacherService::new(
                teacher_repo,
                category_repo.clone(),
                media.clone(),
            )),
            news: Arc::new(NewsService::new(news_repo, media)),
            categories: Arc::new(CategoryService::new(category_repo)),
            school_info: Arc::new(SchoolInfoService::new(school_info_repo)),
            sessions: Arc::new(SessionService::new(session_repo, &config.admin)),
            relay: Arc::new(ContactRelay::new(mailer, &config.mail)),
            theme: Arc::new(theme),
            config: Arc::new(config),
        }
    }

    pub fn template_vars(&self, request_path: &str) -> StandardTemplateVars {
        StandardTemplateVars::new(
            self.config.site.name.clone(),
            self.config.upload.url_prefix.clone(),
            request_path,
        )
    }

    /// Render a page with the standard variables
    pub fn render(
        &self,
        template: &str,
        context: &TeraContext,
        request_path: &str,
    ) -> Result<Html<String>, PageError> {
        self.theme
            .render_page(template, context, &self.template_vars(request_path))
            .map(Html)
            .map_err(|e| {
                tracing::error!("{:#}", e);
                PageError::internal("The page could not be displayed.")
            })
    }
}

// ============================================================================
// Sessions
// ============================================================================

/// The session attached to the current request, if any.
///
/// Inserted by [`session_layer`]; handlers take it as an extractor.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    session: Option<Session>,
}

impl SessionContext {
    pub fn new(session: Option<Session>) -> Self {
        Self { session }
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.id.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.session.as_ref().map_or(false, Session::is_admin)
    }
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Extract the session token from the cookie header
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let prefix = format!("{}=", SESSION_COOKIE);
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// `Set-Cookie` value for a fresh session
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    )
}

/// `Set-Cookie` value that removes the session cookie
pub fn expired_session_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

/// Session loading middleware
///
/// Runs for every request. A store failure is logged and the request
/// proceeds without a session.
pub async fn session_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let mut context = SessionContext::default();

    if let Some(token) = extract_session_token(request.headers()) {
        match state.sessions.load(&token).await {
            Ok(session) => context = SessionContext::new(session),
            Err(e) => tracing::warn!("Failed to load session: {:#}", e),
        }
    }

    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Admin guard: anything but a logged-in admin is sent to the login page
pub async fn require_admin(request: Request, next: Next) -> Response {
    let is_admin = request
        .extensions()
        .get::<SessionContext>()
        .map_or(false, SessionContext::is_admin);

    if !is_admin {
        tracing::debug!("Redirecting anonymous request for {}", request.uri().path());
        return Redirect::to(LOGIN_PATH).into_response();
    }

    next.run(request).await
}

// ============================================================================
// Errors
// ============================================================================

/// A failed page request.
///
/// The response carries the error in its extensions so [`error_page_layer`]
/// can swap the bare body for the themed error page.
#[derive(Debug, Clone)]
pub struct PageError {
    pub code: &'static str,
    pub message: String,
}

impl PageError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn status(&self) -> StatusCode {
        match self.code {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "BAD_REQUEST" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for PageError {
    fn from(e: anyhow::Error) -> Self {
        tracing::error!("Request failed: {:#}", e);
        Self::internal("Something went wrong.")
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, Html(simple_error_page(&self.message))).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Render any [`PageError`] response with `error.html`
pub async fn error_page_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;

    let Some(error) = response.extensions_mut().remove::<PageError>() else {
        return response;
    };

    let status = error.status();
    let mut context = TeraContext::new();
    context.insert("status", &status.as_u16());
    context.insert("error_message", &error.message);

    let html = state
        .theme
        .render_with_fallback("error.html", &context, &state.template_vars(&path));

    (status, Html(html)).into_response()
}

/// Fallback for unknown paths
pub async fn not_found() -> PageError {
    PageError::not_found("Page not found")
}

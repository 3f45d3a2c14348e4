//! Public pages

use axum::{
    extract::{Path, State},
    http::{header, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tera::Context as TeraContext;

use crate::api::middleware::{expired_session_cookie, AppState, PageError, SessionContext};

/// Build the public page router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/news/", get(news_list))
        .route("/news/{id}/", get(news_detail))
        .route("/teachers/", get(teacher_directory))
}

/// GET / - featured teachers, recent news and school info.
///
/// Visiting the public site ends an admin session.
async fn home(
    State(state): State<AppState>,
    session: SessionContext,
    uri: Uri,
) -> Result<Response, PageError> {
    let mut clear_cookie = false;
    if session.is_admin() {
        if let Some(token) = session.token() {
            state.sessions.flush(token).await?;
            clear_cookie = true;
        }
    }

    let page = state.content.home_page().await?;

    let mut context = TeraContext::new();
    context.insert("teachers", &page.teachers);
    context.insert("news", &page.news);
    context.insert("info", &page.info);

    let html = state.render("index.html", &context, uri.path())?;
    if clear_cookie {
        Ok(([(header::SET_COOKIE, expired_session_cookie())], html).into_response())
    } else {
        Ok(html.into_response())
    }
}

/// GET /news/ - every news item, newest first
async fn news_list(State(state): State<AppState>, uri: Uri) -> Result<Response, PageError> {
    let news = state.content.all_news().await?;

    let mut context = TeraContext::new();
    context.insert("news", &news);

    Ok(state.render("news.html", &context, uri.path())?.into_response())
}

/// GET /news/{id}/ - one item plus the full list. Unknown ids render an
/// empty item.
async fn news_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
) -> Result<Response, PageError> {
    let id: i64 = id
        .parse()
        .map_err(|_| PageError::not_found("Page not found"))?;

    let detail = state.content.news_detail(id).await?;

    let mut context = TeraContext::new();
    context.insert("news", &detail.news);
    context.insert("recent_news", &detail.recent_news);

    Ok(state.render("detail.html", &context, uri.path())?.into_response())
}

/// GET /teachers/ - teachers grouped by category
async fn teacher_directory(State(state): State<AppState>, uri: Uri) -> Result<Response, PageError> {
    let groups = state.content.teacher_directory().await?;

    let mut context = TeraContext::new();
    context.insert("teachers_grouped", &groups);

    Ok(state.render("teachers_list.html", &context, uri.path())?.into_response())
}

use axum::{
    extract::State,
    http::Uri,
    response::{IntoResponse, Redirect, Response},
};
use tera::Context as TeraContext;

use crate::api::middleware::{AppState, PageError};

/// GET /admin
pub async fn index() -> Redirect {
    Redirect::to("/admin/dashboard")
}

/// GET /admin/dashboard - record counts and the school info summary
pub async fn dashboard(State(state): State<AppState>, uri: Uri) -> Result<Response, PageError> {
    let mut context = TeraContext::new();
    context.insert("teachers_count", &state.teachers.count().await?);
    context.insert("news_count", &state.news.count().await?);
    context.insert("categories_count", &state.categories.count().await?);
    context.insert("info", &state.school_info.get().await?);

    Ok(state
        .render("admin_panel/dashboard.html", &context, uri.path())?
        .into_response())
}

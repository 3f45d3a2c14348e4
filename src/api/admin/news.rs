//! News management

use axum::{
    extract::{Multipart, Path, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use tera::Context as TeraContext;

use super::see_other;
use crate::api::middleware::{AppState, PageError};
use crate::api::upload::MultipartForm;
use crate::models::News;
use crate::services::{FieldErrors, NewsForm, NewsServiceError};

const LIST_PATH: &str = "/admin/news";

async fn render_list(
    state: &AppState,
    form: &NewsForm,
    errors: &FieldErrors,
    path: &str,
) -> Result<Html<String>, PageError> {
    let mut context = TeraContext::new();
    context.insert("news_list", &state.news.list().await?);
    context.insert("form", form);
    context.insert("errors", errors);
    state.render("admin_panel/news.html", &context, path)
}

fn render_edit(
    state: &AppState,
    news: &News,
    form: &NewsForm,
    errors: &FieldErrors,
    path: &str,
) -> Result<Html<String>, PageError> {
    let mut context = TeraContext::new();
    context.insert("news", news);
    context.insert("form", form);
    context.insert("errors", errors);
    state.render("admin_panel/edit_news.html", &context, path)
}

/// GET /admin/news
pub async fn list(State(state): State<AppState>, uri: Uri) -> Result<Response, PageError> {
    let html = render_list(&state, &NewsForm::default(), &FieldErrors::new(), uri.path()).await?;
    Ok(html.into_response())
}

/// POST /admin/news/add
pub async fn add(
    State(state): State<AppState>,
    uri: Uri,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let mut submitted = MultipartForm::read(multipart).await?;
    let form = submitted.news_form();

    match state.news.create(&form, submitted.take_image()).await {
        Ok(_) => Ok(see_other(LIST_PATH)),
        Err(NewsServiceError::Validation(errors)) => {
            let html = render_list(&state, &form, &errors, uri.path()).await?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, html).into_response())
        }
        Err(NewsServiceError::NotFound(_)) => Ok(see_other(LIST_PATH)),
        Err(NewsServiceError::Internal(e)) => Err(e.into()),
    }
}

/// GET /admin/news/{id}/edit
pub async fn edit_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<Response, PageError> {
    match state.news.get(id).await? {
        Some(news) => {
            let form = NewsForm::from_news(&news);
            Ok(render_edit(&state, &news, &form, &FieldErrors::new(), uri.path())?.into_response())
        }
        None => Ok(see_other(LIST_PATH)),
    }
}

/// POST /admin/news/{id}/edit
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    uri: Uri,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let mut submitted = MultipartForm::read(multipart).await?;
    let form = submitted.news_form();

    match state.news.update(id, &form, submitted.take_image()).await {
        Ok(_) => Ok(see_other(LIST_PATH)),
        Err(NewsServiceError::Validation(errors)) => match state.news.get(id).await? {
            Some(news) => Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                render_edit(&state, &news, &form, &errors, uri.path())?,
            )
                .into_response()),
            None => Ok(see_other(LIST_PATH)),
        },
        Err(NewsServiceError::NotFound(_)) => Ok(see_other(LIST_PATH)),
        Err(NewsServiceError::Internal(e)) => Err(e.into()),
    }
}

/// POST /admin/news/{id}/delete
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Response, PageError> {
    state.news.delete(id).await?;
    Ok(see_other(LIST_PATH))
}

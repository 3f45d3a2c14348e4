//! Category management
//!
//! Deleting a category keeps its teachers; they just lose the link.

use axum::{
    extract::{Form, Path, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use tera::Context as TeraContext;

use super::see_other;
use crate::api::middleware::{AppState, PageError};
use crate::models::Category;
use crate::services::{CategoryForm, CategoryServiceError, FieldErrors};

const LIST_PATH: &str = "/admin/categories";

async fn render_list(
    state: &AppState,
    form: &CategoryForm,
    errors: &FieldErrors,
    path: &str,
) -> Result<Html<String>, PageError> {
    let mut context = TeraContext::new();
    context.insert("categories", &state.categories.list().await?);
    context.insert("form", form);
    context.insert("errors", errors);
    state.render("admin_panel/categories.html", &context, path)
}

fn render_edit(
    state: &AppState,
    category: &Category,
    form: &CategoryForm,
    errors: &FieldErrors,
    path: &str,
) -> Result<Html<String>, PageError> {
    let mut context = TeraContext::new();
    context.insert("category", category);
    context.insert("form", form);
    context.insert("errors", errors);
    state.render("admin_panel/edit_category.html", &context, path)
}

/// GET /admin/categories
pub async fn list(State(state): State<AppState>, uri: Uri) -> Result<Response, PageError> {
    let html = render_list(&state, &CategoryForm::default(), &FieldErrors::new(), uri.path()).await?;
    Ok(html.into_response())
}

/// POST /admin/categories/add
pub async fn add(
    State(state): State<AppState>,
    uri: Uri,
    Form(form): Form<CategoryForm>,
) -> Result<Response, PageError> {
    match state.categories.create(&form).await {
        Ok(_) => Ok(see_other(LIST_PATH)),
        Err(CategoryServiceError::Validation(errors)) => {
            let html = render_list(&state, &form, &errors, uri.path()).await?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, html).into_response())
        }
        Err(CategoryServiceError::NotFound(_)) => Ok(see_other(LIST_PATH)),
        Err(CategoryServiceError::Internal(e)) => Err(e.into()),
    }
}

/// GET /admin/categories/{id}/edit
pub async fn edit_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<Response, PageError> {
    let Some(category) = state.categories.get(id).await? else {
        return Ok(see_other(LIST_PATH));
    };
    let form = CategoryForm::from_category(&category);
    Ok(render_edit(&state, &category, &form, &FieldErrors::new(), uri.path())?.into_response())
}

/// POST /admin/categories/{id}/edit
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    uri: Uri,
    Form(form): Form<CategoryForm>,
) -> Result<Response, PageError> {
    match state.categories.update(id, &form).await {
        Ok(_) => Ok(see_other(LIST_PATH)),
        Err(CategoryServiceError::Validation(errors)) => {
            let Some(category) = state.categories.get(id).await? else {
                return Ok(see_other(LIST_PATH));
            };
            let html = render_edit(&state, &category, &form, &errors, uri.path())?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, html).into_response())
        }
        Err(CategoryServiceError::NotFound(_)) => Ok(see_other(LIST_PATH)),
        Err(CategoryServiceError::Internal(e)) => Err(e.into()),
    }
}

/// POST /admin/categories/{id}/delete
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Response, PageError> {
    state.categories.delete(id).await?;
    Ok(see_other(LIST_PATH))
}

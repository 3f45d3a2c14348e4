//! Teacher management

use axum::{
    extract::{Multipart, Path, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use tera::Context as TeraContext;

use super::see_other;
use crate::api::middleware::{AppState, PageError};
use crate::api::upload::MultipartForm;
use crate::models::Teacher;
use crate::services::{FieldErrors, TeacherForm, TeacherServiceError};

const LIST_PATH: &str = "/admin/teachers";

async fn render_list(
    state: &AppState,
    form: &TeacherForm,
    errors: &FieldErrors,
    path: &str,
) -> Result<Html<String>, PageError> {
    let mut context = TeraContext::new();
    context.insert("teachers", &state.teachers.list().await?);
    context.insert("categories", &state.categories.list().await?);
    context.insert("form", form);
    context.insert("errors", errors);
    state.render("admin_panel/teachers.html", &context, path)
}

async fn render_edit(
    state: &AppState,
    teacher: &Teacher,
    form: &TeacherForm,
    errors: &FieldErrors,
    path: &str,
) -> Result<Html<String>, PageError> {
    let mut context = TeraContext::new();
    context.insert("teacher", teacher);
    context.insert("categories", &state.categories.list().await?);
    context.insert("form", form);
    context.insert("errors", errors);
    state.render("admin_panel/edit_teacher.html", &context, path)
}

/// GET /admin/teachers - listing plus the add form
pub async fn list(State(state): State<AppState>, uri: Uri) -> Result<Response, PageError> {
    let html = render_list(&state, &TeacherForm::default(), &FieldErrors::new(), uri.path()).await?;
    Ok(html.into_response())
}

/// POST /admin/teachers/add
pub async fn add(
    State(state): State<AppState>,
    uri: Uri,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let mut submitted = MultipartForm::read(multipart).await?;
    let form = submitted.teacher_form();

    match state.teachers.create(&form, submitted.take_image()).await {
        Ok(_) => Ok(see_other(LIST_PATH)),
        Err(TeacherServiceError::Validation(errors)) => {
            let html = render_list(&state, &form, &errors, uri.path()).await?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, html).into_response())
        }
        Err(TeacherServiceError::NotFound(_)) => Ok(see_other(LIST_PATH)),
        Err(TeacherServiceError::Internal(e)) => Err(e.into()),
    }
}

/// GET /admin/teachers/{id}/edit
pub async fn edit_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<Response, PageError> {
    let Some(teacher) = state.teachers.get(id).await? else {
        return Ok(see_other(LIST_PATH));
    };

    let form = TeacherForm::from_teacher(&teacher);
    let html = render_edit(&state, &teacher, &form, &FieldErrors::new(), uri.path()).await?;
    Ok(html.into_response())
}

/// POST /admin/teachers/{id}/edit - a blank image part keeps the current one
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    uri: Uri,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let mut submitted = MultipartForm::read(multipart).await?;
    let form = submitted.teacher_form();

    match state.teachers.update(id, &form, submitted.take_image()).await {
        Ok(_) => Ok(see_other(LIST_PATH)),
        Err(TeacherServiceError::Validation(errors)) => {
            let Some(teacher) = state.teachers.get(id).await? else {
                return Ok(see_other(LIST_PATH));
            };
            let html = render_edit(&state, &teacher, &form, &errors, uri.path()).await?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, html).into_response())
        }
        Err(TeacherServiceError::NotFound(_)) => Ok(see_other(LIST_PATH)),
        Err(TeacherServiceError::Internal(e)) => Err(e.into()),
    }
}

/// POST /admin/teachers/{id}/delete
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Response, PageError> {
    if !state.teachers.delete(id).await? {
        tracing::debug!("Teacher {} already gone", id);
    }
    Ok(see_other(LIST_PATH))
}

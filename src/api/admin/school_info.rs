//! School info editor (single record)

use axum::{
    extract::{Form, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use tera::Context as TeraContext;

use super::see_other;
use crate::api::middleware::{AppState, PageError};
use crate::services::{FieldErrors, SchoolInfoForm, SchoolInfoServiceError};

fn render_form(
    state: &AppState,
    form: &SchoolInfoForm,
    errors: &FieldErrors,
    path: &str,
) -> Result<Html<String>, PageError> {
    let mut context = TeraContext::new();
    context.insert("form", form);
    context.insert("errors", errors);
    state.render("admin_panel/school_info.html", &context, path)
}

/// GET /admin/school-info - the record is created on first visit
pub async fn edit_page(State(state): State<AppState>, uri: Uri) -> Result<Response, PageError> {
    let info = state.school_info.get_or_create().await?;
    let form = SchoolInfoForm::from_info(&info);
    Ok(render_form(&state, &form, &FieldErrors::new(), uri.path())?.into_response())
}

/// POST /admin/school-info
pub async fn edit(
    State(state): State<AppState>,
    uri: Uri,
    Form(form): Form<SchoolInfoForm>,
) -> Result<Response, PageError> {
    match state.school_info.update(&form).await {
        Ok(_) => Ok(see_other("/admin/dashboard")),
        Err(SchoolInfoServiceError::Validation(errors)) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            render_form(&state, &form, &errors, uri.path())?,
        )
            .into_response()),
        Err(SchoolInfoServiceError::Internal(e)) => Err(e.into()),
    }
}

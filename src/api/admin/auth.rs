//! Admin login and logout

use axum::{
    extract::{Form, State},
    http::{header, Uri},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tera::Context as TeraContext;

use crate::api::middleware::{
    expired_session_cookie, session_cookie, AppState, PageError, SessionContext, LOGIN_PATH,
};

/// Shown for every failed attempt
pub const INVALID_PASSWORD: &str = "Invalid password";

const DASHBOARD_PATH: &str = "/admin/dashboard";

/// Submitted login form
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

fn render_login(state: &AppState, error: Option<&str>, path: &str) -> Result<Response, PageError> {
    let mut context = TeraContext::new();
    context.insert("error", &error);
    Ok(state.render("admin_panel/login.html", &context, path)?.into_response())
}

/// GET /admin/login
pub async fn login_page(
    State(state): State<AppState>,
    session: SessionContext,
    uri: Uri,
) -> Result<Response, PageError> {
    if session.is_admin() {
        return Ok(Redirect::to(DASHBOARD_PATH).into_response());
    }
    render_login(&state, None, uri.path())
}

/// POST /admin/login
pub async fn login(
    State(state): State<AppState>,
    session: SessionContext,
    uri: Uri,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    match state.sessions.login(session.token(), &form.password).await? {
        Some(new_session) => {
            let cookie = session_cookie(&new_session.id, state.sessions.max_age_secs());
            Ok((
                [(header::SET_COOKIE, cookie)],
                Redirect::to(DASHBOARD_PATH),
            )
                .into_response())
        }
        None => render_login(&state, Some(INVALID_PASSWORD), uri.path()),
    }
}

/// GET /admin/logout
pub async fn logout(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Response, PageError> {
    if let Some(token) = session.token() {
        state.sessions.flush(token).await?;
        tracing::info!("Admin logged out");
    }

    Ok((
        [(header::SET_COOKIE, expired_session_cookie())],
        Redirect::to(LOGIN_PATH),
    )
        .into_response())
}

//! Admin panel
//!
//! Login and logout are open; every other `/admin` route sits behind
//! [`require_admin`].

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod news;
pub mod school_info;
pub mod teachers;

use axum::{
    middleware as axum_middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};

use crate::api::middleware::{require_admin, AppState};

/// Build the admin router
pub fn router() -> Router<AppState> {
    let guarded = Router::new()
        .route("/admin", get(dashboard::index))
        .route("/admin/", get(dashboard::index))
        .route("/admin/dashboard", get(dashboard::dashboard))
        .route(
            "/admin/school-info",
            get(school_info::edit_page).post(school_info::edit),
        )
        // Teachers
        .route("/admin/teachers", get(teachers::list))
        .route("/admin/teachers/add", post(teachers::add))
        .route(
            "/admin/teachers/{id}/edit",
            get(teachers::edit_page).post(teachers::edit),
        )
        .route("/admin/teachers/{id}/delete", post(teachers::delete))
        // News
        .route("/admin/news", get(news::list))
        .route("/admin/news/add", post(news::add))
        .route("/admin/news/{id}/edit", get(news::edit_page).post(news::edit))
        .route("/admin/news/{id}/delete", post(news::delete))
        // Categories
        .route("/admin/categories", get(categories::list))
        .route("/admin/categories/add", post(categories::add))
        .route(
            "/admin/categories/{id}/edit",
            get(categories::edit_page).post(categories::edit),
        )
        .route("/admin/categories/{id}/delete", post(categories::delete))
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/admin/login", get(auth::login_page).post(auth::login))
        .route("/admin/logout", get(auth::logout))
        .merge(guarded)
}

/// 303 to an admin listing
pub(crate) fn see_other(path: &str) -> Response {
    Redirect::to(path).into_response()
}

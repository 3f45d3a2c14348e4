//! HTTP layer - handlers and routing
//!
//! - Public pages (home, news, teacher directory)
//! - Contact form endpoint
//! - Admin panel behind the session guard
//! - Uploaded media served from the upload directory

pub mod admin;
pub mod contact;
pub mod middleware;
pub mod public;
pub mod upload;


use axum::{extract::DefaultBodyLimit, middleware as axum_middleware, routing::any, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use middleware::{AppState, PageError, SessionContext};

/// Room for the text fields that travel with an image
const FORM_OVERHEAD: u64 = 1024 * 1024;

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    let upload = &state.config.upload;
    let media_prefix = match upload.url_prefix.trim_end_matches('/') {
        "" => "/media".to_string(),
        prefix if prefix.starts_with('/') => prefix.to_string(),
        prefix => format!("/{}", prefix),
    };
    let body_limit = usize::try_from(upload.max_file_size + FORM_OVERHEAD).unwrap_or(usize::MAX);

    Router::new()
        .merge(public::router())
        .route("/contact/", any(contact::contact))
        .merge(admin::router())
        .nest_service(&media_prefix, ServeDir::new(&upload.path))
        .fallback(middleware::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::error_page_layer,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::session_layer,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

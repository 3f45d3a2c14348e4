//! Contact form endpoint
//!
//! Answers with a small JSON status object; the page script only looks at
//! `status`.

use axum::{
    extract::{rejection::FormRejection, Form, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::api::middleware::AppState;
use crate::services::{ContactForm, RelayError};

/// Response body for the contact endpoint
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub status: &'static str,
}

impl ContactResponse {
    fn ok() -> Response {
        (StatusCode::OK, Json(Self { status: "ok" })).into_response()
    }

    fn error(code: StatusCode) -> Response {
        (code, Json(Self { status: "error" })).into_response()
    }
}

/// ANY /contact/ - relay a message to the school's address.
///
/// Only POST is accepted. Missing fields give 400, a failed delivery 500.
pub async fn contact(
    State(state): State<AppState>,
    method: Method,
    form: Result<Form<ContactForm>, FormRejection>,
) -> Response {
    if method != Method::POST {
        return ContactResponse::error(StatusCode::BAD_REQUEST);
    }

    let Form(form) = match form {
        Ok(form) => form,
        Err(e) => {
            tracing::debug!("Rejected contact form: {}", e);
            return ContactResponse::error(StatusCode::BAD_REQUEST);
        }
    };

    match state.relay.relay(&form).await {
        Ok(()) => ContactResponse::ok(),
        Err(RelayError::MissingField(field)) => {
            tracing::debug!("Contact form missing {}", field);
            ContactResponse::error(StatusCode::BAD_REQUEST)
        }
        Err(RelayError::Delivery(_)) => ContactResponse::error(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

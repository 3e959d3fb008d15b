//! Application error type with HTTP response conversion.
//!
//! Every handler returns `Result<_, AppError>`. The error carries the status
//! code it should be rendered with and an [`anyhow::Error`] for the message,
//! so services can attach context freely and still decide the status.

use std::fmt;

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    fn with_status(status: StatusCode, err: impl Into<Error>) -> Self {
        Self {
            status,
            error: err.into(),
        }
    }

    /// Any failure the caller cannot act on. The message is still returned.
    pub fn internal(err: impl Into<Error>) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: String) -> Self {
        Self::internal(anyhow::anyhow!(message))
    }

    pub fn not_found(err: impl Into<Error>) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request(err: impl Into<Error>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, err)
    }

    pub fn unprocessable(err: impl Into<Error>) -> Self {
        Self::with_status(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    /// No session, or credentials that did not verify.
    pub fn unauthorized(message: String) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message))
    }

    /// A live session that may not use the resource.
    pub fn forbidden(message: String) -> Self {
        Self::with_status(StatusCode::FORBIDDEN, anyhow::anyhow!(message))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.error, self.status.as_u16())
    }
}

/// Renders `{"error": "..."}`. Server errors are logged with their full
/// context chain before the body is built.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = self.status.as_u16(), error = ?self.error, "Request failed");
        }

        (self.status, Json(json!({ "error": self.error.to_string() }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

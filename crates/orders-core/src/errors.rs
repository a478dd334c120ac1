use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// An error that already knows the HTTP status it should be rendered with.
///
/// Every constructor logs the message at error level, so call sites only
/// build the value and return it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// A 500 error.
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_status(message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn with_status(message: impl Into<String>, status: StatusCode) -> Self {
        let message = message.into();
        tracing::error!("{}", message);
        Self { status, message }
    }

    /// Prefixes the message with the status' reason phrase, e.g.
    /// `Unprocessable Entity: ...`.
    pub fn with_reason(message: &str, status: StatusCode) -> Self {
        let reason = status.canonical_reason().unwrap_or("Error");
        Self::with_status(format!("{reason}: {message}"), status)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            message: &self.message,
        });
        (self.status, body).into_response()
    }
}

//! Field-level validation errors and the 422 response built from them.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub location: Location,
    pub msg: String,
    pub param: String,
}

impl FieldError {
    pub fn body(param: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            location: Location::Body,
            msg: msg.into(),
            param: param.into(),
        }
    }
}

/// Errors accumulated while validating one request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn array(&self) -> &[FieldError] {
        &self.errors
    }
}

impl From<&validator::ValidationErrors> for ValidationErrors {
    fn from(e: &validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = e.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        let errors = fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    let msg = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    FieldError::body(field.to_string(), msg)
                })
            })
            .collect();
        Self { errors }
    }
}

#[derive(Serialize)]
struct ErrorsBody<'a> {
    errors: &'a [FieldError],
}

/// Logs the failures and renders them as `422 {"errors": [...]}`.
pub fn respond_validation_errors(errors: &ValidationErrors) -> Response {
    tracing::error!(errors = ?errors.array(), "Validation failure");
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorsBody {
            errors: errors.array(),
        }),
    )
        .into_response()
}

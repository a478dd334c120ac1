use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use validator::ValidateEmail;

use crate::application::data_service::DataService;
use crate::errors::AppError;
use orders_types::ports::Repository;

pub const EMAIL_HEADER: &str = "email";

/// Resolves the caller from the `email` header and stores the `User` in the
/// request extensions for the handlers behind it.
pub async fn resolve_user<R>(
    State(service): State<Arc<DataService<R>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError>
where
    R: Repository,
{
    let email = request
        .headers()
        .get(EMAIL_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .filter(|email: &String| email.validate_email())
        .ok_or_else(|| {
            AppError::with_reason(
                "header should contain a valid email",
                StatusCode::UNPROCESSABLE_ENTITY,
            )
        })?;

    let user = service.find_or_save_user(&email).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

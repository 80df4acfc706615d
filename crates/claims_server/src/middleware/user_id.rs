//! Caller identity from the `x-userid` header.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-userid";

/// Identity of the caller, inserted as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(pub String);

/// Rejects requests without a non-blank `x-userid` header; otherwise makes
/// the id available to handlers as `Extension<UserId>`.
pub async fn require_user_id(mut request: Request, next: Next) -> Result<Response, AppError> {
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| AppError::BadRequest("Unauthorized: userId header is missing".into()))?;

    tracing::debug!(user_id = %user_id, path = %request.uri().path(), "caller identified");
    request.extensions_mut().insert(UserId(user_id));
    Ok(next.run(request).await)
}

//! HTTP error mapping.
//!
//! Every failure renders as
//! `{statusCode, code, message, errors?, timestamp}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use claims_core::error::ClaimsError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Claims(#[from] ClaimsError),

    /// Malformed request or missing identity, rejected before the service.
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    status_code: u16,
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [String]>,
    timestamp: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, errors) = match &self {
            AppError::Claims(e) => (
                StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                e.code().as_str(),
                e.details(),
            ),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", &[][..]),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        // Internal details stay in the log.
        let message = match &self {
            AppError::Claims(ClaimsError::Internal(_)) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = ErrorBody {
            status_code: status.as_u16(),
            code,
            message,
            errors: (!errors.is_empty()).then_some(errors),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_failure_lists_every_error() {
        let err = ClaimsError::InvalidAttributes(vec![
            "Invalid attribute x provided".into(),
            "Attribute y is required".into(),
        ]);
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["code"], "INVALID_ARGUMENT");
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid claim attributes:\n"));
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn not_found_has_no_errors_field() {
        let (status, body) = render(ClaimsError::NotFound("Claim 3 not found".into()).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn internal_errors_are_masked() {
        let err = ClaimsError::Internal(anyhow::anyhow!("password=hunter2"));
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }
}

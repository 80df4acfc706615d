//! GET|PUT /api/claims/config
//!
//! Store faults come back in the body as `success: false`; the HTTP status
//! stays 200 for both routes.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use claims_core::proto::{ClaimConfigResponse, ClaimConfigUpdateRequest};
use claims_core::service::ClaimsService;

use crate::error::AppError;

pub async fn get_config(
    Extension(service): Extension<Arc<dyn ClaimsService>>,
) -> Json<ClaimConfigResponse> {
    Json(service.get_config().await)
}

pub async fn update_config(
    Extension(service): Extension<Arc<dyn ClaimsService>>,
    body: Result<Json<ClaimConfigUpdateRequest>, JsonRejection>,
) -> Result<Json<ClaimConfigResponse>, AppError> {
    let Json(req) = body?;
    Ok(Json(service.update_config(req).await))
}

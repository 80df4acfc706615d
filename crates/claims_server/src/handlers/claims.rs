//! Claim CRUD routes. The owning user always comes from the `x-userid`
//! header and overrides anything in the body.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{Extension, Json};
use claims_core::claim::ClaimStatus;
use claims_core::proto::*;
use claims_core::service::ClaimsService;
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::user_id::UserId;

/// Query string of `GET /api/claims`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListClaimsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<String>,
    pub search: Option<String>,
}

pub async fn create_claim(
    Extension(service): Extension<Arc<dyn ClaimsService>>,
    Extension(UserId(user_id)): Extension<UserId>,
    body: Result<Json<CreateClaimRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateClaimResponse>), AppError> {
    let Json(mut req) = body?;
    req.user_id = user_id;
    let resp = service.create_claim(req).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

pub async fn list_claims(
    Extension(service): Extension<Arc<dyn ClaimsService>>,
    Extension(UserId(user_id)): Extension<UserId>,
    query: Result<Query<ListClaimsQuery>, QueryRejection>,
) -> Result<Json<GetClaimsResponse>, AppError> {
    let Query(query) = query?;
    let status = query
        .status
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<ClaimStatus>())
        .transpose()?;

    let req = GetClaimsRequest {
        user_id,
        page: query.page,
        page_size: query.page_size,
        status,
        search: query.search,
    };
    Ok(Json(service.get_claims(req).await?))
}

pub async fn get_claim(
    Extension(service): Extension<Arc<dyn ClaimsService>>,
    Extension(UserId(user_id)): Extension<UserId>,
    claim_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<GetClaimResponse>, AppError> {
    let Path(claim_id) = claim_id?;
    let resp = service.get_claim(GetClaimRequest { claim_id, user_id }).await?;
    Ok(Json(resp))
}

pub async fn update_claim(
    Extension(service): Extension<Arc<dyn ClaimsService>>,
    Extension(UserId(user_id)): Extension<UserId>,
    claim_id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateClaimRequest>, JsonRejection>,
) -> Result<Json<UpdateClaimResponse>, AppError> {
    let Path(claim_id) = claim_id?;
    let Json(mut req) = body?;
    req.claim_id = claim_id;
    req.user_id = user_id;
    Ok(Json(service.update_claim(req).await?))
}

pub async fn delete_claim(
    Extension(service): Extension<Arc<dyn ClaimsService>>,
    Extension(UserId(user_id)): Extension<UserId>,
    claim_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteClaimResponse>, AppError> {
    let Path(claim_id) = claim_id?;
    let resp = service
        .delete_claim(DeleteClaimRequest { claim_id, user_id })
        .await?;
    Ok(Json(resp))
}

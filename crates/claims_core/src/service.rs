//! ClaimsService: orchestration over the store ports.
//!
//! Every mutation fetches the current configuration, validates against that
//! snapshot and only then touches the claim store. Claim operations propagate
//! failures as [`ClaimsError`]; the two config operations fold store faults
//! into a `success: false` [`ClaimConfigResponse`] instead.

use std::sync::Arc;

use async_trait::async_trait;

use crate::claim::{parse_claim_date, ClaimFilter, ClaimPatch, ClaimStatus, NewClaim, PageRequest};
use crate::config::ClaimConfigDocument;
use crate::error::ClaimsError;
use crate::ports::{ClaimStore, ConfigStore};
use crate::proto::*;
use crate::schema::check_document;
use crate::validate::validate_claim_attributes;

pub type Result<T> = std::result::Result<T, ClaimsError>;

// ── ClaimsService trait ───────────────────────────────────────

#[async_trait]
pub trait ClaimsService: Send + Sync {
    /// Validate and persist a new claim. Status is always `OPEN`.
    async fn create_claim(&self, req: CreateClaimRequest) -> Result<CreateClaimResponse>;

    async fn get_claim(&self, req: GetClaimRequest) -> Result<GetClaimResponse>;

    async fn get_claims(&self, req: GetClaimsRequest) -> Result<GetClaimsResponse>;

    /// Validate and apply an update. Claims in review cannot be changed.
    async fn update_claim(&self, req: UpdateClaimRequest) -> Result<UpdateClaimResponse>;

    async fn delete_claim(&self, req: DeleteClaimRequest) -> Result<DeleteClaimResponse>;

    async fn get_config(&self) -> ClaimConfigResponse;

    /// Replace the configuration document after a structural check.
    async fn update_config(&self, req: ClaimConfigUpdateRequest) -> ClaimConfigResponse;
}

// ── ClaimsServiceImpl ─────────────────────────────────────────

pub struct ClaimsServiceImpl {
    pub claims: Arc<dyn ClaimStore>,
    pub configs: Arc<dyn ConfigStore>,
}

impl ClaimsServiceImpl {
    pub fn new(claims: Arc<dyn ClaimStore>, configs: Arc<dyn ConfigStore>) -> Self {
        Self { claims, configs }
    }

    /// Current configuration snapshot; an unset document is an empty one.
    async fn current_config(&self) -> Result<ClaimConfigDocument> {
        Ok(self.configs.load().await?.unwrap_or_default())
    }
}

fn not_found_or_in_review(claim_id: i64) -> ClaimsError {
    ClaimsError::NotFound(format!("Claim {claim_id} not found or in review"))
}

#[async_trait]
impl ClaimsService for ClaimsServiceImpl {
    async fn create_claim(&self, mut req: CreateClaimRequest) -> Result<CreateClaimResponse> {
        req.status = Some(ClaimStatus::Open);

        let config = self.current_config().await?;
        if let Err(e) = validate_claim_attributes(&req, &config) {
            tracing::debug!(user_id = %req.user_id, errors = e.details().len(), "claim rejected");
            return Err(e);
        }

        let new_claim = NewClaim {
            date_of_incident: parse_claim_date("dateOfIncident", &req.date_of_incident)?,
            date_of_submission: parse_claim_date("dateOfSubmission", &req.date_of_submission)?,
            user_id: req.user_id,
            policy_id: req.policy_id,
            description: req.description,
            incident_type: req.incident_type,
            status: ClaimStatus::Open,
            attributes: req.attributes,
        };

        let created = self
            .claims
            .insert(new_claim)
            .await?
            .ok_or(ClaimsError::CreationFailed)?;
        tracing::info!(claim_id = created.claim_id, user_id = %created.user_id, "claim created");

        Ok(CreateClaimResponse::ok(
            201,
            "Claim created successfully",
            CreatedClaim {
                claim_id: created.claim_id,
            },
        ))
    }

    async fn get_claim(&self, req: GetClaimRequest) -> Result<GetClaimResponse> {
        let claim = self
            .claims
            .find_owned(req.claim_id, &req.user_id)
            .await?
            .ok_or_else(|| ClaimsError::NotFound(format!("Claim {} not found", req.claim_id)))?;

        Ok(GetClaimResponse::ok(
            200,
            "Claim retrieved successfully",
            ClaimBody {
                claim: claim.into(),
            },
        ))
    }

    async fn get_claims(&self, req: GetClaimsRequest) -> Result<GetClaimsResponse> {
        let page = PageRequest::new(req.page, req.page_size);
        let filter = ClaimFilter {
            user_id: req.user_id,
            status: req.status,
            search: req.search.filter(|s| !s.trim().is_empty()),
        };

        let (claims, total) = self.claims.list(&filter, page).await?;

        Ok(GetClaimsResponse::ok(
            200,
            "Claims retrieved successfully",
            ClaimList {
                claims: claims.into_iter().map(Into::into).collect(),
                meta: PageMeta {
                    total,
                    page: page.page,
                    limit: page.page_size,
                },
            },
        ))
    }

    async fn update_claim(&self, req: UpdateClaimRequest) -> Result<UpdateClaimResponse> {
        let config = self.current_config().await?;
        if let Err(e) = validate_claim_attributes(&req, &config) {
            tracing::debug!(claim_id = req.claim_id, errors = e.details().len(), "update rejected");
            return Err(e);
        }

        self.claims
            .find_mutable(req.claim_id, &req.user_id)
            .await?
            .ok_or_else(|| not_found_or_in_review(req.claim_id))?;

        let patch = ClaimPatch {
            description: req.description,
            attributes: req.attributes,
            status: req.status,
            rejection_reason: req.rejection_reason,
        };
        // The store re-checks ownership and lock state in the same write.
        let updated = self
            .claims
            .update(req.claim_id, &req.user_id, patch)
            .await?
            .ok_or_else(|| not_found_or_in_review(req.claim_id))?;
        tracing::info!(claim_id = updated.claim_id, status = %updated.status, "claim updated");

        Ok(UpdateClaimResponse::ok(
            200,
            "Claim updated successfully",
            UpdatedClaim {
                updated_claim: updated.into(),
            },
        ))
    }

    async fn delete_claim(&self, req: DeleteClaimRequest) -> Result<DeleteClaimResponse> {
        self.claims
            .find_mutable(req.claim_id, &req.user_id)
            .await?
            .ok_or_else(|| not_found_or_in_review(req.claim_id))?;

        if !self.claims.delete(req.claim_id, &req.user_id).await? {
            return Err(not_found_or_in_review(req.claim_id));
        }
        tracing::info!(claim_id = req.claim_id, "claim deleted");

        Ok(DeleteClaimResponse::ok(200, "Claim deleted successfully", Empty {}))
    }

    async fn get_config(&self) -> ClaimConfigResponse {
        match self.configs.load().await {
            Ok(document) => ClaimConfigResponse::ok(
                document.unwrap_or_default(),
                "Config retrieved successfully",
            ),
            Err(e) => {
                tracing::error!(error = %e, "failed to load claim config");
                ClaimConfigResponse::failure(500, e.to_string())
            }
        }
    }

    async fn update_config(&self, req: ClaimConfigUpdateRequest) -> ClaimConfigResponse {
        let problems = check_document(&req.request);
        if !problems.is_empty() {
            tracing::debug!(problems = problems.len(), "claim config rejected");
            return ClaimConfigResponse::failure(400, problems.join("\n"));
        }

        match self.configs.save(&req.request).await {
            Ok(saved) => {
                tracing::info!(steps = saved.steps.len(), "claim config replaced");
                ClaimConfigResponse::ok(saved, "Config saved successfully")
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save claim config");
                ClaimConfigResponse::failure(500, e.to_string())
            }
        }
    }
}

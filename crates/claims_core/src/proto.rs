//! Request and response shapes shared by every transport.
//!
//! Field names follow the camelCase wire contract of the admin console and
//! gateway. Responses carry the `{message, success, status}` envelope with the
//! payload flattened next to it.

use serde::{Deserialize, Serialize};

use crate::attribute::{AttributeMap, AttributeValue};
use crate::claim::{ClaimStatus, ClaimView};
use crate::config::{ClaimConfigDocument, Step};
use crate::validate::ClaimPayload;

// ── Requests ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClaimRequest {
    #[serde(default)]
    pub user_id: String,
    pub policy_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attributes: AttributeMap,
    pub date_of_incident: String,
    pub date_of_submission: String,
    pub incident_type: String,
    /// Ignored on intake; new claims always start `OPEN`.
    #[serde(default)]
    pub status: Option<ClaimStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClaimRequest {
    #[serde(default)]
    pub claim_id: i64,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attributes: AttributeMap,
    pub status: ClaimStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetClaimRequest {
    pub claim_id: i64,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetClaimsRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
    #[serde(default)]
    pub status: Option<ClaimStatus>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteClaimRequest {
    pub claim_id: i64,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimConfigUpdateRequest {
    pub request: ClaimConfigDocument,
}

impl ClaimPayload for CreateClaimRequest {
    fn top_level_field(&self, key: &str) -> Option<AttributeValue> {
        let value = match key {
            "userId" => self.user_id.as_str(),
            "policyId" => self.policy_id.as_str(),
            "description" => self.description.as_str(),
            "dateOfIncident" => self.date_of_incident.as_str(),
            "dateOfSubmission" => self.date_of_submission.as_str(),
            "incidentType" => self.incident_type.as_str(),
            "status" => return self.status.map(|s| AttributeValue::from(s.as_str())),
            _ => return None,
        };
        Some(AttributeValue::from(value))
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

impl ClaimPayload for UpdateClaimRequest {
    fn top_level_field(&self, key: &str) -> Option<AttributeValue> {
        match key {
            "claimId" => Some(AttributeValue::Number(self.claim_id as f64)),
            "userId" => Some(AttributeValue::from(self.user_id.as_str())),
            "description" => Some(AttributeValue::from(self.description.as_str())),
            "status" => Some(AttributeValue::from(self.status.as_str())),
            "rejectionReason" => self.rejection_reason.as_deref().map(AttributeValue::from),
            _ => None,
        }
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

// ── Responses ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    pub success: bool,
    pub status: u16,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> Envelope<T> {
    pub fn ok(status: u16, message: impl Into<String>, payload: T) -> Self {
        Self {
            message: message.into(),
            success: true,
            status,
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedClaim {
    pub claim_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimBody {
    pub claim: ClaimView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedClaim {
    pub updated_claim: ClaimView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimList {
    pub claims: Vec<ClaimView>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Empty {}

pub type CreateClaimResponse = Envelope<CreatedClaim>;
pub type GetClaimResponse = Envelope<ClaimBody>;
pub type GetClaimsResponse = Envelope<ClaimList>;
pub type UpdateClaimResponse = Envelope<UpdatedClaim>;
pub type DeleteClaimResponse = Envelope<Empty>;

/// Config responses never fail at the transport level: store faults and
/// rejected documents come back as `success: false` with a status code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimConfigResponse {
    pub data: Vec<Step>,
    pub message: String,
    pub status: u16,
    pub success: bool,
}

impl ClaimConfigResponse {
    pub fn ok(document: ClaimConfigDocument, message: impl Into<String>) -> Self {
        Self {
            data: document.steps,
            message: message.into(),
            status: 200,
            success: true,
        }
    }

    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            message: message.into(),
            status,
            success: false,
        }
    }
}

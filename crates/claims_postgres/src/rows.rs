//! Row types for `sqlx::query_as` and their conversion into core records.

use chrono::{DateTime, Utc};

use claims_core::attribute::AttributeMap;
use claims_core::claim::{ClaimRecord, ClaimStatus};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PgClaimRow {
    pub claim_id: i64,
    pub user_id: String,
    pub policy_id: String,
    pub description: String,
    pub incident_type: String,
    pub status: String,
    pub attributes: serde_json::Value,
    pub date_of_incident: DateTime<Utc>,
    pub date_of_submission: DateTime<Utc>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgClaimRow> for ClaimRecord {
    type Error = String;

    fn try_from(row: PgClaimRow) -> Result<Self, Self::Error> {
        let status: ClaimStatus = row
            .status
            .parse()
            .map_err(|e| format!("claim {}: {e}", row.claim_id))?;
        let attributes: AttributeMap = serde_json::from_value(row.attributes)
            .map_err(|e| format!("claim {} attributes: {e}", row.claim_id))?;
        Ok(ClaimRecord {
            claim_id: row.claim_id,
            user_id: row.user_id,
            policy_id: row.policy_id,
            description: row.description,
            incident_type: row.incident_type,
            status,
            attributes,
            date_of_incident: row.date_of_incident,
            date_of_submission: row.date_of_submission,
            created_at: row.created_at,
            updated_at: row.updated_at,
            rejection_reason: row.rejection_reason,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PgConfigRow {
    /// Document text exactly as stored.
    pub request: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn row(status: &str, attributes: serde_json::Value) -> PgClaimRow {
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        PgClaimRow {
            claim_id: 7,
            user_id: "u1".into(),
            policy_id: "P".into(),
            description: String::new(),
            incident_type: "Theft".into(),
            status: status.into(),
            attributes,
            date_of_incident: ts,
            date_of_submission: ts,
            rejection_reason: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn converts_valid_row() {
        let record = ClaimRecord::try_from(row("IN_REVIEW", json!({"colour": "red", "n": 2})))
            .unwrap();
        assert_eq!(record.status, ClaimStatus::InReview);
        assert_eq!(record.attributes.len(), 2);
    }

    #[test]
    fn rejects_unknown_status_and_non_object_attributes() {
        let err = ClaimRecord::try_from(row("ARCHIVED", json!({}))).unwrap_err();
        assert!(err.contains("claim 7"));
        assert!(ClaimRecord::try_from(row("OPEN", json!([1, 2]))).is_err());
    }
}

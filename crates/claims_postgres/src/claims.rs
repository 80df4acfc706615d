//! `PgClaimStore`: claims table adapter.

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::PgPool;

use claims_core::attribute::AttributeMap;
use claims_core::claim::{ClaimFilter, ClaimPatch, ClaimRecord, NewClaim, PageRequest};
use claims_core::error::ClaimsError;
use claims_core::ports::{ClaimStore, Result};

use crate::rows::PgClaimRow;

const CLAIM_COLUMNS: &str = "claim_id, user_id, policy_id, description, incident_type, status, \
     attributes, date_of_incident, date_of_submission, rejection_reason, created_at, updated_at";

pub struct PgClaimStore {
    pool: PgPool,
}

impl PgClaimStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_record(row: PgClaimRow) -> Result<ClaimRecord> {
    row.try_into()
        .map_err(|e: String| ClaimsError::Internal(anyhow!(e)))
}

fn attributes_json(attributes: &AttributeMap) -> Result<serde_json::Value> {
    serde_json::to_value(attributes).map_err(|e| ClaimsError::Internal(anyhow!(e)))
}

/// `ILIKE` pattern matching `term` anywhere, with wildcards in the term escaped.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl ClaimStore for PgClaimStore {
    async fn insert(&self, claim: NewClaim) -> Result<Option<ClaimRecord>> {
        let query = format!(
            r#"
            INSERT INTO claims (user_id, policy_id, description, incident_type, status,
                                attributes, date_of_incident, date_of_submission)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {CLAIM_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, PgClaimRow>(&query)
            .bind(&claim.user_id)
            .bind(&claim.policy_id)
            .bind(&claim.description)
            .bind(&claim.incident_type)
            .bind(claim.status.as_str())
            .bind(attributes_json(&claim.attributes)?)
            .bind(claim.date_of_incident)
            .bind(claim.date_of_submission)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;
        row.map(to_record).transpose()
    }

    async fn find_owned(&self, claim_id: i64, user_id: &str) -> Result<Option<ClaimRecord>> {
        let query = format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_id = $1 AND user_id = $2"
        );
        let row = sqlx::query_as::<_, PgClaimRow>(&query)
            .bind(claim_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;
        row.map(to_record).transpose()
    }

    async fn find_mutable(&self, claim_id: i64, user_id: &str) -> Result<Option<ClaimRecord>> {
        let query = format!(
            r#"
            SELECT {CLAIM_COLUMNS} FROM claims
            WHERE claim_id = $1 AND user_id = $2 AND status <> 'IN_REVIEW'
            "#
        );
        let row = sqlx::query_as::<_, PgClaimRow>(&query)
            .bind(claim_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;
        row.map(to_record).transpose()
    }

    async fn update(
        &self,
        claim_id: i64,
        user_id: &str,
        patch: ClaimPatch,
    ) -> Result<Option<ClaimRecord>> {
        let query = format!(
            r#"
            UPDATE claims
            SET description = $3,
                attributes = $4,
                status = $5,
                rejection_reason = $6,
                updated_at = now()
            WHERE claim_id = $1 AND user_id = $2 AND status <> 'IN_REVIEW'
            RETURNING {CLAIM_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, PgClaimRow>(&query)
            .bind(claim_id)
            .bind(user_id)
            .bind(&patch.description)
            .bind(attributes_json(&patch.attributes)?)
            .bind(patch.status.as_str())
            .bind(&patch.rejection_reason)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;
        row.map(to_record).transpose()
    }

    async fn delete(&self, claim_id: i64, user_id: &str) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM claims WHERE claim_id = $1 AND user_id = $2 AND status <> 'IN_REVIEW'",
        )
        .bind(claim_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        filter: &ClaimFilter,
        page: PageRequest,
    ) -> Result<(Vec<ClaimRecord>, i64)> {
        const WHERE: &str = r#"
            WHERE user_id = $1
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL OR incident_type ILIKE $3 OR policy_id ILIKE $3)
        "#;
        let status = filter.status.map(|s| s.as_str());
        let search = filter.search.as_deref().map(contains_pattern);

        let query = format!(
            "SELECT {CLAIM_COLUMNS} FROM claims {WHERE} \
             ORDER BY created_at DESC, claim_id DESC LIMIT $4 OFFSET $5"
        );
        let rows = sqlx::query_as::<_, PgClaimRow>(&query)
            .bind(&filter.user_id)
            .bind(status)
            .bind(&search)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM claims {WHERE}"))
            .bind(&filter.user_id)
            .bind(status)
            .bind(&search)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;

        let claims = rows
            .into_iter()
            .map(to_record)
            .collect::<Result<Vec<_>>>()?;
        Ok((claims, total))
    }
}

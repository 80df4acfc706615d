//! `PgConfigStore`: the configuration document as a single JSON row. Stored
//! as `JSON` rather than `JSONB` so field order inside a step survives.

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::PgPool;

use claims_core::config::ClaimConfigDocument;
use claims_core::error::ClaimsError;
use claims_core::ports::{ConfigStore, Result};

use crate::rows::PgConfigRow;

/// Key of the one row holding the document.
pub const CONFIG_ROW_ID: &str = "default";

pub struct PgConfigStore {
    pool: PgPool,
}

impl PgConfigStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfigStore for PgConfigStore {
    async fn load(&self) -> Result<Option<ClaimConfigDocument>> {
        let row = sqlx::query_as::<_, PgConfigRow>(
            "SELECT request::text AS request FROM claim_config WHERE id = $1",
        )
        .bind(CONFIG_ROW_ID)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        row.map(|r| {
            serde_json::from_str(&r.request)
                .map_err(|e| ClaimsError::Internal(anyhow!("stored claim config: {e}")))
        })
        .transpose()
    }

    async fn save(&self, document: &ClaimConfigDocument) -> Result<ClaimConfigDocument> {
        let body = serde_json::to_string(document).map_err(|e| ClaimsError::Internal(anyhow!(e)))?;
        let row = sqlx::query_as::<_, PgConfigRow>(
            r#"
            INSERT INTO claim_config (id, request, updated_at)
            VALUES ($1, $2::json, now())
            ON CONFLICT (id) DO UPDATE
                SET request = EXCLUDED.request,
                    updated_at = now()
            RETURNING request::text AS request
            "#,
        )
        .bind(CONFIG_ROW_ID)
        .bind(body)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;

        serde_json::from_str(&row.request)
            .map_err(|e| ClaimsError::Internal(anyhow!("stored claim config: {e}")))
    }
}
